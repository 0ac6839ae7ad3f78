pub mod accounts;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod orchestrator;
pub mod transactions;
pub mod workers;

pub use accounts::{Account, Action, Coin, CoinEvent, CoinId};
pub use config::MixerConfig;
pub use engine::{Mixer, UserHandle};
pub use error::{MixerError, MixerResult};
pub use ledger::{DepositInfo, DepositKey, Ledger, PassReport};
pub use orchestrator::run;
pub use transactions::CommandRecord;
pub use workers::Workers;
