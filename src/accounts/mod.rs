pub mod account;
pub mod coin;

pub use account::Account;
pub use coin::{Action, Coin, CoinEvent, CoinId};
