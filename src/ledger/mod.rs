pub mod deposit;
pub mod ledger;

pub use deposit::{DepositInfo, DepositKey};
pub use ledger::{Ledger, PassReport};
