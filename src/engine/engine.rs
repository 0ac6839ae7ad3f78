use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use csv::Writer;
use parking_lot::Mutex;

use crate::accounts::{CoinEvent, CoinId};
use crate::config::MixerConfig;
use crate::error::{MixerError, MixerResult};
use crate::ledger::{DepositInfo, DepositKey, Ledger, PassReport};

/// Proof that a user account exists. Obtained from [`Mixer::create_user`] or [`Mixer::user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserHandle {
    name: String,
}

impl UserHandle {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Cloneable handle to one shared ledger. Every method takes the ledger lock for its whole
/// duration, so calls from the console and from the workers are totally ordered.
#[derive(Debug, Clone)]
pub struct Mixer {
    ledger: Arc<Mutex<Ledger>>,
}

impl Mixer {
    pub fn new(config: &MixerConfig) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(Ledger::new(&config.pool_account))),
        }
    }

    /// Run `f` with exclusive access to the ledger.
    pub(crate) fn with_ledger<T>(&self, f: impl FnOnce(&mut Ledger) -> T) -> T {
        let mut ledger = self.ledger.lock();
        f(&mut ledger)
    }

    pub fn create_user(&self, name: &str) -> MixerResult<UserHandle> {
        self.with_ledger(|ledger| ledger.create_user(name))?;
        Ok(UserHandle {
            name: name.to_string(),
        })
    }

    pub fn user(&self, name: &str) -> MixerResult<UserHandle> {
        if self.with_ledger(|ledger| ledger.is_user(name)) {
            Ok(UserHandle {
                name: name.to_string(),
            })
        } else {
            Err(MixerError::UnknownUser(name.to_string()))
        }
    }

    pub fn mint(&self, user: &UserHandle, amount: u64) -> MixerResult<()> {
        self.with_ledger(|ledger| ledger.mint(&user.name, amount))
            .map(|_| ())
    }

    pub fn open_deposit<S: AsRef<str>>(
        &self,
        user: &UserHandle,
        aliases: &[S],
        delay: u64,
    ) -> MixerResult<DepositKey> {
        self.with_ledger(|ledger| ledger.open_deposit(&user.name, aliases, delay))
    }

    /// Returns the number of coins actually moved, which may be less than `amount`.
    pub fn deposit(&self, user: &UserHandle, key: &DepositKey, amount: u64) -> MixerResult<u64> {
        self.with_ledger(|ledger| ledger.deposit(&user.name, key, amount))
    }

    pub fn sweep_now(&self) -> PassReport {
        self.with_ledger(Ledger::sweep_pass)
    }

    pub fn withdraw_now(&self) -> PassReport {
        self.with_ledger(Ledger::withdraw_pass)
    }

    pub fn inspect(&self, account: &str) -> Option<Vec<(CoinId, Vec<CoinEvent>)>> {
        self.with_ledger(|ledger| ledger.inspect(account))
    }

    pub fn list_balances(&self) -> BTreeMap<String, usize> {
        self.with_ledger(|ledger| ledger.balances())
    }

    pub fn deposit_info(&self, key: &DepositKey) -> Option<DepositInfo> {
        self.with_ledger(|ledger| ledger.deposit_info(key).cloned())
    }

    /// Coins swept for `key` and not yet paid back out.
    pub fn deposit_balance(&self, key: &DepositKey) -> Option<u64> {
        self.with_ledger(|ledger| ledger.deposit_info(key).map(|info| info.balance))
    }

    pub fn total_coins(&self) -> usize {
        self.with_ledger(|ledger| ledger.total_coins())
    }

    pub fn minted(&self) -> u64 {
        self.with_ledger(|ledger| ledger.minted())
    }

    /// Write every account and its coin count as CSV.
    pub fn write_balances<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let balances = self.list_balances();
        let mut wtr = Writer::from_writer(writer);
        wtr.write_record(["account", "coins"])?;
        for (account, coins) in balances {
            wtr.serialize((account, coins))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
