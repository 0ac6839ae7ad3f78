use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info};

use crate::accounts::{Account, Coin, CoinEvent, CoinId};
use crate::error::{MixerError, MixerResult};
use crate::ledger::deposit::{DepositInfo, DepositKey};

/// What a single sweep or withdrawal pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Deposits that had coins moved for them.
    pub deposits_touched: usize,
    pub coins_moved: u64,
    /// Deposits that were funded but still waiting out their delay.
    pub delayed: usize,
}

/// All shared mixer state. Nothing in here locks: the owner of a `Ledger` must hold it
/// exclusively for the whole of each call.
#[derive(Debug)]
pub struct Ledger {
    accounts: BTreeMap<String, Account>,
    users: BTreeSet<String>,
    deposits: BTreeMap<DepositKey, DepositInfo>,
    next_coin_id: CoinId,
    pool: String,
}

/// Move one coin between accounts and record the move in its history.
///
/// Panics if `from` does not hold the coin or `to` does not exist. Callers check membership
/// under the same exclusive borrow, so either case is a bug.
fn transfer(accounts: &mut BTreeMap<String, Account>, from: &str, to: &str, id: CoinId) {
    assert!(accounts.contains_key(to), "transfer of coin {id} to unknown account {to}");

    let mut coin = accounts
        .get_mut(from)
        .and_then(|account| account.remove(id))
        .unwrap_or_else(|| panic!("coin {id} is not held by {from}"));
    coin.record_transfer(to);

    debug!("coin {} moved {} -> {}", id, from, to);
    if let Some(account) = accounts.get_mut(to) {
        account.insert(coin);
    }
}

impl Ledger {
    pub fn new(pool: &str) -> Self {
        let mut accounts = BTreeMap::new();
        accounts.insert(pool.to_string(), Account::new(pool));
        Self {
            accounts,
            users: BTreeSet::new(),
            deposits: BTreeMap::new(),
            next_coin_id: 0,
            pool: pool.to_string(),
        }
    }

    pub fn pool(&self) -> &str {
        &self.pool
    }

    pub fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.get(name)
    }

    pub fn is_user(&self, name: &str) -> bool {
        self.users.contains(name)
    }

    pub fn deposit_info(&self, key: &DepositKey) -> Option<&DepositInfo> {
        self.deposits.get(key)
    }

    pub fn deposits(&self) -> impl Iterator<Item = (&DepositKey, &DepositInfo)> {
        self.deposits.iter()
    }

    fn create_account(&mut self, name: &str) -> MixerResult<()> {
        if self.accounts.contains_key(name) {
            return Err(MixerError::NameConflict(name.to_string()));
        }
        self.accounts.insert(name.to_string(), Account::new(name));
        Ok(())
    }

    pub fn create_user(&mut self, name: &str) -> MixerResult<()> {
        self.create_account(name)?;
        self.users.insert(name.to_string());
        info!("created user {}", name);
        Ok(())
    }

    /// Mint `amount` fresh coins into `account`, returning their ids in mint order.
    pub fn mint(&mut self, account: &str, amount: u64) -> MixerResult<Vec<CoinId>> {
        let target = self
            .accounts
            .get_mut(account)
            .ok_or_else(|| MixerError::UnknownUser(account.to_string()))?;

        let mut minted = Vec::new();
        for _ in 0..amount {
            let id = self.next_coin_id;
            self.next_coin_id += 1;
            target.insert(Coin::mint(id, account));
            minted.push(id);
        }

        if !minted.is_empty() {
            info!("minted {} coins for {}", minted.len(), account);
        }
        Ok(minted)
    }

    /// Register (or re-register) a deposit address for `owner`.
    ///
    /// Re-registering the same alias set by the same owner only resets the delay.
    pub fn open_deposit<S: AsRef<str>>(
        &mut self,
        owner: &str,
        aliases: &[S],
        delay: u64,
    ) -> MixerResult<DepositKey> {
        if !self.is_user(owner) {
            return Err(MixerError::UnknownUser(owner.to_string()));
        }
        let key = DepositKey::from_aliases(aliases)?;

        if let Some(existing) = self.deposits.get_mut(&key) {
            if existing.owner != owner {
                return Err(MixerError::AddressInUse(key.account_name()));
            }
            existing.delay = delay;
            info!("deposit {} for {} re-registered with delay {}", key, owner, delay);
            return Ok(key);
        }

        let combined = key.account_name();
        if let Some(taken) = std::iter::once(&combined)
            .chain(key.aliases())
            .find(|name| self.accounts.contains_key(name.as_str()))
        {
            return Err(MixerError::AddressInUse(taken.clone()));
        }

        for alias in key.aliases() {
            self.accounts.insert(alias.clone(), Account::new(alias));
        }
        self.accounts.insert(combined.clone(), Account::new(&combined));
        self.deposits.insert(
            key.clone(),
            DepositInfo {
                owner: owner.to_string(),
                delay,
                balance: 0,
            },
        );

        info!("deposit {} opened for {} with delay {}", key, owner, delay);
        Ok(key)
    }

    /// Move up to `amount` of the owner's coins, lowest ids first, into the deposit's combined
    /// account. Returns how many were moved; holding fewer than requested is not an error.
    pub fn deposit(&mut self, owner: &str, key: &DepositKey, amount: u64) -> MixerResult<u64> {
        match self.deposits.get(key) {
            Some(info) if info.owner == owner => {}
            _ => return Err(MixerError::UnknownDeposit(key.account_name())),
        }

        let combined = key.account_name();
        let wanted = usize::try_from(amount).unwrap_or(usize::MAX);
        let ids: Vec<CoinId> = self
            .accounts
            .get(owner)
            .map(|account| account.coins().map(Coin::id).take(wanted).collect())
            .unwrap_or_default();

        for &id in &ids {
            transfer(&mut self.accounts, owner, &combined, id);
        }

        info!("{} deposited {} of {} coins into {}", owner, ids.len(), amount, key);
        Ok(ids.len() as u64)
    }

    /// Move every coin sitting in a combined deposit account into the pool, crediting the
    /// deposit's balance one coin at a time.
    pub fn sweep_pass(&mut self) -> PassReport {
        let mut report = PassReport::default();

        for (key, info) in self.deposits.iter_mut() {
            let combined = key.account_name();
            let ids = self
                .accounts
                .get(&combined)
                .map(Account::coin_ids)
                .unwrap_or_default();
            if ids.is_empty() {
                continue;
            }

            for &id in &ids {
                transfer(&mut self.accounts, &combined, &self.pool, id);
                info.balance += 1;
            }

            debug!("swept {} coins from {}, balance {}", ids.len(), key, info.balance);
            report.deposits_touched += 1;
            report.coins_moved += ids.len() as u64;
        }

        report
    }

    /// Pay pooled coins back out to each funded deposit whose delay has run out.
    ///
    /// A coin minted for the deposit's owner is never paid back to that owner. The receiving
    /// alias is picked by `coin_id mod alias_count`. Candidates come from a linear scan of the
    /// pool in id order.
    pub fn withdraw_pass(&mut self) -> PassReport {
        let mut report = PassReport::default();

        for (key, info) in self.deposits.iter_mut() {
            if info.balance == 0 {
                continue;
            }
            if info.delay > 0 {
                info.delay -= 1;
                report.delayed += 1;
                debug!("deposit {} delayed, {} passes left", key, info.delay);
                continue;
            }

            let owed = usize::try_from(info.balance).unwrap_or(usize::MAX);
            let candidates: Vec<CoinId> = match self.accounts.get(&self.pool) {
                Some(pool) => pool
                    .coins()
                    .filter(|coin| coin.genesis_target() != info.owner)
                    .map(Coin::id)
                    .take(owed)
                    .collect(),
                None => Vec::new(),
            };
            if candidates.is_empty() {
                continue;
            }

            for &id in &candidates {
                transfer(&mut self.accounts, &self.pool, key.alias_for(id), id);
                info.balance -= 1;
            }

            debug!(
                "paid {} coins to {}, balance {}",
                candidates.len(),
                key,
                info.balance
            );
            report.deposits_touched += 1;
            report.coins_moved += candidates.len() as u64;
        }

        report
    }

    /// Coins held by `name` with their provenance, or `None` for an unknown account.
    pub fn inspect(&self, name: &str) -> Option<Vec<(CoinId, Vec<CoinEvent>)>> {
        self.accounts.get(name).map(|account| {
            account
                .coins()
                .map(|coin| (coin.id(), coin.history().to_vec()))
                .collect()
        })
    }

    pub fn balances(&self) -> BTreeMap<String, usize> {
        self.accounts
            .iter()
            .map(|(name, account)| (name.clone(), account.len()))
            .collect()
    }

    pub fn total_coins(&self) -> usize {
        self.accounts.values().map(Account::len).sum()
    }

    pub fn minted(&self) -> u64 {
        self.next_coin_id
    }
}
