use std::collections::BTreeSet;
use std::fmt;

use crate::error::{MixerError, MixerResult};

/// Canonical identity of a deposit address: its alias names, sorted and de-duplicated.
///
/// The combined deposit account lives in the same namespace as every other account, under the
/// name rendered by [`DepositKey::account_name`] (e.g. `[a,b,c]`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DepositKey(Vec<String>);

impl DepositKey {
    pub fn from_aliases<I, S>(aliases: I) -> MixerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sorted: BTreeSet<String> = aliases
            .into_iter()
            .map(|alias| alias.as_ref().trim().to_string())
            .filter(|alias| !alias.is_empty())
            .collect();

        if sorted.is_empty() {
            return Err(MixerError::EmptyAliases);
        }
        Ok(Self(sorted.into_iter().collect()))
    }

    pub fn aliases(&self) -> &[String] {
        &self.0
    }

    /// Alias that receives a withdrawn coin: `coin_id mod alias_count`.
    pub fn alias_for(&self, coin_id: u64) -> &str {
        let index = (coin_id % self.0.len() as u64) as usize;
        &self.0[index]
    }

    pub fn account_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DepositKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(","))
    }
}

/// Metadata and balance counter kept for each registered deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositInfo {
    pub owner: String,
    /// Withdrawal passes left to skip before this deposit is paid out.
    pub delay: u64,
    /// Coins swept into the pool for this deposit and not yet paid back.
    pub balance: u64,
}
