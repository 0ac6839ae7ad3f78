use std::collections::BTreeMap;

use crate::accounts::coin::{Coin, CoinId};

/// A named holder of coins. Coins are kept ordered by id so every scan is deterministic.
#[derive(Debug, Clone)]
pub struct Account {
    pub name: String,
    coins: BTreeMap<CoinId, Coin>,
}

impl Account {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            coins: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn contains(&self, id: CoinId) -> bool {
        self.coins.contains_key(&id)
    }

    pub fn get(&self, id: CoinId) -> Option<&Coin> {
        self.coins.get(&id)
    }

    /// Coins in ascending id order.
    pub fn coins(&self) -> impl Iterator<Item = &Coin> {
        self.coins.values()
    }

    /// Ids in ascending order, detached from the borrow so the caller can mutate while walking.
    pub fn coin_ids(&self) -> Vec<CoinId> {
        self.coins.keys().copied().collect()
    }

    pub(crate) fn insert(&mut self, coin: Coin) {
        let previous = self.coins.insert(coin.id(), coin);
        assert!(previous.is_none(), "coin inserted twice into {}", self.name);
    }

    pub(crate) fn remove(&mut self, id: CoinId) -> Option<Coin> {
        self.coins.remove(&id)
    }
}
