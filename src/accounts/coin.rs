use std::fmt;

pub type CoinId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Genesis,
    Transfer,
}

/// One entry in a coin's provenance log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinEvent {
    pub action: Action,
    pub target: String,
}

impl fmt::Display for CoinEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            Action::Genesis => "genesis",
            Action::Transfer => "transfer",
        };
        write!(f, "{}:{}", action, self.target)
    }
}

/// A uniquely identified token. The id never changes; the history only grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    id: CoinId,
    history: Vec<CoinEvent>,
}

impl Coin {
    pub fn mint(id: CoinId, target: &str) -> Self {
        Self {
            id,
            history: vec![CoinEvent {
                action: Action::Genesis,
                target: target.to_string(),
            }],
        }
    }

    pub fn id(&self) -> CoinId {
        self.id
    }

    pub fn history(&self) -> &[CoinEvent] {
        &self.history
    }

    /// The account this coin was minted into.
    pub fn genesis_target(&self) -> &str {
        // The genesis event is pushed by `mint` and history is never truncated.
        &self.history[0].target
    }

    /// The account that currently holds this coin, i.e. the last recorded target.
    pub fn owner(&self) -> &str {
        &self.history[self.history.len() - 1].target
    }

    pub(crate) fn record_transfer(&mut self, to: &str) {
        self.history.push(CoinEvent {
            action: Action::Transfer,
            target: to.to_string(),
        });
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_starts_with_genesis() {
        let coin = Coin::mint(7, "alice");
        assert_eq!(coin.id(), 7);
        assert_eq!(coin.history().len(), 1);
        assert_eq!(coin.history()[0].action, Action::Genesis);
        assert_eq!(coin.genesis_target(), "alice");
        assert_eq!(coin.owner(), "alice");
    }

    #[test]
    fn test_transfer_appends_and_keeps_genesis() {
        let mut coin = Coin::mint(1, "alice");
        coin.record_transfer("[a,b]");
        coin.record_transfer("house");

        assert_eq!(coin.history().len(), 3);
        assert_eq!(coin.genesis_target(), "alice");
        assert_eq!(coin.owner(), "house");
        assert_eq!(coin.history()[1].to_string(), "transfer:[a,b]");
    }
}
