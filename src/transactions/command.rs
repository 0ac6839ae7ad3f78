use serde::Deserialize;
use thiserror::Error;

use crate::error::{parse_amount, MixerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    CreateUser,
    Mint,
    OpenDeposit,
    Deposit,
    Wait,
    Inspect,
    Balances,
}

/// One row of a command script: `command,user,args,amount`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRecord {
    pub command: CommandType,
    pub user: Option<String>,
    /// Space separated alias names, or an account name for `inspect`.
    pub args: Option<String>,
    /// Coin count, delay, or milliseconds depending on the command.
    pub amount: Option<String>,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0:?} is missing the `{1}` column")]
    Missing(CommandType, &'static str),

    #[error(transparent)]
    Rejected(#[from] MixerError),

    #[error("failed to write output: {0}")]
    Output(#[from] csv::Error),
}

impl CommandRecord {
    pub fn user(&self) -> Result<&str, CommandError> {
        self.user
            .as_deref()
            .ok_or(CommandError::Missing(self.command, "user"))
    }

    pub fn args(&self) -> Result<&str, CommandError> {
        self.args
            .as_deref()
            .ok_or(CommandError::Missing(self.command, "args"))
    }

    pub fn aliases(&self) -> Result<Vec<&str>, CommandError> {
        Ok(self.args()?.split_whitespace().collect())
    }

    pub fn amount(&self) -> Result<u64, CommandError> {
        let raw = self
            .amount
            .as_deref()
            .ok_or(CommandError::Missing(self.command, "amount"))?;
        Ok(parse_amount(raw)?)
    }
}
