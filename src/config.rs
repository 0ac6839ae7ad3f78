use std::time::Duration;

use crate::error::{parse_amount, MixerError, MixerResult};

/// Reference intervals, in time units.
pub const SWEEP_UNITS: u32 = 5;
pub const WITHDRAW_UNITS: u32 = 3;

#[derive(Debug, Clone)]
pub struct MixerConfig {
    /// Name of the custodial account every swept coin passes through.
    pub pool_account: String,
    pub sweep_interval: Duration,
    pub withdraw_interval: Duration,
}

impl MixerConfig {
    /// Build a config from a time unit given in milliseconds. Zero is rejected: the workers
    /// would never wait between passes.
    pub fn from_time_unit_millis(raw: &str) -> MixerResult<Self> {
        match parse_amount(raw)? {
            0 => Err(MixerError::InvalidAmount(raw.to_string())),
            millis => Ok(Self::with_time_unit(Duration::from_millis(millis))),
        }
    }

    pub fn with_time_unit(unit: Duration) -> Self {
        Self {
            sweep_interval: unit * SWEEP_UNITS,
            withdraw_interval: unit * WITHDRAW_UNITS,
            ..Self::default()
        }
    }
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            pool_account: "house".to_string(),
            sweep_interval: Duration::from_secs(SWEEP_UNITS as u64),
            withdraw_interval: Duration::from_secs(WITHDRAW_UNITS as u64),
        }
    }
}
