//! Per-request work limits.

use serde::{Deserialize, Serialize};

use crate::compounding::DEFAULT_MAX_TRADES;
use crate::task::{DEFAULT_MAX_QUESTION_LENGTH, EngineLimits};

/// Hard ceiling for `max_compounding_trades`.
pub const MAX_COMPOUNDING_TRADES_CEILING: u32 = 100_000;

/// Limits configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Largest `numberOfTrades` for a compounding plan.
    #[serde(default = "default_max_compounding_trades")]
    pub max_compounding_trades: u32,
    /// Longest free-text question, in characters.
    #[serde(default = "default_max_question_length")]
    pub max_question_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_compounding_trades: default_max_compounding_trades(),
            max_question_length: default_max_question_length(),
        }
    }
}

impl From<LimitsConfig> for EngineLimits {
    fn from(config: LimitsConfig) -> Self {
        Self {
            max_compounding_trades: config.max_compounding_trades,
            max_question_length: config.max_question_length,
        }
    }
}

const fn default_max_compounding_trades() -> u32 {
    DEFAULT_MAX_TRADES
}

const fn default_max_question_length() -> usize {
    DEFAULT_MAX_QUESTION_LENGTH
}
