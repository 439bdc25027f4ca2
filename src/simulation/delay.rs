//! Congestion delay functions
//!
//! A delay function maps a segment's free-flow weight, its capacity and the
//! number of vehicles currently on it to the number of cycles a newly entering
//! vehicle has to wait.

use std::str::FromStr;

use super::error::ConfigError;
use super::types::Delay;

/// How a segment's delay grows once it holds more vehicles than its capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelayFunction {
    /// Grows by one cycle per vehicle above capacity
    #[default]
    Linear,
    /// Grows with the square of the number of vehicles above capacity
    Quadratic,
}

impl DelayFunction {
    /// Current delay for a segment. Never less than `base_weight`.
    pub fn delay(&self, base_weight: Delay, capacity: u32, occupancy: u32) -> Delay {
        let excess = occupancy.saturating_sub(capacity);
        match self {
            DelayFunction::Linear => base_weight.max(base_weight.saturating_add(excess)),
            DelayFunction::Quadratic => base_weight.saturating_add(excess.saturating_mul(excess)),
        }
    }
}

impl FromStr for DelayFunction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(DelayFunction::Linear),
            "quadratic" => Ok(DelayFunction::Quadratic),
            other => Err(ConfigError::InvalidParameter(format!(
                "unknown delay function '{other}'"
            ))),
        }
    }
}
