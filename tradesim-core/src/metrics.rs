use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Accumulated timing metrics for simulation performance.
#[derive(Default, Clone, Debug, Serialize, Deserialize)]
pub struct SimMetrics {
    pub total_turns: u64,
    pub total_time: Duration,
    /// Trade pass: shares, steering, propagation.
    pub trade_time: Duration,
    /// Income integration, production, ledger and effects.
    pub ledger_time: Duration,
    /// Time spent in observers.
    pub observer_time: Duration,
}

impl SimMetrics {
    pub fn turn_avg_ms(&self) -> f64 {
        if self.total_turns == 0 {
            0.0
        } else {
            self.total_time.as_secs_f64() * 1000.0 / self.total_turns as f64
        }
    }

    pub fn turns_per_second(&self) -> f64 {
        if self.total_time.as_secs_f64() == 0.0 {
            0.0
        } else {
            self.total_turns as f64 / self.total_time.as_secs_f64()
        }
    }
}
