use serde::{Deserialize, Serialize};

/// Aggregate of consecutive swaps, rebuilt on every render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Representative x-position (unix seconds)
    pub timestamp: i64,
    pub total_usd: f64,
    pub count: usize,
}

impl Bucket {
    pub fn average_usd(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_usd / self.count as f64
        }
    }
}
