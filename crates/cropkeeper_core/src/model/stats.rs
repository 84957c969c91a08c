//! Dashboard stats shape.
//!
//! # Responsibility
//! - Define the aggregate counts pushed to the dashboard subscriber and
//!   persisted under the `cropkeeper_stats` key.
//!
//! # Invariants
//! - `farms`, `crops` and `tasks` are always derived from the farm list.
//! - `expenses` has no computation source in core; it is carried over from
//!   previously persisted stats.

use serde::{Deserialize, Serialize};

/// Aggregate counts rendered by the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Total number of farms.
    pub farms: u32,
    /// Total number of crops across all farms.
    pub crops: u32,
    /// Total number of tasks across all farms.
    pub tasks: u32,
    /// Carried-over expense total. Never recomputed in core.
    #[serde(default)]
    pub expenses: f64,
}
