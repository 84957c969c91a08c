//! Dashboard stats aggregation.
//!
//! # Responsibility
//! - Derive aggregate counts from the farm list.
//!
//! # Invariants
//! - Recomputation is pure and idempotent: the same farm list always
//!   yields the same counts.
//! - `expenses` is never derived; it is carried from the previous stats
//!   because core has no expense data source.

use crate::model::farm::Farm;
use crate::model::stats::DashboardStats;

/// Recomputes dashboard stats from the farm list.
///
/// `carry` supplies the prior stats so the expense total survives
/// recomputation unchanged.
pub fn recompute_stats(farms: &[Farm], carry: &DashboardStats) -> DashboardStats {
    DashboardStats {
        farms: farms.len() as u32,
        crops: farms.iter().map(|farm| farm.crop_count() as u32).sum(),
        tasks: farms.iter().map(|farm| farm.task_count() as u32).sum(),
        expenses: carry.expenses,
    }
}
