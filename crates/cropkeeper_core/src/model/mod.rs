//! Domain model for the farm record store.
//!
//! # Responsibility
//! - Define the canonical records owned by the core (`Farm`, `Crop`, `Task`).
//! - Define the derived dashboard stats shape.
//!
//! # Invariants
//! - Every record is identified by a stable UUID that is never reused.
//! - A `Crop` is exclusively owned by the `Farm` holding it; there is no
//!   cross-farm sharing.

pub mod farm;
pub mod stats;
