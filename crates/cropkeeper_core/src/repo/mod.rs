//! Persistence adapter abstractions and implementations.
//!
//! # Responsibility
//! - Define the named-JSON-blob storage contract used by the farm store.
//! - Isolate SQLite details from service orchestration.
//!
//! # Invariants
//! - `load` degrades to "absent" on unavailable storage or malformed
//!   payloads; it never propagates a parse error.
//! - `save` is write-through; callers decide whether its failure is fatal.

pub mod blob_repo;
