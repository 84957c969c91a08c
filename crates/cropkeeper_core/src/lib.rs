//! Core domain logic for CropKeeper.
//! This crate is the single source of truth for farm-record invariants;
//! presentation shells consume its store API and change subscription.

pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use form::{
    validate_crop_draft, validate_farm_draft, CropDraft, FarmDraft, FormErrors, FIELD_CROP_NAME,
    FIELD_FARM_NAME, FIELD_FARM_SELECTOR, FIELD_LOCATION, FIELD_SIZE,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::farm::{Crop, CropId, Farm, FarmId, Task, TaskId};
pub use model::stats::DashboardStats;
pub use repo::blob_repo::{BlobStore, MemoryBlobStore, RepoError, RepoResult, SqliteBlobStore};
pub use service::farm_store::{
    FarmStore, SubmitError, Submitted, FARMS_KEY, STATS_KEY, SUBMIT_LATENCY,
};
pub use service::stats::recompute_stats;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
