//! Farm record store.
//!
//! # Responsibility
//! - Own the authoritative in-memory farm list and its mutation operations.
//! - Write every accepted mutation through to blob storage and push
//!   recomputed stats to the change subscriber.
//! - Enforce the single-submission-in-flight guard for form submissions.
//!
//! # Invariants
//! - The farm list is the single source of truth; stats are derived from
//!   it on every change (except the carried expense total).
//! - At most one submission is pending at any time; a second `submit_*`
//!   while one is in flight is rejected, never queued.
//! - Persistence write failures are logged and swallowed; in-memory state
//!   stays authoritative for the session.

use crate::form::{
    missing_farm_selection, optional_text, parse_farm_size, validate_crop_draft,
    validate_farm_draft, CropDraft, FarmDraft, FormErrors,
};
use crate::model::farm::{Crop, CropId, Farm, FarmId};
use crate::model::stats::DashboardStats;
use crate::repo::blob_repo::BlobStore;
use crate::service::stats::recompute_stats;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Blob key holding the serialized farm list.
pub const FARMS_KEY: &str = "cropkeeper_farms";

/// Blob key holding the serialized dashboard stats.
pub const STATS_KEY: &str = "cropkeeper_stats";

/// Simulated save latency between `submit_*` and the completion event.
///
/// The host event loop owns the timer: it calls
/// [`FarmStore::complete_submission`] once this much time has elapsed.
/// There is no cancellation path; a scheduled submission always settles.
pub const SUBMIT_LATENCY: Duration = Duration::from_millis(800);

/// Rejection reasons for form submissions.
#[derive(Debug)]
pub enum SubmitError {
    /// A submission is already pending; re-entrancy guard.
    InFlight,
    /// Crop submission attempted with no farms in the store.
    NoFarms,
    /// Per-field validation failures. Nothing was mutated or persisted.
    Invalid(FormErrors),
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InFlight => write!(f, "a submission is already in flight"),
            Self::NoFarms => write!(f, "create a farm before adding crops"),
            Self::Invalid(errors) => {
                write!(f, "invalid input in {} field(s)", errors.len())
            }
        }
    }
}

impl Error for SubmitError {}

/// Outcome of a settled submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    /// A farm was appended to the store.
    Farm(FarmId),
    /// A crop was appended to the named farm.
    Crop { farm_id: FarmId, crop_id: CropId },
}

/// Validated submission waiting for its completion event.
#[derive(Debug)]
enum PendingSubmission {
    CreateFarm(FarmDraft),
    AddCrop { farm_id: FarmId, draft: CropDraft },
}

type ChangeSubscriber = Box<dyn FnMut(&DashboardStats)>;

/// The authoritative collection of farms plus write-through persistence.
///
/// Generic over [`BlobStore`] so tests run against the in-memory adapter
/// while the product wires in the SQLite one.
pub struct FarmStore<S: BlobStore> {
    blobs: S,
    farms: Vec<Farm>,
    stats: DashboardStats,
    pending: Option<PendingSubmission>,
    subscriber: Option<ChangeSubscriber>,
}

impl<S: BlobStore> FarmStore<S> {
    /// Builds a store from blob storage.
    ///
    /// An absent or malformed farm blob yields an empty store; the prior
    /// stats blob, when readable, supplies the expense carryover.
    pub fn open(blobs: S) -> Self {
        let farms = match blobs.load(FARMS_KEY) {
            Some(value) => match serde_json::from_value::<Vec<Farm>>(value) {
                Ok(farms) => farms,
                Err(err) => {
                    warn!(
                        "event=store_open module=service status=malformed key={FARMS_KEY} error={err}"
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let carry = blobs
            .load(STATS_KEY)
            .and_then(|value| serde_json::from_value::<DashboardStats>(value).ok())
            .unwrap_or_default();
        let stats = recompute_stats(&farms, &carry);

        info!(
            "event=store_open module=service status=ok farms={} crops={}",
            stats.farms, stats.crops
        );

        Self {
            blobs,
            farms,
            stats,
            pending: None,
            subscriber: None,
        }
    }

    /// All farms in insertion order.
    pub fn farms(&self) -> &[Farm] {
        &self.farms
    }

    /// Looks up one farm by id.
    pub fn find_farm(&self, id: FarmId) -> Option<&Farm> {
        self.farms.iter().find(|farm| farm.id == id)
    }

    /// Latest derived stats.
    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    /// True while a submission awaits its completion event. The
    /// presentation layer uses this to disable submit buttons.
    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    /// Registers the change subscriber and pushes the current stats to it
    /// immediately. Replaces any previous subscriber.
    pub fn set_on_change(&mut self, callback: impl FnMut(&DashboardStats) + 'static) {
        let mut callback = Box::new(callback);
        callback(&self.stats);
        self.subscriber = Some(callback);
    }

    /// Validates and schedules a farm creation.
    ///
    /// On success the submission is pending until
    /// [`complete_submission`](Self::complete_submission); no state is
    /// mutated or persisted before then.
    pub fn submit_farm(&mut self, draft: FarmDraft) -> Result<(), SubmitError> {
        if self.pending.is_some() {
            return Err(SubmitError::InFlight);
        }

        let errors = validate_farm_draft(&draft);
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors));
        }

        self.pending = Some(PendingSubmission::CreateFarm(draft));
        Ok(())
    }

    /// Validates and schedules a crop addition.
    ///
    /// `target` is the explicitly selected farm id; it is required input,
    /// never recovered from rendered output. With no farms in the store
    /// the submission is refused before validation runs; with farms
    /// present a missing selection is a blocking `farmSelector` error.
    pub fn submit_crop(
        &mut self,
        target: Option<FarmId>,
        draft: CropDraft,
    ) -> Result<(), SubmitError> {
        if self.farms.is_empty() {
            return Err(SubmitError::NoFarms);
        }
        if self.pending.is_some() {
            return Err(SubmitError::InFlight);
        }

        let farm_id = match target {
            Some(id) => id,
            None => return Err(SubmitError::Invalid(missing_farm_selection())),
        };

        let errors = validate_crop_draft(&draft);
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors));
        }

        self.pending = Some(PendingSubmission::AddCrop { farm_id, draft });
        Ok(())
    }

    /// Completion event for the pending submission.
    ///
    /// The host event loop calls this after [`SUBMIT_LATENCY`]. Applies
    /// the pending mutation, clears the in-flight flag, writes through and
    /// notifies the subscriber. Returns `None` when nothing was pending or
    /// when a crop's target farm was deleted while the submission was in
    /// flight (a logged no-op, mirroring the silent-reference policy).
    pub fn complete_submission(&mut self) -> Option<Submitted> {
        match self.pending.take()? {
            PendingSubmission::CreateFarm(draft) => {
                // Guarded by submit_farm; a pending draft always carries a
                // parseable size.
                let size = parse_farm_size(&draft.size)?;
                let mut farm = Farm::new(draft.farm_name, draft.location, size);
                if !draft.crop_type.trim().is_empty() {
                    farm.crops.push(Crop::new(
                        draft.crop_type,
                        optional_text(&draft.plant_date),
                        optional_text(&draft.expected_harvest),
                        optional_text(&draft.notes),
                    ));
                }

                let farm_id = farm.id;
                self.farms.push(farm);
                info!("event=farm_created module=service status=ok farm_id={farm_id}");
                self.persist_and_notify();
                Some(Submitted::Farm(farm_id))
            }
            PendingSubmission::AddCrop { farm_id, draft } => {
                let Some(farm) = self.farms.iter_mut().find(|farm| farm.id == farm_id) else {
                    warn!(
                        "event=crop_added module=service status=missing_farm farm_id={farm_id}"
                    );
                    return None;
                };

                let crop = Crop::new(
                    draft.crop_name,
                    optional_text(&draft.plant_date),
                    optional_text(&draft.expected_harvest),
                    optional_text(&draft.notes),
                );
                let crop_id = crop.id;
                farm.crops.push(crop);
                info!(
                    "event=crop_added module=service status=ok farm_id={farm_id} crop_id={crop_id}"
                );
                self.persist_and_notify();
                Some(Submitted::Crop { farm_id, crop_id })
            }
        }
    }

    /// Flips the expanded flag on one farm. Unknown ids are a silent
    /// no-op; accepted toggles write through like any other mutation.
    pub fn toggle_farm_expanded(&mut self, id: FarmId) -> bool {
        let Some(farm) = self.farms.iter_mut().find(|farm| farm.id == id) else {
            return false;
        };
        farm.toggle_expanded();
        self.persist_and_notify();
        true
    }

    /// Removes one farm after explicit confirmation.
    ///
    /// `confirm` models the destructive-action prompt: declining aborts
    /// with no state change. Unknown ids are a silent no-op. Returns true
    /// only when a farm was actually removed.
    pub fn delete_farm(&mut self, id: FarmId, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            return false;
        }
        let Some(index) = self.farms.iter().position(|farm| farm.id == id) else {
            return false;
        };

        self.farms.remove(index);
        info!("event=farm_deleted module=service status=ok farm_id={id}");
        self.persist_and_notify();
        true
    }

    /// Consumes the store, returning its blob adapter.
    ///
    /// Lets tests reopen a store over the same storage to exercise the
    /// persistence round-trip.
    pub fn into_blobs(self) -> S {
        self.blobs
    }

    fn persist_and_notify(&mut self) {
        match serde_json::to_value(&self.farms) {
            Ok(value) => {
                if let Err(err) = self.blobs.save(FARMS_KEY, &value) {
                    warn!(
                        "event=blob_save module=service status=error key={FARMS_KEY} error={err}"
                    );
                }
            }
            Err(err) => warn!(
                "event=blob_save module=service status=serialize_error key={FARMS_KEY} error={err}"
            ),
        }

        self.stats = recompute_stats(&self.farms, &self.stats);
        match serde_json::to_value(&self.stats) {
            Ok(value) => {
                if let Err(err) = self.blobs.save(STATS_KEY, &value) {
                    warn!(
                        "event=blob_save module=service status=error key={STATS_KEY} error={err}"
                    );
                }
            }
            Err(err) => warn!(
                "event=blob_save module=service status=serialize_error key={STATS_KEY} error={err}"
            ),
        }

        if let Some(subscriber) = self.subscriber.as_mut() {
            subscriber(&self.stats);
        }
    }
}
