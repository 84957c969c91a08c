//! Farm and crop domain records.
//!
//! # Responsibility
//! - Define the persisted shape of a farm and its nested crops/tasks.
//! - Provide creation helpers that mint stable IDs and timestamps.
//!
//! # Invariants
//! - `id` and `date_added` are set at creation time and never mutated.
//! - `crops` keeps insertion order; insertion order is display order.
//! - `size` is only ever populated from validated input, so `size > 0`
//!   holds for every persisted farm.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a farm record.
pub type FarmId = Uuid;

/// Stable identifier for a crop record.
pub type CropId = Uuid;

/// Stable identifier for a task record.
pub type TaskId = Uuid;

/// Top-level owned record representing a managed plot of land.
///
/// Serialized field names follow the external dashboard schema
/// (`dateAdded`, `plantedDate`, ...), so persisted blobs stay readable by
/// any consumer of the `cropkeeper_farms` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    /// Stable global ID, minted at creation.
    pub id: FarmId,
    /// Display name. Non-empty (validation gate).
    pub name: String,
    /// Free-form location text. Non-empty (validation gate).
    pub location: String,
    /// Acreage. Positive and finite (validation gate).
    pub size: f64,
    /// Creation timestamp in epoch milliseconds. Immutable.
    pub date_added: i64,
    /// Crops owned by this farm, in insertion order.
    pub crops: Vec<Crop>,
    /// Tasks owned by this farm. Only the count is consumed in core.
    pub tasks: Vec<Task>,
    /// UI visibility flag for the expanded detail panel.
    #[serde(default)]
    pub expanded: bool,
}

impl Farm {
    /// Creates a farm with a fresh ID, current timestamp and no crops.
    pub fn new(name: impl Into<String>, location: impl Into<String>, size: f64) -> Self {
        Self::with_id(Uuid::new_v4(), name, location, size)
    }

    /// Creates a farm with a caller-provided stable ID.
    ///
    /// Used by fixtures and import paths where identity already exists.
    pub fn with_id(
        id: FarmId,
        name: impl Into<String>,
        location: impl Into<String>,
        size: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location: location.into(),
            size,
            date_added: now_epoch_ms(),
            crops: Vec::new(),
            tasks: Vec::new(),
            expanded: false,
        }
    }

    /// Flips the expanded UI flag.
    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Number of crops owned by this farm.
    pub fn crop_count(&self) -> usize {
        self.crops.len()
    }

    /// Number of tasks owned by this farm.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

/// A planting record owned by exactly one farm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    /// Stable global ID, minted at creation.
    pub id: CropId,
    /// Display name. Non-empty (validation gate).
    pub name: String,
    /// Optional planting date as entered (`YYYY-MM-DD`). Unvalidated.
    pub planted_date: Option<String>,
    /// Optional expected harvest date as entered. Unvalidated, and not
    /// required to be ordered after `planted_date`.
    pub expected_harvest_date: Option<String>,
    /// Optional free-form notes.
    pub notes: Option<String>,
}

impl Crop {
    /// Creates a crop with a fresh ID.
    pub fn new(
        name: impl Into<String>,
        planted_date: Option<String>,
        expected_harvest_date: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            planted_date,
            expected_harvest_date,
            notes,
        }
    }
}

/// Minimal task record.
///
/// Task lifecycle management is out of scope; the record exists so farm
/// serialization and the dashboard task count match the external schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable global ID.
    pub id: TaskId,
    /// Short task description.
    pub title: String,
}

/// Current wall-clock time in epoch milliseconds.
///
/// Saturates to zero if the system clock reports a pre-epoch time.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{Crop, Farm};

    #[test]
    fn new_farm_starts_collapsed_and_empty() {
        let farm = Farm::new("Sunrise Valley Farm", "Linn, IA", 10.5);
        assert!(!farm.expanded);
        assert!(farm.crops.is_empty());
        assert!(farm.tasks.is_empty());
        assert!(farm.date_added > 0);
    }

    #[test]
    fn toggle_expanded_round_trips() {
        let mut farm = Farm::new("a", "b", 1.0);
        farm.toggle_expanded();
        assert!(farm.expanded);
        farm.toggle_expanded();
        assert!(!farm.expanded);
    }

    #[test]
    fn farm_serializes_with_external_field_names() {
        let mut farm = Farm::new("a", "b", 2.0);
        farm.crops
            .push(Crop::new("Corn", Some("2026-05-01".to_string()), None, None));

        let value = serde_json::to_value(&farm).unwrap();
        assert!(value.get("dateAdded").is_some());
        assert_eq!(value["crops"][0]["plantedDate"], "2026-05-01");
        assert!(value["crops"][0]["expectedHarvestDate"].is_null());
    }

    #[test]
    fn ids_are_unique_across_records() {
        let a = Farm::new("a", "loc", 1.0);
        let b = Farm::new("b", "loc", 1.0);
        assert_ne!(a.id, b.id);
    }
}
