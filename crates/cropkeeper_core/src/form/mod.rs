//! Form drafts and pure validation.
//!
//! # Responsibility
//! - Carry raw form input exactly as typed (all fields are text).
//! - Validate drafts into per-field error maps with stable field keys.
//!
//! # Invariants
//! - Validation is pure and synchronous; it never touches store state.
//! - Absence of a field key in [`FormErrors`] means that field is valid;
//!   an empty map means the caller may proceed.
//! - Field keys and messages match the external form schema, so the
//!   presentation layer can bind errors to inputs by name.

use std::collections::BTreeMap;

/// Field key for the farm name input.
pub const FIELD_FARM_NAME: &str = "farmName";
/// Field key for the farm location input.
pub const FIELD_LOCATION: &str = "location";
/// Field key for the farm size input.
pub const FIELD_SIZE: &str = "size";
/// Field key for the crop name input.
pub const FIELD_CROP_NAME: &str = "cropName";
/// Field key for the farm selector in the crop form.
pub const FIELD_FARM_SELECTOR: &str = "farmSelector";

const MSG_FARM_NAME_REQUIRED: &str = "Farm name is required";
const MSG_LOCATION_REQUIRED: &str = "Location is required";
const MSG_SIZE_INVALID: &str = "Please enter a valid farm size";
const MSG_CROP_NAME_REQUIRED: &str = "Crop name is required";
const MSG_SELECT_FARM: &str = "Please select a farm";

/// Raw input of the add-farm form. Every field holds text as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FarmDraft {
    pub farm_name: String,
    pub location: String,
    pub size: String,
    /// Optional seed crop created together with the farm.
    pub crop_type: String,
    pub plant_date: String,
    pub expected_harvest: String,
    pub notes: String,
}

/// Raw input of the add-crop form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CropDraft {
    pub crop_name: String,
    pub plant_date: String,
    pub expected_harvest: String,
    pub notes: String,
}

/// Per-field validation errors keyed by external field name.
///
/// Ordered map so error display and test assertions are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, &'static str>,
}

impl FormErrors {
    /// Records one failing field. Later inserts for the same key win.
    pub fn insert(&mut self, field: &'static str, message: &'static str) {
        self.fields.insert(field, message);
    }

    /// Message for one field, if it failed.
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.fields.get(field).copied()
    }

    /// True when every field validated; callers treat this as "proceed".
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates `(field, message)` pairs in field-key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.fields.iter().map(|(field, message)| (*field, *message))
    }
}

/// Validates the add-farm draft.
///
/// # Contract
/// - `farm_name` and `location` must be non-empty after trimming.
/// - `size` must parse to a finite number greater than zero.
/// - `crop_type`, dates and notes are unconstrained.
pub fn validate_farm_draft(draft: &FarmDraft) -> FormErrors {
    let mut errors = FormErrors::default();

    if draft.farm_name.trim().is_empty() {
        errors.insert(FIELD_FARM_NAME, MSG_FARM_NAME_REQUIRED);
    }
    if draft.location.trim().is_empty() {
        errors.insert(FIELD_LOCATION, MSG_LOCATION_REQUIRED);
    }
    if parse_farm_size(&draft.size).is_none() {
        errors.insert(FIELD_SIZE, MSG_SIZE_INVALID);
    }

    errors
}

/// Validates the add-crop draft.
///
/// # Contract
/// - `crop_name` must be non-empty after trimming.
/// - Dates and notes are unconstrained; planted/harvest ordering is
///   deliberately not checked.
pub fn validate_crop_draft(draft: &CropDraft) -> FormErrors {
    let mut errors = FormErrors::default();

    if draft.crop_name.trim().is_empty() {
        errors.insert(FIELD_CROP_NAME, MSG_CROP_NAME_REQUIRED);
    }

    errors
}

/// Builds the blocking error returned when a crop submission has no
/// resolvable target farm.
pub fn missing_farm_selection() -> FormErrors {
    let mut errors = FormErrors::default();
    errors.insert(FIELD_FARM_SELECTOR, MSG_SELECT_FARM);
    errors
}

/// Parses the size field into acreage.
///
/// Returns `None` for empty, non-numeric, non-finite or non-positive
/// input; `Some(acres)` otherwise.
pub fn parse_farm_size(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|size| size.is_finite() && *size > 0.0)
}

/// Maps an optional text field to `None` when blank.
pub(crate) fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_farm_draft() -> FarmDraft {
        FarmDraft {
            farm_name: "Sunrise Valley Farm".to_string(),
            location: "Linn, IA".to_string(),
            size: "10.5".to_string(),
            ..FarmDraft::default()
        }
    }

    #[test]
    fn valid_farm_draft_produces_no_errors() {
        assert!(validate_farm_draft(&valid_farm_draft()).is_empty());
    }

    #[test]
    fn whitespace_only_required_fields_fail() {
        let draft = FarmDraft {
            farm_name: "   ".to_string(),
            location: "\t".to_string(),
            size: "10".to_string(),
            ..FarmDraft::default()
        };
        let errors = validate_farm_draft(&draft);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(FIELD_FARM_NAME), Some("Farm name is required"));
        assert_eq!(errors.get(FIELD_LOCATION), Some("Location is required"));
        assert_eq!(errors.get(FIELD_SIZE), None);
    }

    #[test]
    fn size_rejects_empty_non_numeric_zero_negative_and_non_finite() {
        for raw in ["", "  ", "ten", "0", "-3", "NaN", "inf"] {
            let draft = FarmDraft {
                size: raw.to_string(),
                ..valid_farm_draft()
            };
            let errors = validate_farm_draft(&draft);
            assert_eq!(
                errors.get(FIELD_SIZE),
                Some("Please enter a valid farm size"),
                "size input `{raw}` should fail"
            );
        }
    }

    #[test]
    fn size_accepts_positive_decimals_with_whitespace() {
        assert_eq!(parse_farm_size(" 10.5 "), Some(10.5));
        assert_eq!(parse_farm_size("0.1"), Some(0.1));
    }

    #[test]
    fn crop_draft_requires_name_only() {
        let empty = CropDraft::default();
        let errors = validate_crop_draft(&empty);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(FIELD_CROP_NAME), Some("Crop name is required"));

        let named = CropDraft {
            crop_name: "Corn".to_string(),
            ..CropDraft::default()
        };
        assert!(validate_crop_draft(&named).is_empty());
    }

    #[test]
    fn harvest_before_planting_is_not_an_error() {
        let draft = CropDraft {
            crop_name: "Corn".to_string(),
            plant_date: "2026-09-01".to_string(),
            expected_harvest: "2026-03-01".to_string(),
            ..CropDraft::default()
        };
        assert!(validate_crop_draft(&draft).is_empty());
    }

    #[test]
    fn optional_text_maps_blank_to_none() {
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(" hi "), Some("hi".to_string()));
    }
}
