//! Internal Rust models matching the database schema.
//!
//! These structures map one-to-one onto the six persisted tables. Their serde
//! form is also the row format of snapshot files, so field names follow the
//! column names (`image_url`, `photo_urls`) rather than the Rust names.

use artcare_common::{
    CompletionStatus, FilterCategory, FilterOptionId, LocationId, ParticipantId, PhotoRef,
    SeniorId, TeachingRecordId, WorkId,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of field photos attached to one teaching record.
pub const MAX_RECORD_PHOTOS: usize = 3;

/// Display order given to filter options created without one.
pub const DEFAULT_DISPLAY_ORDER: i64 = 999;

/// An artwork that can be taught.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Work {
    pub id: WorkId,
    pub title: String,
    #[serde(rename = "image_url", default)]
    pub image_ref: Option<PhotoRef>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub festival: Option<String>,
    /// Material tags, unique and in the order they were added.
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a work.
#[derive(Debug, Clone, Default)]
pub struct NewWork {
    pub title: String,
    pub image_ref: Option<PhotoRef>,
    pub season: Option<String>,
    pub festival: Option<String>,
    pub materials: Vec<String>,
    pub description: Option<String>,
}

/// A teaching location (activity center).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A senior who attends one location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Senior {
    pub id: SeniorId,
    pub name: String,
    pub location_id: LocationId,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One teaching session of a work at a location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeachingRecord {
    pub id: TeachingRecordId,
    pub work_id: WorkId,
    pub location_id: LocationId,
    pub teaching_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(rename = "photo_urls", default)]
    pub photo_refs: Vec<PhotoRef>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a teaching record.
#[derive(Debug, Clone)]
pub struct NewTeachingRecord {
    pub work_id: WorkId,
    pub location_id: LocationId,
    pub teaching_date: NaiveDate,
    pub notes: Option<String>,
    pub photo_refs: Vec<PhotoRef>,
}

/// A senior's participation in a teaching session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeachingParticipant {
    pub id: ParticipantId,
    pub teaching_record_id: TeachingRecordId,
    pub senior_id: SeniorId,
    pub completion_status: CompletionStatus,
    #[serde(default)]
    pub reaction: Option<String>,
}

/// A selectable value for tagging works.
///
/// Built-in defaults have no `id`; they are never stored and cannot be
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterOption {
    #[serde(default)]
    pub id: Option<FilterOptionId>,
    pub category: FilterCategory,
    pub value: String,
    #[serde(default = "default_display_order")]
    pub display_order: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl FilterOption {
    /// Whether this option is one of the immutable built-in defaults.
    pub fn is_builtin(&self) -> bool {
        self.id.is_none()
    }
}

fn default_display_order() -> i64 {
    DEFAULT_DISPLAY_ORDER
}

fn default_active() -> bool {
    true
}

/// How often a work has been taught.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkStatistics {
    pub total_times: usize,
    pub last_taught: Option<NaiveDate>,
}

/// Remove duplicate material tags, keeping the first occurrence of each.
pub fn normalize_materials(materials: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    materials
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .filter(|m| seen.insert(m.to_string()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_materials_keeps_first_occurrence() {
        let materials = vec![
            "clay".to_string(),
            "paper".to_string(),
            "clay".to_string(),
            " ".to_string(),
            "fabric".to_string(),
        ];
        assert_eq!(
            normalize_materials(&materials),
            vec!["clay", "paper", "fabric"]
        );
    }

    #[test]
    fn test_work_serializes_image_ref_as_image_url() {
        let work = Work {
            id: WorkId::new(),
            title: "Paper lanterns".to_string(),
            image_ref: Some(PhotoRef::external("https://cdn.example.org/a.jpg").unwrap()),
            season: Some("秋".to_string()),
            festival: Some("中秋節".to_string()),
            materials: vec!["紙類".to_string()],
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&work).unwrap();
        assert_eq!(json["image_url"], "https://cdn.example.org/a.jpg");
        assert!(json.get("image_ref").is_none());
    }

    #[test]
    fn test_record_deserializes_without_photos() {
        let json = serde_json::json!({
            "id": TeachingRecordId::new(),
            "work_id": WorkId::new(),
            "location_id": LocationId::new(),
            "teaching_date": "2024-03-08",
            "created_at": "2024-03-08T10:00:00Z",
        });

        let record: TeachingRecord = serde_json::from_value(json).unwrap();
        assert!(record.photo_refs.is_empty());
        assert_eq!(record.notes, None);
    }

    #[test]
    fn test_filter_option_defaults() {
        let json = serde_json::json!({ "category": "season", "value": "春" });
        let option: FilterOption = serde_json::from_value(json).unwrap();
        assert!(option.is_builtin());
        assert!(option.is_active);
        assert_eq!(option.display_order, DEFAULT_DISPLAY_ORDER);
    }
}
