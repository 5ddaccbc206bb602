//! Core type definitions shared by the database and the photo/backup engine.
//!
//! Enums serialize in lowercase/snake_case, which is also the text stored in
//! the database columns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a filter option used to tag works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCategory {
    /// Season the work suits.
    Season,
    /// Festival the work is associated with.
    Festival,
    /// Material used by the work.
    MaterialType,
}

impl FilterCategory {
    /// All categories, in display order.
    pub const ALL: [FilterCategory; 3] = [Self::Season, Self::Festival, Self::MaterialType];
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Season => write!(f, "season"),
            Self::Festival => write!(f, "festival"),
            Self::MaterialType => write!(f, "material_type"),
        }
    }
}

impl std::str::FromStr for FilterCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "season" => Ok(Self::Season),
            "festival" => Ok(Self::Festival),
            "material_type" => Ok(Self::MaterialType),
            _ => Err(format!("Invalid filter category: {}", s)),
        }
    }
}

/// How far a senior got with the work during a teaching session.
///
/// Older data stored the labels shown in the UI, so those are accepted as
/// aliases when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    /// Finished the work.
    #[serde(alias = "完成")]
    Complete,
    /// Finished part of the work.
    #[serde(alias = "部分完成")]
    Partial,
    /// Did not finish.
    #[serde(alias = "未完成")]
    Incomplete,
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Partial => write!(f, "partial"),
            Self::Incomplete => write!(f, "incomplete"),
        }
    }
}

impl std::str::FromStr for CompletionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "complete" | "完成" => Ok(Self::Complete),
            "partial" | "部分完成" => Ok(Self::Partial),
            "incomplete" | "未完成" => Ok(Self::Incomplete),
            _ => Err(format!("Invalid completion status: {}", s)),
        }
    }
}

/// The role a photo plays, which decides its transcoding profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoRole {
    /// The main photo of an artwork.
    Work,
    /// A photo taken on site during a teaching session.
    Field,
}

impl fmt::Display for PhotoRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Work => write!(f, "work"),
            Self::Field => write!(f, "field"),
        }
    }
}

impl std::str::FromStr for PhotoRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Self::Work),
            "field" => Ok(Self::Field),
            _ => Err(format!("Invalid photo role: {}", s)),
        }
    }
}

/// Where newly stored photos go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Photos are encoded into the reference itself and live in the database.
    #[default]
    Embedded,
    /// Photos are uploaded to a remote object store; the reference is a URL.
    External,
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded"),
            Self::External => write!(f, "external"),
        }
    }
}

impl std::str::FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "embedded" => Ok(Self::Embedded),
            "external" => Ok(Self::External),
            _ => Err(format!("Invalid storage mode: {}", s)),
        }
    }
}
