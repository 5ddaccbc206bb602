//! Typed ID wrappers for type safety across artcare.
//!
//! Every persisted collection gets its own newtype around a UUID so that a
//! `SeniorId` can never be passed where a `LocationId` is expected. IDs are
//! serialized transparently as their hyphenated UUID string, which is also the
//! form stored in the database and carried in snapshots.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random ID.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

typed_id!(
    /// Unique identifier for an artwork.
    WorkId
);

typed_id!(
    /// Unique identifier for a teaching location (activity center).
    LocationId
);

typed_id!(
    /// Unique identifier for a senior participant.
    SeniorId
);

typed_id!(
    /// Unique identifier for a teaching session record.
    TeachingRecordId
);

typed_id!(
    /// Unique identifier for a senior's participation in a teaching session.
    ParticipantId
);

typed_id!(
    /// Unique identifier for a persisted filter option.
    FilterOptionId
);
