//! Storage usage accounting.
//!
//! Usage is estimated from the stored [`PhotoRef`]s alone. Embedded photo
//! sizes are derived from the length of their data URI; external photos are
//! never fetched, so they are counted at a fixed average per role.

use artcare_common::{PhotoRef, PhotoRole, StorageMode};
use artcare_db::pool::{get_conn, DbPool};
use artcare_db::queries::{teaching_records, works};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::QuotaConfig;

/// Decoded bytes per character of an embedded reference (base64 is 4:3).
pub const EMBEDDED_BYTES_PER_CHAR: f64 = 0.75;

/// Estimated size of one externally stored work photo.
pub const EXTERNAL_WORK_PHOTO_ESTIMATE_BYTES: u64 = 200 * 1024;

/// Estimated size of one externally stored teaching-session photo.
pub const EXTERNAL_FIELD_PHOTO_ESTIMATE_BYTES: u64 = 100 * 1024;

/// Capacity assumed for the database holding embedded photos.
pub const DEFAULT_EMBEDDED_QUOTA_BYTES: u64 = 500 * 1024 * 1024;

/// Capacity assumed for the remote object store.
pub const DEFAULT_EXTERNAL_QUOTA_BYTES: u64 = 25 * 1024 * 1024 * 1024;

/// Estimated stored size of one photo.
pub fn estimate_bytes(photo: &PhotoRef, role: PhotoRole) -> u64 {
    match (photo.kind(), role) {
        (StorageMode::Embedded, _) => (photo.len() as f64 * EMBEDDED_BYTES_PER_CHAR) as u64,
        (StorageMode::External, PhotoRole::Work) => EXTERNAL_WORK_PHOTO_ESTIMATE_BYTES,
        (StorageMode::External, PhotoRole::Field) => EXTERNAL_FIELD_PHOTO_ESTIMATE_BYTES,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhotoCounts {
    pub work: usize,
    pub field: usize,
}

impl PhotoCounts {
    pub fn total(&self) -> usize {
        self.work + self.field
    }
}

/// Usage of one storage backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendUsage {
    pub counts: PhotoCounts,
    pub bytes: u64,
    pub limit_bytes: u64,
    /// `bytes` as a percentage of `limit_bytes`.
    pub percent: f64,
}

impl BackendUsage {
    fn empty(limit_bytes: u64) -> Self {
        Self {
            counts: PhotoCounts::default(),
            bytes: 0,
            limit_bytes,
            percent: 0.0,
        }
    }

    fn add(&mut self, role: PhotoRole, bytes: u64) {
        match role {
            PhotoRole::Work => self.counts.work += 1,
            PhotoRole::Field => self.counts.field += 1,
        }
        self.bytes += bytes;
    }

    fn finish(&mut self) {
        self.percent = if self.limit_bytes == 0 {
            0.0
        } else {
            self.bytes as f64 / self.limit_bytes as f64 * 100.0
        };
    }
}

/// Photo usage split by backend and role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageReport {
    pub embedded: BackendUsage,
    pub external: BackendUsage,
}

impl UsageReport {
    /// Classify and size every reference.
    ///
    /// Each reference lands in exactly one backend/role cell.
    pub fn tally<'a, W, F>(work_photos: W, field_photos: F, limits: &QuotaConfig) -> Self
    where
        W: IntoIterator<Item = &'a PhotoRef>,
        F: IntoIterator<Item = &'a PhotoRef>,
    {
        let mut report = Self {
            embedded: BackendUsage::empty(limits.embedded_limit_bytes),
            external: BackendUsage::empty(limits.external_limit_bytes),
        };

        let tagged = work_photos
            .into_iter()
            .map(|p| (p, PhotoRole::Work))
            .chain(field_photos.into_iter().map(|p| (p, PhotoRole::Field)));

        for (photo, role) in tagged {
            let bytes = estimate_bytes(photo, role);
            match photo.kind() {
                StorageMode::Embedded => report.embedded.add(role, bytes),
                StorageMode::External => report.external.add(role, bytes),
            }
        }

        report.embedded.finish();
        report.external.finish();
        report
    }

    pub fn total_photos(&self) -> usize {
        self.embedded.counts.total() + self.external.counts.total()
    }
}

/// Scans stored photo references and reports estimated usage.
#[derive(Clone)]
pub struct QuotaAccountant {
    pool: DbPool,
    limits: QuotaConfig,
}

impl QuotaAccountant {
    pub fn new(pool: DbPool, limits: QuotaConfig) -> Self {
        Self { pool, limits }
    }

    /// Current usage, or `None` if the references could not be read.
    ///
    /// Unknown usage is never reported as zero.
    pub fn usage(&self) -> Option<UsageReport> {
        match self.scan() {
            Ok(report) => {
                debug!(
                    photos = report.total_photos(),
                    embedded_bytes = report.embedded.bytes,
                    external_bytes = report.external.bytes,
                    "Computed storage usage"
                );
                Some(report)
            }
            Err(e) => {
                warn!(error = %e, "Storage usage unavailable");
                None
            }
        }
    }

    fn scan(&self) -> artcare_common::Result<UsageReport> {
        let conn = get_conn(&self.pool)?;
        let work_photos = works::list_image_refs(&conn)?;
        let field_photos = teaching_records::list_photo_refs(&conn)?;
        Ok(UsageReport::tally(&work_photos, &field_photos, &self.limits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedded(payload_len: usize) -> PhotoRef {
        PhotoRef::embedded("image/jpeg", &"A".repeat(payload_len))
    }

    fn external(name: &str) -> PhotoRef {
        PhotoRef::external(format!("https://res.example.org/{name}.jpg")).unwrap()
    }

    #[test]
    fn test_estimates() {
        let photo = embedded(400);
        assert_eq!(
            estimate_bytes(&photo, PhotoRole::Work),
            (photo.len() as f64 * 0.75) as u64
        );
        assert_eq!(
            estimate_bytes(&external("a"), PhotoRole::Work),
            200 * 1024
        );
        assert_eq!(
            estimate_bytes(&external("a"), PhotoRole::Field),
            100 * 1024
        );
    }

    #[test]
    fn test_tally_partitions_every_reference() {
        let works = vec![embedded(100), external("w1"), external("w2")];
        let fields = vec![embedded(40), embedded(80), external("f1")];

        let report = UsageReport::tally(&works, &fields, &QuotaConfig::default());

        assert_eq!(report.embedded.counts, PhotoCounts { work: 1, field: 2 });
        assert_eq!(report.external.counts, PhotoCounts { work: 2, field: 1 });
        assert_eq!(report.total_photos(), works.len() + fields.len());
        assert_eq!(
            report.external.bytes,
            2 * EXTERNAL_WORK_PHOTO_ESTIMATE_BYTES + EXTERNAL_FIELD_PHOTO_ESTIMATE_BYTES
        );

        let embedded_bytes = estimate_bytes(&works[0], PhotoRole::Work)
            + estimate_bytes(&fields[0], PhotoRole::Field)
            + estimate_bytes(&fields[1], PhotoRole::Field);
        assert_eq!(report.embedded.bytes, embedded_bytes);
    }

    #[test]
    fn test_percent_of_limit() {
        let limits = QuotaConfig {
            embedded_limit_bytes: 1000,
            external_limit_bytes: 400 * 1024,
        };
        let report = UsageReport::tally(&[external("w")], &[external("f")], &limits);

        assert!((report.external.percent - 75.0).abs() < 1e-9);
        assert_eq!(report.embedded.percent, 0.0);
    }

    #[test]
    fn test_empty_dataset() {
        let report = UsageReport::tally(&Vec::<PhotoRef>::new(), &Vec::<PhotoRef>::new(), &QuotaConfig::default());
        assert_eq!(report.total_photos(), 0);
        assert_eq!(report.embedded.limit_bytes, DEFAULT_EMBEDDED_QUOTA_BYTES);
        assert_eq!(report.external.limit_bytes, DEFAULT_EXTERNAL_QUOTA_BYTES);
    }
}
