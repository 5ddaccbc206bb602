//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB and default config,
//! plus helpers to seed the six collections and build test images.

#![allow(dead_code)]

use std::io::Cursor;

use artcare::config::Config;
use artcare_common::{CompletionStatus, FilterCategory, PhotoRef};
use artcare_db::models::{
    FilterOption, Location, NewTeachingRecord, NewWork, Senior, TeachingParticipant,
    TeachingRecord, Work,
};
use artcare_db::pool::{get_conn, init_memory_pool, DbPool, PooledConnection};
use artcare_db::queries::{
    filter_options, locations, participants, seniors, teaching_records, works,
};
use chrono::NaiveDate;
use image::{DynamicImage, ImageFormat, RgbImage};

/// Test harness wrapping an in-memory database and a config.
pub struct TestHarness {
    pub config: Config,
    pub db: DbPool,
}

/// Rows created by [`TestHarness::seed`].
#[derive(Debug, Default)]
pub struct Seeded {
    pub locations: Vec<Location>,
    pub seniors: Vec<Senior>,
    pub works: Vec<Work>,
    pub records: Vec<TeachingRecord>,
    pub participants: Vec<TeachingParticipant>,
    pub filter_options: Vec<FilterOption>,
}

impl TestHarness {
    /// Create a new harness with default configuration and in-memory DB.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration and in-memory DB.
    pub fn with_config(config: Config) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        Self { config, db }
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> PooledConnection {
        get_conn(&self.db).expect("failed to get db connection")
    }

    /// Seed `n_locations` locations, `n_seniors` seniors and `n_works` works,
    /// then `n_records` teaching records spread over them. Every record gets
    /// one participant.
    pub fn seed(
        &self,
        n_locations: usize,
        n_seniors: usize,
        n_works: usize,
        n_records: usize,
    ) -> Seeded {
        let conn = self.conn();
        let mut seeded = Seeded::default();

        for i in 0..n_locations {
            let location =
                locations::create_location(&conn, &format!("Center {i}"), Some("1 Main St"))
                    .unwrap();
            seeded.locations.push(location);
        }

        for i in 0..n_seniors {
            let location = &seeded.locations[i % seeded.locations.len()];
            let senior =
                seniors::create_senior(&conn, location.id, &format!("Senior {i}"), None).unwrap();
            seeded.seniors.push(senior);
        }

        for i in 0..n_works {
            let work = works::create_work(
                &conn,
                &NewWork {
                    title: format!("Work {i}"),
                    image_ref: Some(embedded_photo(i)),
                    season: Some("春".to_string()),
                    materials: vec!["紙類".to_string(), "黏土".to_string()],
                    ..Default::default()
                },
            )
            .unwrap();
            seeded.works.push(work);
        }

        for i in 0..n_records {
            let record = teaching_records::create_record(
                &conn,
                &NewTeachingRecord {
                    work_id: seeded.works[i % seeded.works.len()].id,
                    location_id: seeded.locations[i % seeded.locations.len()].id,
                    teaching_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Days::new(i as u64),
                    notes: None,
                    photo_refs: vec![external_photo(&format!("field-{i}"))],
                },
            )
            .unwrap();

            if !seeded.seniors.is_empty() {
                let participant = participants::create_participant(
                    &conn,
                    record.id,
                    seeded.seniors[i % seeded.seniors.len()].id,
                    CompletionStatus::Complete,
                    Some("enjoyed it"),
                )
                .unwrap();
                seeded.participants.push(participant);
            }

            seeded.records.push(record);
        }

        seeded
    }

    /// Add one persisted filter option.
    pub fn add_filter_option(&self, category: FilterCategory, value: &str) -> FilterOption {
        filter_options::create_filter_option(&self.conn(), category, value, None).unwrap()
    }
}

/// A small embedded photo whose payload differs per `seed`.
pub fn embedded_photo(seed: usize) -> PhotoRef {
    PhotoRef::embedded("image/jpeg", &format!("/9j/{}", "A".repeat(40 + seed * 4)))
}

pub fn external_photo(name: &str) -> PhotoRef {
    PhotoRef::external(format!("https://res.cloudinary.com/demo/image/upload/{name}.jpg"))
        .unwrap()
}

/// Encode a `width` x `height` gradient as PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 200])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}
