//! Artcare-DB: Database schema, migrations, and query operations
//!
//! This crate persists the six collections of the art-teaching record book
//! (works, locations, seniors, teaching records, teaching participants, and
//! filter options) in SQLite using rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations, one module per collection
//!
//! # Example
//!
//! ```no_run
//! use artcare_db::pool::{init_pool, get_conn};
//! use artcare_db::queries::locations;
//!
//! let pool = init_pool("/var/lib/artcare/artcare.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let location = locations::create_location(&conn, "Sunrise Center", Some("12 Elm St")).unwrap();
//! println!("Created location: {}", location.name);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
