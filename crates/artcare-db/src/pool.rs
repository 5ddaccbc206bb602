//! Database connection pool management.
//!
//! This module provides connection pooling for SQLite using r2d2.
//! It handles pool initialization, connection customization, and running migrations.

use artcare_common::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const POOL_SIZE: u32 = 4;

/// Initialize a new database pool with the given file path.
///
/// This function will:
/// - Create the SQLite database file if it doesn't exist
/// - Set up connection pooling with r2d2
/// - Enable foreign key constraints on all connections
/// - Run pending database migrations
///
/// # Example
///
/// ```no_run
/// use artcare_db::pool::init_pool;
///
/// let pool = init_pool("/var/lib/artcare/artcare.db").unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    build_and_migrate(manager)
}

/// Initialize an in-memory database pool for testing.
///
/// All connections of the pool share one named in-memory database, so rows
/// written through one pooled connection are visible through the others. The
/// database disappears when the pool is dropped.
///
/// # Example
///
/// ```
/// use artcare_db::pool::init_memory_pool;
///
/// let pool = init_memory_pool().unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_memory_pool() -> Result<DbPool> {
    let uri = format!(
        "file:artcare-{}?mode=memory&cache=shared",
        uuid::Uuid::new_v4().simple()
    );
    let manager = SqliteConnectionManager::file(uri)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    build_and_migrate(manager)
}

fn build_and_migrate(manager: SqliteConnectionManager) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {}", e)))?;

    let conn = pool
        .get()
        .map_err(|e| Error::database(format!("Failed to get connection for migrations: {}", e)))?;

    migrations::run_migrations(&conn)
        .map_err(|e| Error::database(format!("Failed to run migrations: {}", e)))?;

    Ok(pool)
}

/// Get a connection from the pool.
///
/// This is a convenience wrapper around `pool.get()` that converts the
/// r2d2 error into our common Error type.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_memory_pool() {
        let pool = init_memory_pool().unwrap();
        assert_eq!(pool.max_size(), POOL_SIZE);
    }

    #[test]
    fn test_get_conn_enables_foreign_keys() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let enabled: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_connections_share_memory_database() {
        let pool = init_memory_pool().unwrap();

        let conn1 = get_conn(&pool).unwrap();
        conn1
            .execute(
                "INSERT INTO locations (id, name, created_at) VALUES (?, ?, ?)",
                rusqlite::params!["loc-1", "North Center", "2024-01-01T00:00:00Z"],
            )
            .unwrap();

        let conn2 = get_conn(&pool).unwrap();
        let name: String = conn2
            .query_row("SELECT name FROM locations WHERE id = ?", ["loc-1"], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(name, "North Center");
    }

    #[test]
    fn test_memory_pools_are_isolated() {
        let pool_a = init_memory_pool().unwrap();
        let pool_b = init_memory_pool().unwrap();

        get_conn(&pool_a)
            .unwrap()
            .execute(
                "INSERT INTO locations (id, name, created_at) VALUES ('x', 'A', '2024-01-01T00:00:00Z')",
                [],
            )
            .unwrap();

        let count: i64 = get_conn(&pool_b)
            .unwrap()
            .query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
