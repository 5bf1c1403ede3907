/// Database connection and validation utilities
///
/// The dataset is a pre-populated SQLite file that this service never
/// writes to. Connections are opened read-only, and one is opened per
/// request — SQLite connections are not shared across request threads.

use rusqlite::{Connection, OpenFlags};
use std::env;
use std::path::Path;

use crate::config::ServiceConfig;

/// Tables the dataset must contain before the service will start.
pub const REQUIRED_TABLES: &[&str] = &["measurement", "station"];

/// Database configuration validation error
#[derive(Debug)]
pub enum DbConfigError {
    /// Dataset file does not exist at the resolved path
    DatabaseNotFound(String),
    /// SQLite refused to open the file
    OpenFailed(rusqlite::Error),
    /// Required table missing from the dataset
    MissingTable(String),
    /// Schema check query failed
    SchemaCheckFailed(rusqlite::Error),
}

impl std::fmt::Display for DbConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbConfigError::DatabaseNotFound(path) => {
                write!(f, "Dataset not found at '{}'.\n\n", path)?;
                write!(f, "  The service reads a pre-populated SQLite file; it never creates one.\n")?;
                write!(f, "  - Set `database_path` in climate.toml, or\n")?;
                write!(f, "  - Set DATABASE_PATH in the environment or a .env file")
            }
            DbConfigError::OpenFailed(e) => {
                write!(f, "Failed to open SQLite dataset.\n\n")?;
                write!(f, "  Error: {}\n\n", e)?;
                write!(f, "  Common causes:\n")?;
                write!(f, "  - File is not a SQLite database\n")?;
                write!(f, "  - File permissions do not allow reading")
            }
            DbConfigError::MissingTable(table) => {
                write!(f, "Required table '{}' does not exist in the dataset.\n\n", table)?;
                write!(f, "  Expected tables: measurement (station, date, prcp, tobs)\n")?;
                write!(f, "                   station (station, name, ...)\n\n")?;
                write!(f, "  Check that DATABASE_PATH points at the climate dataset, not another file.")
            }
            DbConfigError::SchemaCheckFailed(e) => {
                write!(f, "Failed to inspect dataset schema: {}", e)
            }
        }
    }
}

impl std::error::Error for DbConfigError {}

/// Resolve the dataset path: DATABASE_PATH env var (or .env entry) wins,
/// otherwise the configured `database_path`.
pub fn resolve_database_path(config: &ServiceConfig) -> String {
    dotenv::dotenv().ok();
    env::var("DATABASE_PATH").unwrap_or_else(|_| config.database_path.clone())
}

/// Open the dataset read-only. Fails with a descriptive error rather than
/// letting SQLite create an empty database at a mistyped path.
pub fn open_read_only(path: &str) -> Result<Connection, DbConfigError> {
    if !Path::new(path).exists() {
        return Err(DbConfigError::DatabaseNotFound(path.to_string()));
    }

    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(DbConfigError::OpenFailed)
}

/// Verify a required table exists in the dataset.
pub fn verify_table(conn: &Connection, table: &str) -> Result<(), DbConfigError> {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            [table],
            |row| row.get(0),
        )
        .map_err(DbConfigError::SchemaCheckFailed)?;

    if !exists {
        return Err(DbConfigError::MissingTable(table.to_string()));
    }

    Ok(())
}

/// Open the dataset and verify all required tables exist. Used once at
/// startup; per-request connections skip the schema check.
pub fn connect_and_verify(path: &str) -> Result<Connection, DbConfigError> {
    let conn = open_read_only(path)?;

    for table in REQUIRED_TABLES {
        verify_table(&conn, table)?;
    }

    Ok(conn)
}
