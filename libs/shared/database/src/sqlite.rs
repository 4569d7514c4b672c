use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::DatabaseError;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const MIGRATIONS: &[(i64, &str)] = &[
    (1, include_str!("../migrations/001_initial.sql")),
];

/// Handle to the record store. Cloned into every request; each request opens
/// its own connection with [`Database::connect`] and drops it when done.
#[derive(Debug, Clone)]
pub struct Database {
    path: Arc<PathBuf>,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the schema if needed. Called once at startup.
    pub fn initialize(&self) -> Result<(), DatabaseError> {
        let conn = open_database(&self.path)?;
        info!("Record store ready at {} (schema v{})", self.path.display(), current_version(&conn));
        Ok(())
    }

    pub fn connect(&self) -> Result<Connection, DatabaseError> {
        debug!("Opening connection to {}", self.path.display());
        let conn = Connection::open(self.path.as_ref())?;
        configure_connection(&conn)?;
        Ok(conn)
    }
}

/// Open a connection to the given path and run migrations
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

#[cfg(test)]
fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> Result<(), DatabaseError> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(())
}

pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current = current_version(conn);

    for &(version, sql) in MIGRATIONS {
        if version > current {
            info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// 0 when no schema exists yet
fn current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, Option<i64>>(0)
    })
    .ok()
    .flatten()
    .unwrap_or(0)
}
