//! Versioned schema migrations, applied in order at startup.

pub mod v001_initial_schema;
pub mod v002_embeddings;

use rusqlite::{params, Connection, OptionalExtension};

use recall_core::errors::{RecallResult, StorageError};

use crate::to_storage_err;

type Migration = fn(&Connection) -> RecallResult<()>;

/// All migrations in version order.
const MIGRATIONS: &[(u32, Migration)] = &[
    (1, v001_initial_schema::migrate),
    (2, v002_embeddings::migrate),
];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 2;

/// Apply every migration newer than the stored schema version. Each migration
/// and its version row commit together. Returns the resulting version.
pub fn run_migrations(conn: &mut Connection) -> RecallResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(to_storage_err)?;

    let mut current = current_version(conn)?;
    for &(version, migrate) in MIGRATIONS {
        if version <= current {
            continue;
        }
        let tx = conn.transaction().map_err(to_storage_err)?;
        migrate(&tx).map_err(|e| StorageError::MigrationFailed {
            version,
            reason: e.to_string(),
        })?;
        tx.execute("INSERT INTO schema_version (version) VALUES (?1)", params![version])
            .map_err(to_storage_err)?;
        tx.commit().map_err(to_storage_err)?;
        tracing::debug!(version, "applied migration");
        current = version;
    }
    Ok(current)
}

/// Highest applied schema version, or 0 on a fresh database.
pub fn current_version(conn: &Connection) -> RecallResult<u32> {
    let version = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<u32>>(0)
        })
        .optional()
        .map_err(to_storage_err)?
        .flatten();
    Ok(version.unwrap_or(0))
}
