//! Single write connection behind a mutex; writes are serialized.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use recall_core::errors::{RecallResult, StorageError};

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// A single connection protected by a mutex.
///
/// A blocking mutex rather than an async one: every caller is synchronous, and
/// maintenance jobs reach the store from the blocking pool.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open a new write connection to the given database path.
    pub fn open(path: &Path, busy_timeout_ms: u32) -> RecallResult<Self> {
        let conn = Connection::open(path).map_err(to_storage_err)?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> RecallResult<Self> {
        let conn = Connection::open_in_memory().map_err(to_storage_err)?;
        apply_pragmas(&conn, 0)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the lock and execute a closure with the connection.
    pub fn with_conn<F, T>(&self, f: F) -> RecallResult<T>
    where
        F: FnOnce(&mut Connection) -> RecallResult<T>,
    {
        let mut guard = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        f(&mut guard)
    }
}
