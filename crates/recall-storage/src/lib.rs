//! # recall-storage
//!
//! Embedded SQLite implementation of [`recall_core::traits::IMemoryStore`].
//! One write connection, WAL pragmas, versioned migrations, and every
//! multi-step mutation inside an explicit transaction.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use recall_core::errors::{RecallError, StorageError};
use rusqlite::ErrorCode;

/// Map a rusqlite error into the workspace taxonomy. Busy/locked databases
/// become the transient [`StorageError::Busy`].
pub fn to_storage_err(err: rusqlite::Error) -> RecallError {
    let storage = match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(e.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) =>
        {
            StorageError::Busy {
                message: err.to_string(),
            }
        }
        _ => StorageError::SqliteError {
            message: err.to_string(),
        },
    };
    RecallError::StorageUnavailable(storage)
}

/// Wrap a failed transaction step with the operation name.
pub(crate) fn tx_err(operation: &str, err: rusqlite::Error) -> RecallError {
    RecallError::StorageUnavailable(StorageError::TransactionFailed {
        operation: operation.to_string(),
        reason: err.to_string(),
    })
}
