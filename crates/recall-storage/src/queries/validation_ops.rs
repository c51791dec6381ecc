//! Confidence updates and tier promotion, each a read-compute-write inside
//! one transaction.

use rusqlite::{params, Connection};

use recall_core::errors::{RecallError, RecallResult};
use recall_core::memory::{Confidence, ImportanceTier, MemoryRecord};
use recall_core::traits::ConfidenceUpdate;

use super::record_crud::get_record;
use crate::{to_storage_err, tx_err};

pub fn update_confidence(
    conn: &mut Connection,
    id: i64,
    adjust: &dyn Fn(Confidence) -> Confidence,
) -> RecallResult<ConfidenceUpdate> {
    let tx = conn
        .transaction()
        .map_err(|e| tx_err("update_confidence", e))?;

    let record = get_record(&tx, id)?.ok_or(RecallError::NotFound { id })?;
    let previous = record.confidence;
    let current = adjust(previous);
    let validation_count = record.validation_count.saturating_add(1);

    tx.execute(
        "UPDATE memories SET confidence = ?2, validation_count = ?3 WHERE id = ?1",
        params![id, current.value(), i64::from(validation_count)],
    )
    .map_err(to_storage_err)?;
    tx.commit().map_err(|e| tx_err("update_confidence", e))?;

    Ok(ConfidenceUpdate {
        previous,
        current,
        validation_count,
        tier: record.tier,
    })
}

pub fn promote_if(
    conn: &mut Connection,
    id: i64,
    to: ImportanceTier,
    guard: &dyn Fn(&MemoryRecord) -> bool,
) -> RecallResult<bool> {
    let tx = conn.transaction().map_err(|e| tx_err("promote_if", e))?;

    let record = get_record(&tx, id)?.ok_or(RecallError::NotFound { id })?;
    if record.tier == to || !guard(&record) {
        return Ok(false);
    }

    tx.execute(
        "UPDATE memories SET tier = ?2 WHERE id = ?1",
        params![id, to.as_str()],
    )
    .map_err(to_storage_err)?;
    tx.commit().map_err(|e| tx_err("promote_if", e))?;
    Ok(true)
}
