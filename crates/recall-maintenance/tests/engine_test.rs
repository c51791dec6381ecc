use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use recall_core::config::{MaintenanceConfig, RecallConfig};
use recall_core::errors::RecallResult;
use recall_core::memory::{EmbeddingStatus, MemoryRecord};
use recall_core::traits::{IEmbeddingProvider, IMemoryStore};
use recall_maintenance::MaintenanceEngine;
use recall_storage::StorageEngine;

struct FixedProvider;

impl IEmbeddingProvider for FixedProvider {
    fn embed(&self, _text: &str) -> RecallResult<Option<Vec<f32>>> {
        Ok(Some(vec![1.0, 0.0]))
    }
    fn dimensions(&self) -> usize {
        2
    }
    fn name(&self) -> &str {
        "fixed"
    }
    fn is_available(&self) -> bool {
        true
    }
}

fn fast_config() -> RecallConfig {
    RecallConfig {
        maintenance: MaintenanceConfig {
            retry_interval_secs: 1,
            archival_interval_secs: 1,
            ..MaintenanceConfig::default()
        },
        ..RecallConfig::default()
    }
}

fn decayed() -> MemoryRecord {
    let now = Utc::now();
    let mut record = MemoryRecord::new("notes", "old", "stale", now - chrono::Duration::days(500));
    record.half_life_days = Some(0.01);
    record.stability = Some(0.01);
    record.last_review = Some(now - chrono::Duration::days(400));
    record.embedding_status = EmbeddingStatus::Success;
    record
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn background_jobs_embed_and_archive() {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let pending = store
        .create(&MemoryRecord::new("notes", "new", "fresh body", Utc::now()))
        .unwrap();
    let old = store.create(&decayed()).unwrap();

    let mut engine = MaintenanceEngine::new(store.clone(), Arc::new(FixedProvider), None, &fast_config());
    assert_eq!(engine.start(), 2);
    assert_eq!(engine.start(), 0);

    tokio::time::sleep(Duration::from_millis(1_400)).await;
    engine.shutdown().await;

    let status = engine.status();
    assert!(!status.retry_running);
    assert!(!status.archival_running);
    assert!(status.retry_runs >= 1);
    assert!(status.archival_runs >= 1);

    assert_eq!(
        store.get(pending).unwrap().unwrap().embedding_status,
        EmbeddingStatus::Success
    );
    assert!(store.get(old).unwrap().unwrap().is_archived);
    assert_eq!(engine.archival_stats().archived, 1);
}

#[tokio::test]
async fn disabled_jobs_are_not_started() {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let config = RecallConfig {
        maintenance: MaintenanceConfig {
            retry_enabled: false,
            archival_enabled: false,
            ..MaintenanceConfig::default()
        },
        ..RecallConfig::default()
    };
    let mut engine = MaintenanceEngine::new(store, Arc::new(FixedProvider), None, &config);
    assert_eq!(engine.start(), 0);
    assert!(!engine.status().retry_running);
    engine.shutdown().await;
}

#[tokio::test]
async fn shutdown_twice_is_harmless() {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let mut engine = MaintenanceEngine::new(store, Arc::new(FixedProvider), None, &RecallConfig::default());
    assert_eq!(engine.start(), 2);
    engine.shutdown().await;
    engine.shutdown().await;
    assert_eq!(engine.status().retry_runs, 0);
}

#[test]
fn batch_logic_runs_without_a_runtime() {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let id = store.create(&MemoryRecord::new("notes", "t", "body", Utc::now())).unwrap();
    let engine = MaintenanceEngine::new(store.clone(), Arc::new(FixedProvider), None, &RecallConfig::default());

    let report = engine.retry_manager().process_batch(Utc::now()).unwrap();
    assert_eq!(report.succeeded, 1);
    assert_eq!(store.embedding(id).unwrap(), Some(vec![1.0, 0.0]));
    assert_eq!(engine.archival().run(Utc::now()).unwrap().archived, 0);
}

#[test]
fn retry_progress_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recall.db");

    let id = {
        let store = Arc::new(StorageEngine::open(&path).unwrap());
        let id = store.create(&MemoryRecord::new("notes", "t", "body", Utc::now())).unwrap();
        let engine = MaintenanceEngine::new(store, Arc::new(FixedProvider), None, &RecallConfig::default());
        engine.retry_manager().process_batch(Utc::now()).unwrap();
        id
    };

    let reopened = StorageEngine::open(&path).unwrap();
    let stats = reopened.embedding_stats().unwrap();
    assert_eq!(stats.success, 1);
    assert_eq!(stats.queue_size(), 0);
    assert_eq!(reopened.get(id).unwrap().unwrap().embedding_status, EmbeddingStatus::Success);
}
