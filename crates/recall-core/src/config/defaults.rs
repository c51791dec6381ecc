// Single source of truth for all default values.

// --- Scoring ---
pub const DEFAULT_INTERFERENCE_THRESHOLD: f64 = 0.75;
pub const DEFAULT_INTERFERENCE_PENALTY: f64 = 0.08;
pub const DEFAULT_NOVELTY_BOOST_MAX: f64 = 0.15;
pub const DEFAULT_NOVELTY_DECAY_HOURS: f64 = 12.0;
pub const DEFAULT_NOVELTY_WINDOW_HOURS: f64 = 48.0;
pub const DEFAULT_NOVELTY_SCORE_CAP: f64 = 0.95;

// --- Retrieval ---
pub const DEFAULT_RRF_K: u32 = 60;
pub const DEFAULT_CONVERGENCE_BONUS: f64 = 0.10;
pub const DEFAULT_GRAPH_WEIGHT_BOOST: f64 = 1.5;
pub const DEFAULT_CHANNEL_QUALITY_FLOOR: f64 = 0.2;
pub const DEFAULT_TERM_MATCH_BONUS: f64 = 0.05;
pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_TOKEN_BUDGET: usize = 2_000;
pub const DEFAULT_TRUNCATION_MIN_RESULTS: usize = 3;
pub const DEFAULT_TRUNCATION_GAP_MULTIPLIER: f64 = 2.0;

// --- Decay ---
pub const DEFAULT_HOT_THRESHOLD: f64 = 0.80;
pub const DEFAULT_WARM_THRESHOLD: f64 = 0.25;
pub const DEFAULT_COLD_THRESHOLD: f64 = 0.05;
pub const DEFAULT_ARCHIVE_AFTER_DAYS: f64 = 90.0;
pub const DEFAULT_ARCHIVE_RETRIEVABILITY: f64 = 0.02;
pub const DEFAULT_HOT_LIMIT: usize = 5;
pub const DEFAULT_WARM_LIMIT: usize = 10;
pub const DEFAULT_COLD_LIMIT: usize = 3;
pub const DEFAULT_DORMANT_LIMIT: usize = 2;
pub const DEFAULT_ARCHIVED_LIMIT: usize = 1;

// --- Validation ---
pub const DEFAULT_PROMOTION_CONFIDENCE: f64 = 0.90;
pub const DEFAULT_PROMOTION_VALIDATIONS: u32 = 5;

// --- Chunking ---
pub const DEFAULT_CHUNKING_TRIGGER_CHARS: usize = 50_000;
pub const DEFAULT_CHUNK_TARGET_CHARS: usize = 4_000;
pub const DEFAULT_CHUNK_MAX_CHARS: usize = 12_000;
pub const DEFAULT_PARENT_SUMMARY_CHARS: usize = 500;
pub const DEFAULT_THINNING_THRESHOLD: f64 = 0.3;

// --- Maintenance ---
pub const DEFAULT_ARCHIVAL_INTERVAL_SECS: u64 = 7_200; // 2 hours
pub const DEFAULT_ARCHIVAL_BATCH_SIZE: usize = 50;
pub const DEFAULT_RETRY_INTERVAL_SECS: u64 = 300; // 5 minutes
pub const DEFAULT_RETRY_BATCH_SIZE: usize = 5;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_SECS: [u64; 3] = [60, 300, 900];

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "recall.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
