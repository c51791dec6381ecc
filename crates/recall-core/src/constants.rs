/// Recall system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// FSRS power-law factor F in R(S,t) = (1 + F·t/S)^-0.5.
pub const FSRS_FACTOR: f64 = 19.0 / 81.0;

/// FSRS decay exponent.
pub const FSRS_DECAY: f64 = -0.5;

/// S = HALF_LIFE_FACTOR · h is the stability at which R(S, h) = 0.5.
pub const FSRS_HALF_LIFE_FACTOR: f64 = 19.0 / 243.0;

/// Stability used for records that never decay.
pub const INFINITE_STABILITY: f64 = 999_999.0;

/// Stability assumed when a record has none stored.
pub const DEFAULT_STABILITY: f64 = 1.0;

/// Initial FSRS difficulty.
pub const DEFAULT_DIFFICULTY: f64 = 5.0;

/// Half-life for non-protected tiers without a type or override (days).
pub const DEFAULT_TIER_HALF_LIFE_DAYS: f64 = 60.0;

/// Importance weight assumed when none is stored.
pub const DEFAULT_IMPORTANCE_WEIGHT: f64 = 0.5;

/// Maximum records touched by one bulk operation.
pub const MAX_BULK_BATCH_SIZE: usize = 1000;

/// Milliseconds per day, for elapsed-time conversions.
pub const MS_PER_DAY: f64 = 86_400_000.0;
