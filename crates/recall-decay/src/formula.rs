use chrono::{DateTime, Utc};

use recall_core::constants::{
    FSRS_DECAY, FSRS_FACTOR, FSRS_HALF_LIFE_FACTOR, INFINITE_STABILITY, MS_PER_DAY,
};

/// Retention target used when scheduling the next review.
pub const DEFAULT_DESIRED_RETENTION: f64 = 0.9;

/// FSRS power-law retrievability.
///
/// ```text
/// R(S, t) = (1 + F · t / S)^-0.5,   F = 19/81
/// ```
///
/// Returns 0.0 for non-positive stability or negative elapsed time, and is
/// clamped to [0.0, 1.0].
pub fn retrievability(stability: f64, elapsed_days: f64) -> f64 {
    if stability.is_nan() || stability <= 0.0 || elapsed_days.is_nan() || elapsed_days < 0.0 {
        return 0.0;
    }
    let r = (1.0 + FSRS_FACTOR * (elapsed_days / stability)).powf(FSRS_DECAY);
    r.clamp(0.0, 1.0)
}

/// Stability at which R falls to 0.5 after `half_life_days`.
///
/// `None` or a non-positive half-life means no decay and yields
/// [`INFINITE_STABILITY`].
pub fn half_life_to_stability(half_life_days: Option<f64>) -> f64 {
    match half_life_days {
        Some(h) if h > 0.0 => FSRS_HALF_LIFE_FACTOR * h,
        _ => INFINITE_STABILITY,
    }
}

/// Days until R drops to `desired_retention`, rounded, at least 1.
/// Invalid stability or retention yields 1.
pub fn optimal_interval(stability: f64, desired_retention: f64) -> u32 {
    let retention_valid = desired_retention > 0.0 && desired_retention < 1.0;
    if stability.is_nan() || stability <= 0.0 || !retention_valid {
        return 1;
    }
    let interval = (stability / FSRS_FACTOR) * (desired_retention.powf(1.0 / FSRS_DECAY) - 1.0);
    let rounded = interval.round();
    if rounded < 1.0 {
        1
    } else if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Fractional days from `since` to `now`. Negative when `since` is in the future.
pub fn elapsed_days(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - since).num_milliseconds() as f64 / MS_PER_DAY
}
