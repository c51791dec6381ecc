//! Novelty boost for freshly created records.

use chrono::{DateTime, Utc};

use recall_core::config::ScoringConfig;

/// `max · e^(−hours/decay)` inside the window since creation, else 0.
/// Future or missing creation times get no boost.
pub fn novelty_boost(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>, config: &ScoringConfig) -> f64 {
    let Some(created_at) = created_at else {
        return 0.0;
    };
    let hours = (now - created_at).num_milliseconds() as f64 / 3_600_000.0;
    if !(0.0..=config.novelty_window_hours).contains(&hours) || config.novelty_decay_hours <= 0.0 {
        return 0.0;
    }
    config.novelty_boost_max * (-hours / config.novelty_decay_hours).exp()
}

/// Add the boost, capping the result whenever a boost was applied.
pub fn apply_novelty(score: f64, boost: f64, cap: f64) -> f64 {
    if boost > 0.0 {
        (score + boost).min(cap)
    } else {
        score
    }
}
