//! Min-max score normalization.

/// Rescale to [0, 1] preserving order. Non-finite scores count as 0. A
/// singleton or all-equal batch maps every element to 1.0.
pub fn normalize_scores(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let clean: Vec<f64> = scores
        .iter()
        .map(|s| if s.is_finite() { *s } else { 0.0 })
        .collect();
    let min = clean.iter().copied().fold(f64::INFINITY, f64::min);
    let max = clean.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range <= 0.0 {
        return vec![1.0; clean.len()];
    }
    clean.into_iter().map(|s| (s - min) / range).collect()
}

/// [`normalize_scores`] when `enabled`, otherwise the input unchanged.
pub fn normalize_if(scores: &[f64], enabled: bool) -> Vec<f64> {
    if enabled {
        normalize_scores(scores)
    } else {
        scores.to_vec()
    }
}
