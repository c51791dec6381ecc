use serde::{Deserialize, Serialize};

/// Independent feature flags. Each pipeline stage consults only its own flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Add a decaying boost to freshly created records.
    pub novelty_boost: bool,
    /// Penalize records with near-duplicate siblings.
    pub interference_penalty: bool,
    /// Min-max normalize composite and fused scores.
    pub score_normalization: bool,
    /// Use relative score fusion instead of reciprocal rank fusion.
    pub rsf_fusion: bool,
    /// Guarantee every contributing channel one slot in the result set.
    pub channel_min_representation: bool,
    /// Cut the result list at the first anomalous score gap.
    pub confidence_truncation: bool,
}

impl FeatureFlags {
    /// Environment variable read for each flag by [`FeatureFlags::with_env_overrides`].
    pub const ENV_VARS: [&'static str; 6] = [
        "RECALL_NOVELTY_BOOST",
        "RECALL_INTERFERENCE_PENALTY",
        "RECALL_SCORE_NORMALIZATION",
        "RECALL_RSF_FUSION",
        "RECALL_CHANNEL_MIN_REPRESENTATION",
        "RECALL_CONFIDENCE_TRUNCATION",
    ];

    /// Every flag on.
    pub fn all() -> Self {
        Self {
            novelty_boost: true,
            interference_penalty: true,
            score_normalization: true,
            rsf_fusion: true,
            channel_min_representation: true,
            confidence_truncation: true,
        }
    }

    /// Overlay flags from a variable lookup. Unset or unparseable variables keep
    /// the current value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let slots: [&mut bool; 6] = [
            &mut self.novelty_boost,
            &mut self.interference_penalty,
            &mut self.score_normalization,
            &mut self.rsf_fusion,
            &mut self.channel_min_representation,
            &mut self.confidence_truncation,
        ];
        for (slot, var) in slots.into_iter().zip(Self::ENV_VARS) {
            if let Some(value) = lookup(var).and_then(|v| parse_flag(&v)) {
                *slot = value;
            }
        }
        self
    }

    /// Overlay flags from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|var| std::env::var(var).ok())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
