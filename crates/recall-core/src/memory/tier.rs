use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::RecallError;

/// Editorial priority of a record. Distinct from the decay-derived [`super::DecayState`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportanceTier {
    Constitutional,
    Critical,
    Important,
    #[default]
    Normal,
    Temporary,
    Deprecated,
}

/// Static behavior attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierConfig {
    /// Tier value used as the composite scorer's tier boost.
    pub value: f64,
    /// Multiplier applied by [`ImportanceTier::apply_boost`].
    pub search_boost: f64,
    /// Whether records of this tier lose retrievability over time.
    pub decays: bool,
    /// Days after which records of this tier expire.
    pub auto_expire_days: Option<u32>,
    pub excluded_from_search: bool,
    /// Injected into every result set regardless of query.
    pub always_surface: bool,
    pub max_tokens: Option<usize>,
    pub description: &'static str,
}

const CONSTITUTIONAL: TierConfig = TierConfig {
    value: 1.0,
    search_boost: 3.0,
    decays: false,
    auto_expire_days: None,
    excluded_from_search: false,
    always_surface: true,
    max_tokens: Some(2000),
    description: "Always surfaced rules and project constitution",
};

const CRITICAL: TierConfig = TierConfig {
    value: 1.0,
    search_boost: 2.0,
    decays: false,
    auto_expire_days: None,
    excluded_from_search: false,
    always_surface: false,
    max_tokens: None,
    description: "Validated, durable knowledge",
};

const IMPORTANT: TierConfig = TierConfig {
    value: 0.8,
    search_boost: 1.5,
    decays: false,
    auto_expire_days: None,
    excluded_from_search: false,
    always_surface: false,
    max_tokens: None,
    description: "Key decisions and context",
};

const NORMAL: TierConfig = TierConfig {
    value: 0.5,
    search_boost: 1.0,
    decays: true,
    auto_expire_days: None,
    excluded_from_search: false,
    always_surface: false,
    max_tokens: None,
    description: "Default tier",
};

const TEMPORARY: TierConfig = TierConfig {
    value: 0.3,
    search_boost: 0.5,
    decays: true,
    auto_expire_days: Some(7),
    excluded_from_search: false,
    always_surface: false,
    max_tokens: None,
    description: "Short-lived working notes",
};

const DEPRECATED: TierConfig = TierConfig {
    value: 0.1,
    search_boost: 0.0,
    decays: false,
    auto_expire_days: None,
    excluded_from_search: true,
    always_surface: false,
    max_tokens: None,
    description: "Superseded; kept for history only",
};

impl ImportanceTier {
    /// All tiers, most important first.
    pub const ALL: [ImportanceTier; 6] = [
        Self::Constitutional,
        Self::Critical,
        Self::Important,
        Self::Normal,
        Self::Temporary,
        Self::Deprecated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Constitutional => "constitutional",
            Self::Critical => "critical",
            Self::Important => "important",
            Self::Normal => "normal",
            Self::Temporary => "temporary",
            Self::Deprecated => "deprecated",
        }
    }

    pub fn config(self) -> &'static TierConfig {
        match self {
            Self::Constitutional => &CONSTITUTIONAL,
            Self::Critical => &CRITICAL,
            Self::Important => &IMPORTANT,
            Self::Normal => &NORMAL,
            Self::Temporary => &TEMPORARY,
            Self::Deprecated => &DEPRECATED,
        }
    }

    pub fn value(self) -> f64 {
        self.config().value
    }

    pub fn search_boost(self) -> f64 {
        self.config().search_boost
    }

    /// Multiply a raw search score by this tier's boost.
    pub fn apply_boost(self, score: f64) -> f64 {
        score * self.search_boost()
    }

    pub fn allows_decay(self) -> bool {
        self.config().decays
    }

    pub fn auto_expire_days(self) -> Option<u32> {
        self.config().auto_expire_days
    }

    pub fn is_excluded_from_search(self) -> bool {
        self.config().excluded_from_search
    }

    pub fn always_surface(self) -> bool {
        self.config().always_surface
    }

    pub fn max_tokens(self) -> Option<usize> {
        self.config().max_tokens
    }

    /// Importance multiplier used by the five-factor importance score.
    pub fn importance_multiplier(self) -> f64 {
        match self {
            Self::Constitutional => 2.0,
            Self::Critical => 1.5,
            Self::Important => 1.3,
            Self::Normal => 1.0,
            Self::Temporary => 0.6,
            Self::Deprecated => 0.1,
        }
    }

    /// Constitutional and critical records never decay and are never demoted.
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Constitutional | Self::Critical)
    }

    /// Lenient parse used at the storage boundary: unknown or empty names become `Normal`.
    pub fn normalize(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Tiers ordered from most to least important.
    pub fn by_importance() -> Vec<ImportanceTier> {
        Self::ALL.to_vec()
    }

    fn rank(self) -> u8 {
        match self {
            Self::Deprecated => 0,
            Self::Temporary => 1,
            Self::Normal => 2,
            Self::Important => 3,
            Self::Critical => 4,
            Self::Constitutional => 5,
        }
    }
}

impl fmt::Display for ImportanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportanceTier {
    type Err = RecallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| RecallError::invalid(format!("unknown importance tier: {s}")))
    }
}

impl PartialOrd for ImportanceTier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Higher importance compares greater.
impl Ord for ImportanceTier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}
