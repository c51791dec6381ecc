use std::fmt;

use serde::{Deserialize, Serialize};

/// Decay-derived state of a record. Never stored; recomputed on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DecayState {
    Hot,
    Warm,
    Cold,
    Dormant,
    Archived,
}

impl DecayState {
    /// Priority order used when redistributing result slots.
    pub const PRIORITY: [DecayState; 5] = [
        Self::Hot,
        Self::Warm,
        Self::Cold,
        Self::Dormant,
        Self::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "HOT",
            Self::Warm => "WARM",
            Self::Cold => "COLD",
            Self::Dormant => "DORMANT",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for DecayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
