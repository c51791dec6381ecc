use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::RecallError;

/// Cognitive memory type. Selects the baseline half-life of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryType {
    Working,
    Episodic,
    Prospective,
    Implicit,
    Declarative,
    Procedural,
    Semantic,
    Autobiographical,
    MetaCognitive,
}

impl MemoryType {
    /// All variants, shortest half-life first.
    pub const ALL: [MemoryType; 9] = [
        Self::Working,
        Self::Episodic,
        Self::Prospective,
        Self::Implicit,
        Self::Declarative,
        Self::Procedural,
        Self::Semantic,
        Self::Autobiographical,
        Self::MetaCognitive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Working => "working",
            Self::Episodic => "episodic",
            Self::Prospective => "prospective",
            Self::Implicit => "implicit",
            Self::Declarative => "declarative",
            Self::Procedural => "procedural",
            Self::Semantic => "semantic",
            Self::Autobiographical => "autobiographical",
            Self::MetaCognitive => "meta-cognitive",
        }
    }

    /// Lenient parse used at the storage boundary: unknown names become `None`.
    pub fn normalize(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryType {
    type Err = RecallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| RecallError::invalid(format!("unknown memory type: {s}")))
    }
}
