use super::types::MemoryType;

/// Half-life in days for each memory type.
/// `None` means infinite (never decays).
pub fn half_life_days(memory_type: MemoryType) -> Option<f64> {
    match memory_type {
        MemoryType::Working => Some(1.0),
        MemoryType::Episodic => Some(7.0),
        MemoryType::Prospective => Some(14.0),
        MemoryType::Implicit => Some(30.0),
        MemoryType::Declarative => Some(60.0),
        MemoryType::Procedural => Some(90.0),
        MemoryType::Semantic => Some(180.0),
        MemoryType::Autobiographical => Some(365.0),
        MemoryType::MetaCognitive => None, // ∞
    }
}
