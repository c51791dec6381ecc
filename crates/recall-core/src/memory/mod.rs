pub mod confidence;
pub mod half_lives;
pub mod record;
pub mod state;
pub mod tier;
pub mod types;

pub use confidence::Confidence;
pub use half_lives::half_life_days;
pub use record::{EmbeddingStatus, MemoryRecord};
pub use state::DecayState;
pub use tier::{ImportanceTier, TierConfig};
pub use types::MemoryType;
