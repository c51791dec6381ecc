//! Error taxonomy. Every subsystem error converts into [`RecallError`].

mod provider_error;
mod recall_error;
mod storage_error;

pub use provider_error::ProviderError;
pub use recall_error::{RecallError, RecallResult};
pub use storage_error::StorageError;
