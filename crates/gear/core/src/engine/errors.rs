//! Errors surfaced while dispatching host events.

use crate::error::{ErrorSeverity, GearError};
use crate::library::LibraryError;
use crate::state::StateError;

/// Errors surfaced while dispatching a host event.
///
/// Configuration is validated before the engine starts, so the library
/// variant only appears if a host feeds the engine a configuration it did not
/// build through [`crate::GearConfigBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("mode update rejected: {0}")]
    State(#[from] StateError),

    #[error("set lookup failed: {0}")]
    Library(#[from] LibraryError),
}

impl GearError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::State(e) => e.severity(),
            Self::Library(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::State(e) => e.error_code(),
            Self::Library(e) => e.error_code(),
        }
    }
}
