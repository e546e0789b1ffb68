use crate::error::{ErrorSeverity, GearError};

/// Errors raised by the tracked-state store.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("mode '{mode}' is not registered")]
    UnknownMode { mode: String },

    #[error("invalid value '{value}' for mode '{mode}' (expected one of: {options})")]
    InvalidModeValue {
        mode: String,
        value: String,
        options: String,
    },
}

impl GearError for StateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownMode { .. } => "STATE_UNKNOWN_MODE",
            Self::InvalidModeValue { .. } => "STATE_INVALID_MODE_VALUE",
        }
    }
}
