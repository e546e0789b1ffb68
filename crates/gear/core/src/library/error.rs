use super::SetPath;
use crate::error::{ErrorSeverity, GearError};

/// Errors raised while building or querying the set library.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error("invalid set path '{path}'")]
    InvalidPath { path: String },

    #[error(
        "unknown set '{path}'{}",
        .referenced_by.as_ref().map(|p| format!(" (referenced by '{p}')")).unwrap_or_default()
    )]
    UnknownCategory {
        path: SetPath,
        referenced_by: Option<SetPath>,
    },

    #[error("set '{path}' is declared more than once")]
    DuplicateSet { path: SetPath },

    #[error("cyclic set composition: {cycle}")]
    CyclicComposition { cycle: String },

    #[error("set '{path}' names unknown slot '{slot}'")]
    InvalidSlot { path: String, slot: String },
}

impl GearError for LibraryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Configuration
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPath { .. } => "LIBRARY_INVALID_PATH",
            Self::UnknownCategory { .. } => "LIBRARY_UNKNOWN_CATEGORY",
            Self::DuplicateSet { .. } => "LIBRARY_DUPLICATE_SET",
            Self::CyclicComposition { .. } => "LIBRARY_CYCLIC_COMPOSITION",
            Self::InvalidSlot { .. } => "LIBRARY_INVALID_SLOT",
        }
    }
}
