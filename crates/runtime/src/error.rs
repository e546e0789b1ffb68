//! Errors surfaced by sessions and script replay.
use std::path::PathBuf;

use gear_core::{EngineError, ErrorSeverity, GearError, StateError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("action '{in_flight}' is still being cast")]
    ActionInFlight { in_flight: String },

    #[error("no action is being cast")]
    NoActionInFlight,

    #[error("failed to read script {path}")]
    ScriptIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse script: {0}")]
    ScriptParse(String),
}

impl GearError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Engine(e) => e.severity(),
            Self::State(e) => e.severity(),
            Self::ActionInFlight { .. } | Self::NoActionInFlight => ErrorSeverity::Validation,
            Self::ScriptIo { .. } | Self::ScriptParse(_) => ErrorSeverity::Configuration,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Engine(e) => e.error_code(),
            Self::State(e) => e.error_code(),
            Self::ActionInFlight { .. } => "RUNTIME_ACTION_IN_FLIGHT",
            Self::NoActionInFlight => "RUNTIME_NO_ACTION_IN_FLIGHT",
            Self::ScriptIo { .. } => "RUNTIME_SCRIPT_IO",
            Self::ScriptParse(_) => "RUNTIME_SCRIPT_PARSE",
        }
    }
}
