//! Common error infrastructure for gear-core.
//!
//! Domain-specific errors (`LibraryError`, `StateError`, `ConfigError`,
//! `EngineError`) live next to the code that produces them. This module holds
//! the shared classification used by every one of them.
//!
//! # Design Principles
//!
//! - **Configuration errors abort setup**: a library or table that cannot be
//!   wired is rejected before the first host event is dispatched
//! - **Events do not fail**: once built, the engine always has a fallback path,
//!   so per-event errors are limited to invalid mode values

/// Severity level of an error, used for categorization and reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input supplied at runtime (e.g. a mode value outside its options).
    ///
    /// The event is rejected; engine state is unchanged.
    Validation,

    /// The configuration is not usable and the session must not start.
    ///
    /// Examples: unknown set path, cyclic composition, bad mode default
    Configuration,

    /// Unexpected inconsistency between engine and host.
    ///
    /// These indicate bugs and should be investigated.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Configuration => "configuration",
            Self::Internal => "internal",
        }
    }

    /// Returns true if the session can keep running after this error.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation)
    }
}

/// Common trait for all gear-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity by when the error can occur, not by impact
pub trait GearError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Used for log fields and test assertions.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
