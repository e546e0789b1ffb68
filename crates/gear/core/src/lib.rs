//! Deterministic equipment-selection engine.
//!
//! `gear-core` decides which items a character should wear in response to host
//! callbacks (precast, midcast, aftercast, buff and mode changes) and applies the
//! result through the host's equip primitives. It owns no I/O: configuration is
//! built once into a [`GearConfig`], and every callback flows through
//! [`engine::GearEngine`], which borrows that configuration for the session.
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod library;
pub mod state;

pub use action::{
    ActionDescriptor, ClassificationTable, ClassificationTables, Element, Skill, TableKind,
    TargetKind, TableOverlap,
};
pub use config::{ConfigError, GearConfig, GearConfigBuilder, PrecastOverride, RuleConfig};
pub use engine::{
    BaselineStatus, DispatchOutcome, EngineError, GearEngine, HostEvent, LockReason, Phase,
    SlotLocks,
};
pub use env::{CommandSink, GearHost, PlayerOracle};
pub use error::{ErrorSeverity, GearError};
pub use library::{LibraryError, SetDecl, SetLibrary, SetLibraryBuilder, SetPath};
pub use state::{
    Fragment, FragmentBuilder, ItemRef, ModeSpec, ModeValue, Slot, SlotSet, SlotValue,
    StateError, TrackedState, compose,
};
