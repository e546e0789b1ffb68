//! Session orchestration around the gear engine.
//!
//! The engine only decides what to wear; something has to play the role of
//! the automation framework around it. This crate provides that:
//! - [`host`] simulates the framework's equip, lock and buff bookkeeping
//! - [`session`] drives the engine through full cast cycles, applying the
//!   framework's generic precast/midcast/aftercast equips around it
//! - [`script`] replays a TOML event script through a session
pub mod error;
pub mod host;
pub mod script;
pub mod session;

pub use error::{Result, RuntimeError};
pub use host::{HostCommand, SimulatedHost};
pub use script::{CastSpec, Script, ScriptEvent, ScriptLoader, ScriptSetup};
pub use session::{Session, Transcript, TranscriptEntry};
