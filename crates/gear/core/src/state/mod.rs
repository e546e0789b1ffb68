//! Equipment data types and session state.
//!
//! [`Fragment`] and [`compose`] form the layering model; [`TrackedState`]
//! stores the effects and modes the engine reads when picking layers.
mod error;
mod fragment;
mod modes;
mod slot;
mod tracked;

pub use error::StateError;
pub use fragment::{Fragment, FragmentBuilder, ItemRef, SlotValue, compose};
pub use modes::{ModeSpec, ModeValue};
pub use slot::{Slot, SlotSet};
pub use tracked::TrackedState;
