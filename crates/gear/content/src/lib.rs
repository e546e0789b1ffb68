//! Data-driven gear profiles and their loaders.
//!
//! A profile is two TOML documents:
//! - `sets.toml` declares the set library (nested tables become dotted set
//!   paths, `base` composes sets)
//! - `profile.toml` declares modes, classification tables, protected items,
//!   precast overrides and rule names
//!
//! Loaders turn them into a validated [`gear_core::GearConfig`]. A Red Mage
//! profile ships with the crate as builtin data.

#[cfg(feature = "loaders")]
pub mod builtin;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    LoadResult, ModeDecl, PrecastDecl, ProfileFactory, ProfileLoader, ProfileSpec, SetsLoader,
    TableDecl,
};
