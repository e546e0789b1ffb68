//! Profiles shipped with the crate.

use gear_core::GearConfig;

use crate::loaders::{LoadResult, ProfileLoader, SetsLoader};

/// Red Mage set library.
pub const RED_MAGE_SETS: &str = include_str!("../data/rdm/sets.toml");

/// Red Mage modes, tables and rules.
pub const RED_MAGE_PROFILE: &str = include_str!("../data/rdm/profile.toml");

/// Names accepted by [`by_name`].
pub const PROFILES: [&str; 1] = ["rdm"];

/// Builds the builtin Red Mage configuration.
pub fn red_mage() -> LoadResult<GearConfig> {
    let library = SetsLoader::parse(RED_MAGE_SETS)?;
    ProfileLoader::parse(RED_MAGE_PROFILE)?.build(library)
}

/// Looks up a builtin profile by name (case-insensitive).
pub fn by_name(name: &str) -> LoadResult<GearConfig> {
    match name.to_ascii_lowercase().as_str() {
        "rdm" | "red_mage" => red_mage(),
        other => anyhow::bail!(
            "Unknown builtin profile '{}' (available: {})",
            other,
            PROFILES.join(", ")
        ),
    }
}
