//! Profile factory for building engine configuration from a data directory.

use std::path::{Path, PathBuf};

use gear_core::{GearConfig, SetLibrary};

use crate::loaders::{LoadResult, ProfileLoader, ProfileSpec, SetsLoader};

/// Profile factory that loads a gear profile from a data directory.
///
/// # Directory Structure
///
/// ```text
/// profile_dir/
/// ├── profile.toml
/// └── sets.toml
/// ```
pub struct ProfileFactory {
    data_dir: PathBuf,
}

impl ProfileFactory {
    /// Creates a new factory pointing to a profile directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the set library from `sets.toml`.
    pub fn load_sets(&self) -> LoadResult<SetLibrary> {
        SetsLoader::load(&self.data_dir.join("sets.toml"))
    }

    /// Load the profile declarations from `profile.toml`.
    pub fn load_profile(&self) -> LoadResult<ProfileSpec> {
        ProfileLoader::load(&self.data_dir.join("profile.toml"))
    }

    /// Load both files and build a validated configuration.
    pub fn build_config(&self) -> LoadResult<GearConfig> {
        let library = self.load_sets()?;
        let profile = self.load_profile()?;
        profile.build(library).map_err(|e| {
            anyhow::anyhow!("Invalid profile in {}: {}", self.data_dir.display(), e)
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;

    #[test]
    fn builds_from_a_directory_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sets.toml"), builtin::RED_MAGE_SETS).unwrap();
        std::fs::write(dir.path().join("profile.toml"), builtin::RED_MAGE_PROFILE).unwrap();

        let config = ProfileFactory::new(dir.path()).build_config().unwrap();
        assert!(config.is_protected("Warp Ring"));
    }

    #[test]
    fn missing_profile_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sets.toml"), "[idle]\n").unwrap();

        let err = ProfileFactory::new(dir.path()).build_config().unwrap_err();
        assert!(err.to_string().contains("profile.toml"));
    }
}
