//! Content loaders for reading profile data from files.

pub mod factory;
pub mod profile;
pub mod sets;

pub use factory::ProfileFactory;
pub use profile::{ModeDecl, PrecastDecl, ProfileLoader, ProfileSpec, TableDecl};
pub use sets::SetsLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
