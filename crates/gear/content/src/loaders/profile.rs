//! Profile loader: modes, classification tables, protected items, precast
//! overrides and rule names.

use std::path::Path;

use gear_core::{
    ClassificationTable, ClassificationTables, GearConfig, ModeSpec, RuleConfig, SetLibrary,
    SetPath, TableKind,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// A mode declaration: its name plus a toggle or cycle spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeDecl {
    pub name: String,
    #[serde(flatten)]
    pub spec: ModeSpec,
}

/// A classification table declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDecl {
    pub kind: TableKind,
    pub category: String,
    pub members: Vec<String>,
}

/// A precast override: the action name or category it triggers on and the set
/// to equip instead of the generic precast set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecastDecl {
    pub trigger: String,
    pub set: String,
}

/// Profile structure for TOML files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSpec {
    /// Display name, e.g. `"Red Mage"`.
    #[serde(default)]
    pub name: Option<String>,
    /// Effects tracked in addition to the ones the rules read.
    #[serde(default)]
    pub track_effects: Vec<String>,
    #[serde(default)]
    pub protected_items: Vec<String>,
    #[serde(default)]
    pub modes: Vec<ModeDecl>,
    #[serde(default)]
    pub tables: Vec<TableDecl>,
    #[serde(default)]
    pub precast: Vec<PrecastDecl>,
    #[serde(default)]
    pub rules: RuleConfig,
}

impl ProfileSpec {
    /// Builds the classifier from the declared tables.
    pub fn classification_tables(&self) -> ClassificationTables {
        ClassificationTables::new(
            self.tables
                .iter()
                .map(|t| ClassificationTable::new(t.kind, t.category.clone(), t.members.iter().cloned()))
                .collect(),
        )
    }

    /// Validates the profile against `library` and produces the engine
    /// configuration.
    pub fn build(self, library: SetLibrary) -> LoadResult<GearConfig> {
        let tables = self.classification_tables();
        let mut builder = GearConfig::builder(library)
            .tables(tables)
            .rules(self.rules);

        for mode in self.modes {
            builder = builder.mode(mode.name, mode.spec);
        }
        for effect in self.track_effects {
            builder = builder.track_effect(effect);
        }
        for item in self.protected_items {
            builder = builder.protect_item(item);
        }
        for precast in self.precast {
            builder = builder.precast_override(precast.trigger, SetPath::parse(&precast.set)?);
        }

        let config = builder.build()?;
        tracing::debug!(
            profile = self.name.as_deref().unwrap_or("unnamed"),
            sets = config.library().len(),
            tables = config.tables().len(),
            "profile built"
        );
        Ok(config)
    }
}

/// Loader for profiles from TOML files.
pub struct ProfileLoader;

impl ProfileLoader {
    /// Load a profile from a TOML file.
    pub fn load(path: &Path) -> LoadResult<ProfileSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a profile from TOML text.
    pub fn parse(content: &str) -> LoadResult<ProfileSpec> {
        let profile: ProfileSpec = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse profile TOML: {}", e))?;
        Ok(profile)
    }
}
