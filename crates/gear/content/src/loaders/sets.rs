//! Set library loader.
//!
//! Sets are written as nested TOML tables; nesting maps to qualifiers:
//!
//! ```toml
//! [idle]
//! main = "Daybreak"
//! ring1 = { name = "Stikini Ring +1", augments = ["Path: A"] }
//!
//! [idle.Refresh]
//! base = "idle"
//! body = "Lethargy Sayon +3"
//! ```
//!
//! Keys that name a slot assign an item (`"empty"` unequips the slot), `base`
//! names one or more sets to compose under this one, and any other key holding
//! a table declares a child set. A table with only child sets is a namespace,
//! not a set.

use std::path::Path;

use gear_core::{Fragment, ItemRef, LibraryError, SetDecl, SetLibrary, SetPath, Slot, SlotValue};

use crate::loaders::{LoadResult, read_file};

const BASE_KEY: &str = "base";
const EMPTY_ITEM: &str = "empty";

/// Loader for the set library from TOML files.
pub struct SetsLoader;

impl SetsLoader {
    /// Load and resolve a set library from a TOML file.
    pub fn load(path: &Path) -> LoadResult<SetLibrary> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load sets from {}: {}", path.display(), e))
    }

    /// Parse and resolve a set library from TOML text.
    pub fn parse(content: &str) -> LoadResult<SetLibrary> {
        let table: toml::Table = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse sets TOML: {}", e))?;

        let mut builder = SetLibrary::builder();
        for decl in Self::declarations(&table)? {
            builder.push(decl);
        }
        let library = builder.build()?;

        tracing::debug!(sets = library.len(), "set library loaded");
        Ok(library)
    }

    /// Flattens a parsed TOML document into set declarations.
    pub fn declarations(table: &toml::Table) -> LoadResult<Vec<SetDecl>> {
        let mut decls = Vec::new();
        for (key, value) in table {
            collect(SetPath::parse(key)?, value, &mut decls)?;
        }
        Ok(decls)
    }
}

fn collect(path: SetPath, value: &toml::Value, decls: &mut Vec<SetDecl>) -> LoadResult<()> {
    let toml::Value::Table(table) = value else {
        anyhow::bail!("Set '{}' must be a table, found {}", path, value.type_str());
    };

    let mut bases = Vec::new();
    let mut slots = Fragment::builder();
    let mut is_set = false;
    let mut children = 0usize;

    for (key, entry) in table {
        if key == BASE_KEY {
            bases = parse_bases(&path, entry)?;
            is_set = true;
            continue;
        }

        match key.parse::<Slot>() {
            Ok(slot) => {
                slots = slots.value(slot, parse_slot_value(&path, key, entry)?);
                is_set = true;
            }
            Err(_) if entry.is_table() => {
                collect(path.child(key), entry, decls)?;
                children += 1;
            }
            Err(_) => {
                return Err(LibraryError::InvalidSlot {
                    path: path.to_string(),
                    slot: key.clone(),
                }
                .into());
            }
        }
    }

    // `[defense]` with nothing in it is still an (empty) set.
    if is_set || children == 0 {
        decls.push(SetDecl {
            path,
            bases,
            slots: slots.build(),
        });
    }
    Ok(())
}

fn parse_bases(path: &SetPath, entry: &toml::Value) -> LoadResult<Vec<SetPath>> {
    match entry {
        toml::Value::String(base) => Ok(vec![SetPath::parse(base)?]),
        toml::Value::Array(bases) => bases
            .iter()
            .map(|base| -> LoadResult<SetPath> {
                match base.as_str() {
                    Some(raw) => Ok(SetPath::parse(raw)?),
                    None => anyhow::bail!("Set '{}' has a non-string base: {}", path, base),
                }
            })
            .collect(),
        other => anyhow::bail!(
            "Set '{}' base must be a string or an array of strings, found {}",
            path,
            other.type_str()
        ),
    }
}

fn parse_slot_value(path: &SetPath, slot: &str, entry: &toml::Value) -> LoadResult<SlotValue> {
    match entry {
        toml::Value::String(name) if name.eq_ignore_ascii_case(EMPTY_ITEM) => Ok(SlotValue::Empty),
        toml::Value::String(name) => Ok(SlotValue::Item(ItemRef::new(name.as_str()))),
        toml::Value::Table(_) => {
            let item: ItemRef = entry
                .clone()
                .try_into()
                .map_err(|e| anyhow::anyhow!("Invalid item at {}.{}: {}", path, slot, e))?;
            Ok(SlotValue::Item(item))
        }
        other => anyhow::bail!(
            "Invalid item at {}.{}: expected a name or {{ name, augments }}, found {}",
            path,
            slot,
            other.type_str()
        ),
    }
}
