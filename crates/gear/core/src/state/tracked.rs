//! Tracked effects and mode values for a character session.

use std::collections::BTreeMap;

use super::{ModeSpec, ModeValue, StateError};
use crate::env::PlayerOracle;

#[derive(Clone, Debug, PartialEq, Eq)]
struct ModeEntry {
    spec: ModeSpec,
    value: ModeValue,
}

/// Session state the engine must remember between callbacks.
///
/// Holds the active/inactive flag of every registered effect and the current
/// value of every registered mode. Only the engine writes to it, and only in
/// response to host callbacks.
///
/// Effect names are matched case-insensitively because hosts report buff names
/// in lowercase while configuration usually spells them in title case.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackedState {
    effects: BTreeMap<String, bool>,
    modes: BTreeMap<String, ModeEntry>,
}

impl TrackedState {
    /// Creates a store with every effect inactive and every mode at its
    /// default.
    ///
    /// # Errors
    ///
    /// Returns `StateError::InvalidModeValue` if a mode's default is not one of
    /// its options.
    pub fn new<'a, E, M>(effects: E, modes: M) -> Result<Self, StateError>
    where
        E: IntoIterator<Item = &'a str>,
        M: IntoIterator<Item = (&'a str, &'a ModeSpec)>,
    {
        let effects = effects
            .into_iter()
            .map(|name| (effect_key(name), false))
            .collect();

        let mut entries = BTreeMap::new();
        for (name, spec) in modes {
            let value = spec.default_value(name)?;
            entries.insert(
                name.to_string(),
                ModeEntry {
                    spec: spec.clone(),
                    value,
                },
            );
        }

        Ok(Self {
            effects,
            modes: entries,
        })
    }

    /// Seeds every tracked effect from the host's current buff list.
    pub fn sync_effects(&mut self, oracle: &(impl PlayerOracle + ?Sized)) {
        for (name, active) in self.effects.iter_mut() {
            *active = oracle.has_effect(name);
        }
    }

    /// Returns true if `name` is registered for tracking.
    pub fn is_tracked(&self, name: &str) -> bool {
        self.effects.contains_key(&effect_key(name))
    }

    /// Returns whether a tracked effect is active. Untracked effects read as
    /// inactive.
    pub fn effect(&self, name: &str) -> bool {
        self.effects.get(&effect_key(name)).copied().unwrap_or(false)
    }

    /// Records an effect gain or loss.
    ///
    /// Returns `false` (and changes nothing) when the effect is not tracked;
    /// hosts notify on every effect, so this is not an error.
    pub fn set_effect(&mut self, name: &str, active: bool) -> bool {
        match self.effects.get_mut(&effect_key(name)) {
            Some(slot) => {
                *slot = active;
                true
            }
            None => {
                tracing::trace!(effect = name, "ignoring untracked effect");
                false
            }
        }
    }

    /// Iterates tracked effects with their current flags.
    pub fn effects(&self) -> impl Iterator<Item = (&str, bool)> {
        self.effects.iter().map(|(name, active)| (name.as_str(), *active))
    }

    /// Returns the current value of a mode.
    pub fn mode(&self, name: &str) -> Option<&ModeValue> {
        self.modes.get(name).map(|entry| &entry.value)
    }

    /// Returns the declaration of a mode.
    pub fn mode_spec(&self, name: &str) -> Option<&ModeSpec> {
        self.modes.get(name).map(|entry| &entry.spec)
    }

    /// Returns true if `name` is a toggle that is currently on.
    pub fn is_on(&self, name: &str) -> bool {
        self.mode(name).is_some_and(ModeValue::is_on)
    }

    /// Returns the current option of a cycle mode.
    pub fn choice(&self, name: &str) -> Option<&str> {
        self.mode(name).and_then(ModeValue::as_choice)
    }

    /// Sets a mode, returning the previous value.
    ///
    /// # Errors
    ///
    /// - `StateError::UnknownMode` if the mode was never registered
    /// - `StateError::InvalidModeValue` if `value` is not a legal option
    pub fn set_mode(&mut self, name: &str, value: ModeValue) -> Result<ModeValue, StateError> {
        let entry = self.entry_mut(name)?;
        entry.spec.validate(name, &value)?;
        Ok(core::mem::replace(&mut entry.value, value))
    }

    /// Advances a cycle mode (or flips a toggle), returning the new value.
    pub fn cycle_mode(&mut self, name: &str) -> Result<ModeValue, StateError> {
        let entry = self.entry_mut(name)?;
        entry.value = entry.spec.next(&entry.value);
        Ok(entry.value.clone())
    }

    /// Iterates registered modes with their declarations.
    pub fn modes(&self) -> impl Iterator<Item = (&str, &ModeSpec, &ModeValue)> {
        self.modes
            .iter()
            .map(|(name, entry)| (name.as_str(), &entry.spec, &entry.value))
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut ModeEntry, StateError> {
        self.modes.get_mut(name).ok_or_else(|| StateError::UnknownMode {
            mode: name.to_string(),
        })
    }
}

fn effect_key(name: &str) -> String {
    name.to_ascii_lowercase()
}
