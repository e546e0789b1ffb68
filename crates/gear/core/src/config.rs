//! Immutable engine configuration.
//!
//! [`GearConfig`] bundles everything the engine reads but never writes: the set
//! library, the classification tables, mode declarations, tracked effects,
//! protected items and the rule names. It is built and validated once, then
//! borrowed by [`crate::engine::GearEngine`] for the whole session.

use std::collections::BTreeSet;

use crate::action::ClassificationTables;
use crate::error::{ErrorSeverity, GearError};
use crate::library::{LibraryError, SetLibrary, SetPath};
use crate::state::{ModeSpec, StateError, TrackedState};

/// Names of the effects, modes and sets the engine's rules refer to.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuleConfig {
    /// Self-buff that boosts enfeebling potency.
    pub potency_effect: String,
    /// Self-buff that, together with the potency buff, unlocks maximum duration.
    pub duration_effect: String,
    /// Self-buff that extends enhancing duration on the caster.
    pub composure_effect: String,
    /// Incapacitating condition that pins rings and waist.
    pub incapacitation_effect: String,
    /// Notification sent when the incapacitating condition is gained.
    pub incapacitation_message: String,

    pub offense_mode: String,
    pub idle_mode: String,
    pub casting_mode: String,
    pub defense_mode: String,
    /// Defense-mode value meaning "no defense set".
    pub defense_neutral: String,
    pub kiting_mode: String,
    pub magic_burst_mode: String,
    /// Toggle that pins the weapon slots.
    pub weapon_lock_mode: String,

    pub idle_set: String,
    pub engaged_set: String,
    pub defense_set: String,
    pub kiting_set: String,
    pub potency_set: String,
    pub composure_set: String,
    pub incapacitation_set: String,
    pub max_duration_set: String,
    pub burst_set: String,
    pub burst_engaged_set: String,
}

impl RuleConfig {
    pub const DEFAULT_POTENCY_EFFECT: &'static str = "Saboteur";
    pub const DEFAULT_DURATION_EFFECT: &'static str = "Stymie";
    pub const DEFAULT_COMPOSURE_EFFECT: &'static str = "Composure";
    pub const DEFAULT_INCAPACITATION_EFFECT: &'static str = "doom";
    pub const DEFAULT_INCAPACITATION_MESSAGE: &'static str = "Doomed! Swapping to cursna gear.";

    pub fn new() -> Self {
        Self {
            potency_effect: Self::DEFAULT_POTENCY_EFFECT.into(),
            duration_effect: Self::DEFAULT_DURATION_EFFECT.into(),
            composure_effect: Self::DEFAULT_COMPOSURE_EFFECT.into(),
            incapacitation_effect: Self::DEFAULT_INCAPACITATION_EFFECT.into(),
            incapacitation_message: Self::DEFAULT_INCAPACITATION_MESSAGE.into(),

            offense_mode: "OffenseMode".into(),
            idle_mode: "IdleMode".into(),
            casting_mode: "CastingMode".into(),
            defense_mode: "DefenseMode".into(),
            defense_neutral: "None".into(),
            kiting_mode: "Kiting".into(),
            magic_burst_mode: "MagicBurst".into(),
            weapon_lock_mode: "WeaponLock".into(),

            idle_set: "idle".into(),
            engaged_set: "engaged".into(),
            defense_set: "defense".into(),
            kiting_set: "kiting".into(),
            potency_set: "buff.Saboteur".into(),
            composure_set: "buff.Composure".into(),
            incapacitation_set: "buff.Doom".into(),
            max_duration_set: "midcast.Sleeps.MaxDuration".into(),
            burst_set: "magic_burst".into(),
            burst_engaged_set: "magic_burst.Engaged".into(),
        }
    }

    /// Effects the rules read; always tracked.
    pub fn rule_effects(&self) -> [&str; 4] {
        [
            self.potency_effect.as_str(),
            self.duration_effect.as_str(),
            self.composure_effect.as_str(),
            self.incapacitation_effect.as_str(),
        ]
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A precast set that replaces the framework's generic precast equip.
///
/// Used for actions that can only be cast with a specific item worn (a body
/// piece, a two-handed implement) or whose fast-cast set must differ.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrecastOverride {
    /// Action name or category this override applies to.
    pub trigger: String,
    pub set: SetPath,
}

/// Resolved set paths for every rule, checked against the library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RuleSets {
    pub idle: SetPath,
    pub engaged: SetPath,
    pub defense: SetPath,
    pub kiting: SetPath,
    pub potency: SetPath,
    pub composure: SetPath,
    pub incapacitation: SetPath,
    pub max_duration: SetPath,
    pub burst: SetPath,
    pub burst_engaged: SetPath,
}

impl RuleSets {
    fn from_rules(rules: &RuleConfig) -> Result<Self, LibraryError> {
        Ok(Self {
            idle: SetPath::parse(&rules.idle_set)?,
            engaged: SetPath::parse(&rules.engaged_set)?,
            defense: SetPath::parse(&rules.defense_set)?,
            kiting: SetPath::parse(&rules.kiting_set)?,
            potency: SetPath::parse(&rules.potency_set)?,
            composure: SetPath::parse(&rules.composure_set)?,
            incapacitation: SetPath::parse(&rules.incapacitation_set)?,
            max_duration: SetPath::parse(&rules.max_duration_set)?,
            burst: SetPath::parse(&rules.burst_set)?,
            burst_engaged: SetPath::parse(&rules.burst_engaged_set)?,
        })
    }

    /// Every rule path that must name a set. `defense` is only a prefix; its
    /// per-option children are checked separately.
    fn required(&self) -> [&SetPath; 9] {
        [
            &self.idle,
            &self.engaged,
            &self.kiting,
            &self.potency,
            &self.composure,
            &self.incapacitation,
            &self.max_duration,
            &self.burst,
            &self.burst_engaged,
        ]
    }
}

/// Errors raised while validating a configuration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("rule refers to mode '{mode}', which is not declared")]
    MissingMode { mode: String },

    #[error("mode '{mode}' must be a {expected}")]
    ModeKindMismatch { mode: String, expected: &'static str },

    #[error("mode '{mode}' is declared more than once")]
    DuplicateMode { mode: String },
}

impl GearError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Configuration
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Library(e) => e.error_code(),
            Self::State(e) => e.error_code(),
            Self::MissingMode { .. } => "CONFIG_MISSING_MODE",
            Self::ModeKindMismatch { .. } => "CONFIG_MODE_KIND_MISMATCH",
            Self::DuplicateMode { .. } => "CONFIG_DUPLICATE_MODE",
        }
    }
}

/// Validated, immutable engine configuration.
#[derive(Clone, Debug)]
pub struct GearConfig {
    library: SetLibrary,
    tables: ClassificationTables,
    modes: Vec<(String, ModeSpec)>,
    tracked_effects: BTreeSet<String>,
    protected_items: BTreeSet<String>,
    precast_overrides: Vec<PrecastOverride>,
    rules: RuleConfig,
    rule_sets: RuleSets,
}

impl GearConfig {
    pub fn builder(library: SetLibrary) -> GearConfigBuilder {
        GearConfigBuilder::new(library)
    }

    pub fn library(&self) -> &SetLibrary {
        &self.library
    }

    pub fn tables(&self) -> &ClassificationTables {
        &self.tables
    }

    pub fn modes(&self) -> impl Iterator<Item = (&str, &ModeSpec)> {
        self.modes.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn tracked_effects(&self) -> impl Iterator<Item = &str> {
        self.tracked_effects.iter().map(String::as_str)
    }

    /// Returns true if `item` must never be swapped out automatically.
    pub fn is_protected(&self, item: &str) -> bool {
        self.protected_items.contains(item)
    }

    pub fn protected_items(&self) -> impl Iterator<Item = &str> {
        self.protected_items.iter().map(String::as_str)
    }

    /// Finds the precast override for an action, by name first, then category.
    pub fn precast_override(&self, action: &str, category: &str) -> Option<&PrecastOverride> {
        self.precast_overrides
            .iter()
            .find(|o| o.trigger == action)
            .or_else(|| self.precast_overrides.iter().find(|o| o.trigger == category))
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub(crate) fn rule_sets(&self) -> &RuleSets {
        &self.rule_sets
    }

    /// Creates a fresh tracked-state store with every mode at its default.
    pub fn initial_state(&self) -> Result<TrackedState, StateError> {
        TrackedState::new(
            self.tracked_effects(),
            self.modes.iter().map(|(name, spec)| (name.as_str(), spec)),
        )
    }
}

/// Builder that validates a [`GearConfig`].
#[derive(Clone, Debug)]
pub struct GearConfigBuilder {
    library: SetLibrary,
    tables: ClassificationTables,
    modes: Vec<(String, ModeSpec)>,
    tracked_effects: BTreeSet<String>,
    protected_items: BTreeSet<String>,
    precast_overrides: Vec<PrecastOverride>,
    rules: RuleConfig,
}

impl GearConfigBuilder {
    pub fn new(library: SetLibrary) -> Self {
        Self {
            library,
            tables: ClassificationTables::default(),
            modes: Vec::new(),
            tracked_effects: BTreeSet::new(),
            protected_items: BTreeSet::new(),
            precast_overrides: Vec::new(),
            rules: RuleConfig::default(),
        }
    }

    pub fn tables(mut self, tables: ClassificationTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn mode(mut self, name: impl Into<String>, spec: ModeSpec) -> Self {
        self.modes.push((name.into(), spec));
        self
    }

    pub fn track_effect(mut self, effect: impl Into<String>) -> Self {
        self.tracked_effects.insert(effect.into());
        self
    }

    pub fn protect_item(mut self, item: impl Into<String>) -> Self {
        self.protected_items.insert(item.into());
        self
    }

    pub fn precast_override(mut self, trigger: impl Into<String>, set: SetPath) -> Self {
        self.precast_overrides.push(PrecastOverride {
            trigger: trigger.into(),
            set,
        });
        self
    }

    pub fn rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - `LibraryError::UnknownCategory` for any rule set, precast override set
    ///   or non-neutral `defense.<option>` set missing from the library
    /// - `StateError::InvalidModeValue` for a mode default outside its options
    /// - `ConfigError::MissingMode` / `ModeKindMismatch` when a rule mode is not
    ///   declared with the expected shape
    pub fn build(mut self) -> Result<GearConfig, ConfigError> {
        let rule_sets = RuleSets::from_rules(&self.rules)?;
        for path in rule_sets.required() {
            self.library.get(path)?;
        }
        for precast in &self.precast_overrides {
            self.library.get(&precast.set)?;
        }

        let mut seen = BTreeSet::new();
        for (name, spec) in &self.modes {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateMode { mode: name.clone() });
            }
            spec.default_value(name)?;
        }

        let toggles = [
            &self.rules.kiting_mode,
            &self.rules.magic_burst_mode,
            &self.rules.weapon_lock_mode,
        ];
        for mode in toggles {
            match self.find_mode(mode) {
                Some(ModeSpec::Toggle { .. }) => {}
                Some(ModeSpec::Cycle { .. }) => {
                    return Err(ConfigError::ModeKindMismatch {
                        mode: mode.clone(),
                        expected: "toggle",
                    });
                }
                None => return Err(ConfigError::MissingMode { mode: mode.clone() }),
            }
        }

        // Offense, idle and casting modes are optional qualifiers; the defense
        // mode is required because its neutral value gates the movement set.
        let cycles = [
            (&self.rules.offense_mode, false),
            (&self.rules.idle_mode, false),
            (&self.rules.casting_mode, false),
            (&self.rules.defense_mode, true),
        ];
        for (mode, required) in cycles {
            match self.find_mode(mode) {
                Some(ModeSpec::Cycle { .. }) => {}
                Some(ModeSpec::Toggle { .. }) => {
                    return Err(ConfigError::ModeKindMismatch {
                        mode: mode.clone(),
                        expected: "cycle",
                    });
                }
                None if required => return Err(ConfigError::MissingMode { mode: mode.clone() }),
                None => {}
            }
        }

        if let Some(ModeSpec::Cycle { options, .. }) = self.find_mode(&self.rules.defense_mode) {
            for option in options {
                if *option != self.rules.defense_neutral {
                    self.library.get(&rule_sets.defense.child(option))?;
                }
            }
        }

        for effect in self.rules.rule_effects() {
            self.tracked_effects.insert(effect.to_string());
        }

        for overlap in self.tables.overlaps() {
            tracing::warn!(
                action = %overlap.action,
                winner = %overlap.winner,
                shadowed = %overlap.shadowed,
                "action listed in more than one classification table"
            );
        }

        Ok(GearConfig {
            library: self.library,
            tables: self.tables,
            modes: self.modes,
            tracked_effects: self.tracked_effects,
            protected_items: self.protected_items,
            precast_overrides: self.precast_overrides,
            rules: self.rules,
            rule_sets,
        })
    }

    fn find_mode(&self, name: &str) -> Option<&ModeSpec> {
        self.modes
            .iter()
            .find(|(mode, _)| mode == name)
            .map(|(_, spec)| spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::SetDecl;
    use crate::state::{Fragment, Slot};

    fn library(paths: &[&str]) -> SetLibrary {
        paths
            .iter()
            .fold(SetLibrary::builder(), |builder, path| {
                builder.declare(SetDecl::plain(
                    SetPath::parse(path).unwrap(),
                    Fragment::builder().item(Slot::Body, *path).build(),
                ))
            })
            .build()
            .unwrap()
    }

    const RULE_SETS: [&str; 9] = [
        "idle",
        "engaged",
        "kiting",
        "buff.Saboteur",
        "buff.Composure",
        "buff.Doom",
        "midcast.Sleeps.MaxDuration",
        "magic_burst",
        "magic_burst.Engaged",
    ];

    fn builder(extra: &[&str]) -> GearConfigBuilder {
        let mut paths = RULE_SETS.to_vec();
        paths.extend_from_slice(extra);
        GearConfig::builder(library(&paths))
            .mode("DefenseMode", ModeSpec::cycle(["None", "PDT"], "None"))
            .mode("Kiting", ModeSpec::toggle(false))
            .mode("MagicBurst", ModeSpec::toggle(false))
            .mode("WeaponLock", ModeSpec::toggle(false))
    }

    #[test]
    fn minimal_config_builds_and_tracks_rule_effects() {
        let config = builder(&["defense.PDT"]).track_effect("Chainspell").build().unwrap();
        let tracked: Vec<&str> = config.tracked_effects().collect();
        for effect in ["Saboteur", "Stymie", "Composure", "doom", "Chainspell"] {
            assert!(tracked.contains(&effect), "{effect} should be tracked");
        }
    }

    #[test]
    fn missing_rule_set_is_rejected() {
        let library = library(&RULE_SETS[1..]);
        let err = GearConfig::builder(library).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Library(LibraryError::UnknownCategory { .. })
        ));
        assert_eq!(err.severity(), ErrorSeverity::Configuration);
    }

    #[test]
    fn defense_options_need_sets_except_neutral() {
        let err = builder(&[]).build().unwrap_err();
        match err {
            ConfigError::Library(LibraryError::UnknownCategory { path, .. }) => {
                assert_eq!(path.to_string(), "defense.PDT");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rule_toggles_must_be_toggles() {
        let err = GearConfig::builder(library(&RULE_SETS))
            .mode("DefenseMode", ModeSpec::cycle(["None"], "None"))
            .mode("Kiting", ModeSpec::cycle(["Off", "On"], "Off"))
            .mode("MagicBurst", ModeSpec::toggle(false))
            .mode("WeaponLock", ModeSpec::toggle(false))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::ModeKindMismatch {
                mode: "Kiting".into(),
                expected: "toggle"
            }
        );
    }

    #[test]
    fn defense_mode_is_required() {
        let err = GearConfig::builder(library(&RULE_SETS))
            .mode("Kiting", ModeSpec::toggle(false))
            .mode("MagicBurst", ModeSpec::toggle(false))
            .mode("WeaponLock", ModeSpec::toggle(false))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingMode {
                mode: "DefenseMode".into()
            }
        );
    }

    #[test]
    fn duplicate_modes_are_rejected() {
        let err = builder(&["defense.PDT"])
            .mode("Kiting", ModeSpec::toggle(true))
            .build()
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_DUPLICATE_MODE");
    }

    #[test]
    fn precast_override_prefers_action_name() {
        let config = builder(&["defense.PDT", "precast.FC.Impact", "precast.FC.Elemental"])
            .precast_override("ElementalMagic", SetPath::parse("precast.FC.Elemental").unwrap())
            .precast_override("Impact", SetPath::parse("precast.FC.Impact").unwrap())
            .build()
            .unwrap();

        let impact = config.precast_override("Impact", "ElementalMagic").unwrap();
        assert_eq!(impact.set.to_string(), "precast.FC.Impact");
        let fire = config.precast_override("Fire V", "ElementalMagic").unwrap();
        assert_eq!(fire.set.to_string(), "precast.FC.Elemental");
        assert!(config.precast_override("Cure", "HealingMagic").is_none());
    }

    #[test]
    fn precast_override_set_must_exist() {
        let err = builder(&["defense.PDT"])
            .precast_override("Impact", SetPath::parse("precast.FC.Impact").unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Library(_)));
    }
}
