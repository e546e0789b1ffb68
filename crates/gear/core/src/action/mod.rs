//! Action descriptors and classification.
//!
//! The host delivers an [`ActionDescriptor`] at every phase boundary. The
//! [`ClassificationTables`] turn a descriptor into the category used to pick
//! sets for it.
mod tables;

pub use tables::{ClassificationTable, ClassificationTables, TableKind, TableOverlap};

/// Skill that governs an action.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Skill {
    #[strum(to_string = "enfeebling_magic", serialize = "Enfeebling Magic")]
    EnfeeblingMagic,
    #[strum(to_string = "enhancing_magic", serialize = "Enhancing Magic")]
    EnhancingMagic,
    #[strum(to_string = "elemental_magic", serialize = "Elemental Magic")]
    ElementalMagic,
    #[strum(to_string = "healing_magic", serialize = "Healing Magic")]
    HealingMagic,
    #[strum(to_string = "dark_magic", serialize = "Dark Magic")]
    DarkMagic,
    #[strum(to_string = "divine_magic", serialize = "Divine Magic")]
    DivineMagic,
    Ninjutsu,
    Singing,
    /// Job abilities, weapon skills, items: anything without a magic skill.
    #[default]
    None,
}

impl Skill {
    /// Category the host falls back to when no classification table claims
    /// an action of this skill.
    pub const fn default_category(&self) -> &'static str {
        match self {
            Skill::EnfeeblingMagic => "EnfeeblingMagic",
            Skill::EnhancingMagic => "EnhancingMagic",
            Skill::ElementalMagic => "ElementalMagic",
            Skill::HealingMagic => "HealingMagic",
            Skill::DarkMagic => "DarkMagic",
            Skill::DivineMagic => "DivineMagic",
            Skill::Ninjutsu => "Ninjutsu",
            Skill::Singing => "Singing",
            Skill::None => "JobAbility",
        }
    }
}

/// Element of an action, when it has one.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    Fire,
    Ice,
    Wind,
    Earth,
    #[strum(to_string = "lightning", serialize = "thunder")]
    Lightning,
    Water,
    Light,
    Dark,
}

/// Who an action is aimed at.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetKind {
    /// The caster.
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    #[strum(to_string = "self")]
    SelfTarget,
    Party,
    Ally,
    #[default]
    Enemy,
    None,
}

/// Action delivered by the host at precast, midcast and aftercast.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionDescriptor {
    /// English action name, e.g. `"Sleep II"`.
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skill: Skill,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Option<Element>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: TargetKind,
}

impl ActionDescriptor {
    pub fn new(name: impl Into<String>, skill: Skill, target: TargetKind) -> Self {
        Self {
            name: name.into(),
            skill,
            element: None,
            target,
        }
    }

    /// Attaches an element (builder pattern).
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn targets_self(&self) -> bool {
        self.target == TargetKind::SelfTarget
    }
}
