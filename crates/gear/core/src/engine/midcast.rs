//! Conditional midcast layers.
//!
//! After the framework equips its generic midcast set, the engine layers extra
//! sets on top depending on the action and the tracked buffs.

use crate::action::{ActionDescriptor, Skill, TableKind};
use crate::config::GearConfig;
use crate::library::SetPath;
use crate::state::TrackedState;

/// Returns the sets to layer over the current midcast equip, in order.
pub(crate) fn midcast_layers(
    config: &GearConfig,
    state: &TrackedState,
    action: &ActionDescriptor,
    engaged: bool,
) -> Vec<SetPath> {
    let rules = config.rules();
    let sets = config.rule_sets();
    let kind = config.tables().kind_of(action);
    let mut layers = Vec::new();

    match action.skill {
        Skill::EnfeeblingMagic => {
            let potency = state.effect(&rules.potency_effect);
            if kind == Some(TableKind::DurationEnfeebling) {
                if potency && state.effect(&rules.duration_effect) {
                    layers.push(sets.max_duration.clone());
                }
            } else if potency && kind.is_some_and(|k| k.is_primary_stat()) {
                layers.push(sets.potency.clone());
            }
        }
        Skill::EnhancingMagic => {
            if action.targets_self() && state.effect(&rules.composure_effect) {
                layers.push(sets.composure.clone());
            }
        }
        Skill::ElementalMagic => {
            if state.is_on(&rules.magic_burst_mode) {
                layers.push(sets.burst.clone());
                if engaged {
                    layers.push(sets.burst_engaged.clone());
                }
            }
        }
        _ => {}
    }

    layers
}
