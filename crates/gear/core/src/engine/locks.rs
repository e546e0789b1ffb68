//! Slot locks and the checks that maintain them.

use std::collections::BTreeMap;

use crate::config::GearConfig;
use crate::env::GearHost;
use crate::state::{Slot, SlotSet, TrackedState};

/// Why the engine is holding a slot disabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LockReason {
    /// A protected item is worn in the slot.
    ProtectedItem,
    /// The incapacitating condition is active.
    Incapacitated,
    /// The weapon-lock toggle is on.
    WeaponLock,
}

/// Per-reason slot holds. The lock set is the union of all holds.
///
/// Never persisted: rebuilt from equipped items and tracked state as events
/// arrive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotLocks {
    held: BTreeMap<LockReason, SlotSet>,
}

impl SlotLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots currently disabled for any reason.
    pub fn lock_set(&self) -> SlotSet {
        self.held
            .values()
            .fold(SlotSet::empty(), |acc, slots| acc | *slots)
    }

    /// Slots held for `reason`.
    pub fn held_by(&self, reason: LockReason) -> SlotSet {
        self.held.get(&reason).copied().unwrap_or_default()
    }

    pub fn is_locked(&self, slot: Slot) -> bool {
        self.lock_set().has(slot)
    }

    /// Holds `slots` for `reason`, returning the slots that were not locked
    /// before.
    pub fn acquire(&mut self, reason: LockReason, slots: SlotSet) -> SlotSet {
        let before = self.lock_set();
        *self.held.entry(reason).or_default() |= slots;
        self.lock_set() - before
    }

    /// Drops `reason`'s hold on `slots`, returning the requested slots that no
    /// other reason still holds.
    pub fn release(&mut self, reason: LockReason, slots: SlotSet) -> SlotSet {
        if let Some(held) = self.held.get_mut(&reason) {
            held.remove(slots);
            if held.is_empty() {
                self.held.remove(&reason);
            }
        }
        slots - self.lock_set()
    }

    /// Drops every hold on `slots`.
    pub fn release_all(&mut self, slots: SlotSet) {
        self.held.retain(|_, held| {
            held.remove(slots);
            !held.is_empty()
        });
    }
}

/// Re-validates slot locks after an equip-affecting event.
pub(crate) struct SlotLockManager<'c> {
    config: &'c GearConfig,
}

impl<'c> SlotLockManager<'c> {
    pub fn new(config: &'c GearConfig) -> Self {
        Self { config }
    }

    /// Disables each ring slot that holds a protected item and enables each
    /// one that no longer does.
    ///
    /// Commands are sent only when the protected hold changes, and a ring held
    /// for another reason is never enabled here.
    pub fn check_protected_rings(&self, host: &mut dyn GearHost, locks: &mut SlotLocks) {
        for ring in Slot::RINGS {
            let protected = host
                .equipped(ring)
                .is_some_and(|item| self.config.is_protected(&item.name));
            let held = locks.held_by(LockReason::ProtectedItem).has(ring);

            match (protected, held) {
                (true, false) => {
                    tracing::debug!(slot = %ring, "locking protected item");
                    locks.acquire(LockReason::ProtectedItem, ring.bit());
                    host.disable(ring.bit());
                }
                (false, true) => {
                    let freed = locks.release(LockReason::ProtectedItem, ring.bit());
                    if !freed.is_empty() {
                        tracing::debug!(slot = %ring, "protected item removed, unlocking");
                        host.enable(freed);
                    }
                }
                _ => {}
            }
        }
    }

    /// Equips the movement set when no defense mode is active and kiting is on.
    ///
    /// Returns true if the set was applied. Never touches locks.
    pub fn check_movement_gear(&self, host: &mut dyn GearHost, state: &TrackedState) -> bool {
        if !movement_applies(self.config, state) {
            return false;
        }
        match self.config.library().get(&self.config.rule_sets().kiting) {
            Ok(kiting) => {
                host.equip(kiting);
                true
            }
            Err(err) => {
                tracing::error!(%err, "movement set missing from validated library");
                false
            }
        }
    }
}

/// Returns true when the movement set should be worn.
pub(crate) fn movement_applies(config: &GearConfig, state: &TrackedState) -> bool {
    let rules = config.rules();
    let neutral = state
        .choice(&rules.defense_mode)
        .is_none_or(|mode| mode == rules.defense_neutral);
    neutral && state.is_on(&rules.kiting_mode)
}
