//! Traits describing the host automation framework.
//!
//! The engine never talks to the game directly. It reads player state through
//! [`PlayerOracle`] and issues equip/lock/message commands through
//! [`CommandSink`]. [`GearHost`] bundles both so callbacks can take a single
//! `&mut dyn GearHost`.

use crate::state::{Fragment, ItemRef, ModeSpec, Slot, SlotSet};

/// Read-only queries about the player, answered by the host.
pub trait PlayerOracle {
    /// Returns true if the named status effect is currently on the player.
    fn has_effect(&self, effect: &str) -> bool;

    /// Returns true while the player is engaged in melee combat.
    fn is_engaged(&self) -> bool;

    /// Returns true while an action is in flight (between precast and
    /// aftercast from the host's point of view).
    fn is_mid_action(&self) -> bool;

    /// Returns the item currently worn in `slot`.
    fn equipped(&self, slot: Slot) -> Option<ItemRef>;
}

/// Commands the engine sends to the host.
pub trait CommandSink {
    /// Applies a fragment slot by slot.
    ///
    /// Slots the fragment does not define are left untouched. Slots currently
    /// disabled are skipped by the host.
    fn equip(&mut self, fragment: &Fragment);

    /// Makes slots eligible for automatic equip again.
    fn enable(&mut self, slots: SlotSet);

    /// Prevents automatic equip from touching slots.
    fn disable(&mut self, slots: SlotSet);

    /// Shows a notification to the user.
    fn send_message(&mut self, text: &str);

    /// Declares a mode and its legal values. Called once per mode at setup.
    fn register_mode(&mut self, name: &str, spec: &ModeSpec);
}

/// Full host surface required by [`crate::engine::GearEngine`].
pub trait GearHost: PlayerOracle + CommandSink {}

impl<T: PlayerOracle + CommandSink + ?Sized> GearHost for T {}
