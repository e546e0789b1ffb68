//! Equipment slots and slot sets.

use bitflags::bitflags;

/// One of the sixteen equipment slots a character can fill.
///
/// Ordering follows the host's equipment window, which is also the order
/// fragments are applied and displayed in.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Slot {
    Main,
    Sub,
    #[strum(to_string = "range", serialize = "ranged")]
    #[cfg_attr(feature = "serde", serde(alias = "ranged"))]
    Range,
    Ammo,
    Head,
    Neck,
    #[strum(to_string = "ear1", serialize = "left_ear", serialize = "lear")]
    #[cfg_attr(feature = "serde", serde(alias = "left_ear", alias = "lear"))]
    Ear1,
    #[strum(to_string = "ear2", serialize = "right_ear", serialize = "rear")]
    #[cfg_attr(feature = "serde", serde(alias = "right_ear", alias = "rear"))]
    Ear2,
    Body,
    Hands,
    #[strum(to_string = "ring1", serialize = "left_ring", serialize = "lring")]
    #[cfg_attr(feature = "serde", serde(alias = "left_ring", alias = "lring"))]
    Ring1,
    #[strum(to_string = "ring2", serialize = "right_ring", serialize = "rring")]
    #[cfg_attr(feature = "serde", serde(alias = "right_ring", alias = "rring"))]
    Ring2,
    Back,
    Waist,
    Legs,
    Feet,
}

impl Slot {
    /// Every slot, in equipment-window order.
    pub const ALL: [Slot; 16] = [
        Slot::Main,
        Slot::Sub,
        Slot::Range,
        Slot::Ammo,
        Slot::Head,
        Slot::Neck,
        Slot::Ear1,
        Slot::Ear2,
        Slot::Body,
        Slot::Hands,
        Slot::Ring1,
        Slot::Ring2,
        Slot::Back,
        Slot::Waist,
        Slot::Legs,
        Slot::Feet,
    ];

    /// The two ring slots.
    pub const RINGS: [Slot; 2] = [Slot::Ring1, Slot::Ring2];

    /// Returns the single-slot set for this slot.
    pub const fn bit(self) -> SlotSet {
        SlotSet::from_bits_truncate(1 << self as u16)
    }
}

bitflags! {
    /// A set of equipment slots.
    ///
    /// Used for enable/disable commands and for the engine's lock set. Each bit
    /// corresponds to the [`Slot`] with the same discriminant.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct SlotSet: u16 {
        const MAIN  = 1 << 0;
        const SUB   = 1 << 1;
        const RANGE = 1 << 2;
        const AMMO  = 1 << 3;
        const HEAD  = 1 << 4;
        const NECK  = 1 << 5;
        const EAR1  = 1 << 6;
        const EAR2  = 1 << 7;
        const BODY  = 1 << 8;
        const HANDS = 1 << 9;
        const RING1 = 1 << 10;
        const RING2 = 1 << 11;
        const BACK  = 1 << 12;
        const WAIST = 1 << 13;
        const LEGS  = 1 << 14;
        const FEET  = 1 << 15;

        /// Slots disabled while the weapon-lock toggle is on.
        const WEAPONS = Self::MAIN.bits() | Self::SUB.bits() | Self::RANGE.bits();
        /// Slots held while the incapacitating condition is active.
        const INCAPACITATION = Self::RING1.bits() | Self::RING2.bits() | Self::WAIST.bits();
    }
}

impl SlotSet {
    /// Builds a set from individual slots.
    pub fn from_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        slots
            .into_iter()
            .fold(SlotSet::empty(), |set, slot| set | slot.bit())
    }

    /// Returns true if `slot` is in the set.
    pub fn has(&self, slot: Slot) -> bool {
        self.contains(slot.bit())
    }

    /// Iterates the member slots in equipment-window order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        Slot::ALL.into_iter().filter(move |slot| self.has(*slot))
    }
}

impl core::fmt::Display for SlotSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for slot in self.slots() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{slot}")?;
            first = false;
        }
        Ok(())
    }
}
