//! Equipment fragments and layer composition.
//!
//! A [`Fragment`] assigns items to some subset of slots. Fragments are
//! immutable once built; layering two of them with [`compose`] produces a new
//! fragment in which the override's slots win.

use std::collections::BTreeMap;

use super::{Slot, SlotSet};

/// Reference to an item by name, with optional augment descriptors.
///
/// Two references are the same item only if both the name and the augments
/// match; the host uses augments to pick between copies with the same name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemRef {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub augments: Vec<String>,
}

impl ItemRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            augments: Vec::new(),
        }
    }

    /// Attaches augment descriptors (builder pattern).
    #[must_use]
    pub fn with_augments<I, S>(mut self, augments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.augments = augments.into_iter().map(Into::into).collect();
        self
    }
}

impl core::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)?;
        if !self.augments.is_empty() {
            write!(f, " [{}]", self.augments.join(", "))?;
        }
        Ok(())
    }
}

impl From<&str> for ItemRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// What a fragment puts into a slot it defines.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotValue {
    /// Equip this item.
    Item(ItemRef),
    /// Explicitly unequip the slot.
    Empty,
}

impl SlotValue {
    /// Returns the item, or `None` for an explicit empty.
    pub fn item(&self) -> Option<&ItemRef> {
        match self {
            SlotValue::Item(item) => Some(item),
            SlotValue::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SlotValue::Empty)
    }
}

impl From<ItemRef> for SlotValue {
    fn from(item: ItemRef) -> Self {
        SlotValue::Item(item)
    }
}

impl core::fmt::Display for SlotValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SlotValue::Item(item) => item.fmt(f),
            SlotValue::Empty => f.write_str("empty"),
        }
    }
}

/// A partial slot → item assignment.
///
/// A slot that the fragment does not define means "leave the current item
/// equipped"; it is never treated as an unequip. Use [`SlotValue::Empty`] to
/// clear a slot on purpose.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Fragment {
    slots: BTreeMap<Slot, SlotValue>,
}

impl Fragment {
    /// Creates a fragment that defines no slots.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a builder for constructing a fragment.
    pub fn builder() -> FragmentBuilder {
        FragmentBuilder::default()
    }

    /// Returns what this fragment assigns to `slot`, if it defines it.
    pub fn get(&self, slot: Slot) -> Option<&SlotValue> {
        self.slots.get(&slot)
    }

    /// Returns the item assigned to `slot`, if it defines one.
    pub fn item(&self, slot: Slot) -> Option<&ItemRef> {
        self.get(slot).and_then(SlotValue::item)
    }

    /// Returns the set of slots this fragment defines.
    pub fn defined(&self) -> SlotSet {
        SlotSet::from_slots(self.slots.keys().copied())
    }

    /// Iterates defined slots in equipment-window order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &SlotValue)> {
        self.slots.iter().map(|(slot, value)| (*slot, value))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Layers `over` on top of this fragment. See [`compose`].
    #[must_use]
    pub fn layered(&self, over: &Fragment) -> Fragment {
        compose(self, over)
    }

    /// Returns a copy without the given slots.
    ///
    /// Hosts use this to drop disabled slots before applying a fragment.
    #[must_use]
    pub fn without(&self, slots: SlotSet) -> Fragment {
        self.slots
            .iter()
            .filter(|(slot, _)| !slots.has(**slot))
            .map(|(slot, value)| (*slot, value.clone()))
            .collect()
    }
}

impl FromIterator<(Slot, SlotValue)> for Fragment {
    fn from_iter<T: IntoIterator<Item = (Slot, SlotValue)>>(iter: T) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

impl core::fmt::Display for Fragment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("{")?;
        for (idx, (slot, value)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{slot}: {value}")?;
        }
        f.write_str("}")
    }
}

/// Builder for constructing fragments.
#[derive(Default)]
pub struct FragmentBuilder {
    slots: BTreeMap<Slot, SlotValue>,
}

impl FragmentBuilder {
    /// Assigns an item to a slot. A later call for the same slot replaces it.
    pub fn item(mut self, slot: Slot, item: impl Into<ItemRef>) -> Self {
        self.slots.insert(slot, SlotValue::Item(item.into()));
        self
    }

    /// Marks a slot to be explicitly unequipped.
    pub fn empty(mut self, slot: Slot) -> Self {
        self.slots.insert(slot, SlotValue::Empty);
        self
    }

    pub fn value(mut self, slot: Slot, value: SlotValue) -> Self {
        self.slots.insert(slot, value);
        self
    }

    pub fn build(self) -> Fragment {
        Fragment { slots: self.slots }
    }
}

/// Layers `over` on top of `base`.
///
/// For every slot `over` defines, the result takes `over`'s value (including an
/// explicit empty). Every other slot comes from `base`; slots neither defines
/// stay undefined. The operation is not commutative.
pub fn compose(base: &Fragment, over: &Fragment) -> Fragment {
    let mut slots = base.slots.clone();
    for (slot, value) in &over.slots {
        slots.insert(*slot, value.clone());
    }
    Fragment { slots }
}
