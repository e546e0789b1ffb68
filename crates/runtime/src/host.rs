//! In-memory stand-in for the automation framework.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use gear_core::{CommandSink, Fragment, ItemRef, ModeSpec, PlayerOracle, Slot, SlotSet};
use serde::Serialize;

/// A command the engine (or the simulated framework) sent to the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostCommand {
    /// Slots actually changed, plus the slots skipped because they were
    /// disabled.
    Equip { set: Fragment, skipped: Vec<Slot> },
    Enable { slots: Vec<Slot> },
    Disable { slots: Vec<Slot> },
    Message { text: String },
    RegisterMode { name: String },
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostCommand::Equip { set, skipped } if skipped.is_empty() => write!(f, "equip {set}"),
            HostCommand::Equip { set, skipped } => {
                write!(f, "equip {set} (skipped {})", SlotSet::from_slots(skipped.iter().copied()))
            }
            HostCommand::Enable { slots } => {
                write!(f, "enable {}", SlotSet::from_slots(slots.iter().copied()))
            }
            HostCommand::Disable { slots } => {
                write!(f, "disable {}", SlotSet::from_slots(slots.iter().copied()))
            }
            HostCommand::Message { text } => write!(f, "message \"{text}\""),
            HostCommand::RegisterMode { name } => write!(f, "register mode {name}"),
        }
    }
}

/// Simulated framework state: what is worn, which slots are disabled, which
/// buffs are up, and a log of every command received.
///
/// `equip` honors disabled slots the way the real framework does. Buff names
/// are matched case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct SimulatedHost {
    worn: BTreeMap<Slot, ItemRef>,
    disabled: SlotSet,
    effects: BTreeSet<String>,
    engaged: bool,
    mid_action: bool,
    modes: BTreeMap<String, ModeSpec>,
    log: Vec<HostCommand>,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts wearing `item` in `slot` (builder pattern).
    #[must_use]
    pub fn wearing(mut self, slot: Slot, item: impl Into<ItemRef>) -> Self {
        self.worn.insert(slot, item.into());
        self
    }

    /// Starts with `effect` active (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: &str) -> Self {
        self.set_effect(effect, true);
        self
    }

    /// Starts engaged or idle (builder pattern).
    #[must_use]
    pub fn engaged(mut self, engaged: bool) -> Self {
        self.engaged = engaged;
        self
    }

    pub fn set_engaged(&mut self, engaged: bool) {
        self.engaged = engaged;
    }

    pub fn set_mid_action(&mut self, mid_action: bool) {
        self.mid_action = mid_action;
    }

    pub fn set_effect(&mut self, effect: &str, active: bool) {
        let key = effect.to_ascii_lowercase();
        if active {
            self.effects.insert(key);
        } else {
            self.effects.remove(&key);
        }
    }

    /// Equips an item by hand, the way a user would from the menu.
    ///
    /// Manual swaps ignore disabled slots and are not logged as commands.
    pub fn wear(&mut self, slot: Slot, item: impl Into<ItemRef>) {
        self.worn.insert(slot, item.into());
    }

    pub fn worn(&self, slot: Slot) -> Option<&ItemRef> {
        self.worn.get(&slot)
    }

    /// Returns the name of the item in `slot`.
    pub fn worn_name(&self, slot: Slot) -> Option<&str> {
        self.worn.get(&slot).map(|item| item.name.as_str())
    }

    /// Everything currently worn, as a fragment.
    pub fn outfit(&self) -> Fragment {
        self.worn
            .iter()
            .map(|(slot, item)| (*slot, item.clone().into()))
            .collect()
    }

    pub fn disabled(&self) -> SlotSet {
        self.disabled
    }

    pub fn registered_modes(&self) -> impl Iterator<Item = (&str, &ModeSpec)> {
        self.modes.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn commands(&self) -> &[HostCommand] {
        &self.log
    }

    /// Takes the commands logged since the last drain.
    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.log)
    }
}

impl PlayerOracle for SimulatedHost {
    fn has_effect(&self, effect: &str) -> bool {
        self.effects.contains(&effect.to_ascii_lowercase())
    }

    fn is_engaged(&self) -> bool {
        self.engaged
    }

    fn is_mid_action(&self) -> bool {
        self.mid_action
    }

    fn equipped(&self, slot: Slot) -> Option<ItemRef> {
        self.worn.get(&slot).cloned()
    }
}

impl CommandSink for SimulatedHost {
    fn equip(&mut self, fragment: &Fragment) {
        let skipped = fragment.defined() & self.disabled;
        let applied = fragment.without(self.disabled);

        for (slot, value) in applied.iter() {
            match value.item() {
                Some(item) => {
                    self.worn.insert(slot, item.clone());
                }
                None => {
                    self.worn.remove(&slot);
                }
            }
        }

        if !skipped.is_empty() {
            tracing::trace!(%skipped, "equip skipped disabled slots");
        }
        self.log.push(HostCommand::Equip {
            set: applied,
            skipped: skipped.slots().collect(),
        });
    }

    fn enable(&mut self, slots: SlotSet) {
        self.disabled.remove(slots);
        self.log.push(HostCommand::Enable {
            slots: slots.slots().collect(),
        });
    }

    fn disable(&mut self, slots: SlotSet) {
        self.disabled.insert(slots);
        self.log.push(HostCommand::Disable {
            slots: slots.slots().collect(),
        });
    }

    fn send_message(&mut self, text: &str) {
        tracing::info!(%text, "host notification");
        self.log.push(HostCommand::Message {
            text: text.to_string(),
        });
    }

    fn register_mode(&mut self, name: &str, spec: &ModeSpec) {
        self.modes.insert(name.to_string(), spec.clone());
        self.log.push(HostCommand::RegisterMode {
            name: name.to_string(),
        });
    }
}
