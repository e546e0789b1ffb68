//! Host events, engine phases and dispatch outcomes.

use crate::action::ActionDescriptor;
use crate::library::SetPath;
use crate::state::ModeValue;

/// Where the character is in the action cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Precast,
    Midcast,
    Aftercast,
    Engaged,
}

impl Phase {
    /// Returns true while an action is in flight.
    pub const fn is_mid_action(&self) -> bool {
        matches!(self, Phase::Precast | Phase::Midcast)
    }

    /// Steady-state phase for the given combat status.
    pub const fn resting(engaged: bool) -> Self {
        if engaged { Phase::Engaged } else { Phase::Idle }
    }
}

/// Callback delivered by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum HostEvent {
    /// An action is about to be cast.
    Precast {
        action: ActionDescriptor,
        default_category: String,
    },
    /// The framework has applied its generic midcast set.
    PostMidcast {
        action: ActionDescriptor,
        default_category: String,
    },
    /// The action finished.
    Aftercast { action: ActionDescriptor },
    /// A status effect was gained or lost.
    BuffChange { effect: String, gained: bool },
    /// The user changed a mode.
    StateChange {
        mode: String,
        new: ModeValue,
        old: ModeValue,
    },
    /// The player engaged or disengaged.
    StatusChange { engaged: bool },
}

impl HostEvent {
    /// Short event name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            HostEvent::Precast { .. } => "precast",
            HostEvent::PostMidcast { .. } => "post_midcast",
            HostEvent::Aftercast { .. } => "aftercast",
            HostEvent::BuffChange { .. } => "buff_change",
            HostEvent::StateChange { .. } => "state_change",
            HostEvent::StatusChange { .. } => "status_change",
        }
    }
}

/// What happened to the idle/engaged baseline while handling an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BaselineStatus {
    /// The event does not call for a baseline recompute.
    #[default]
    NotRequested,
    /// The baseline was recomputed and equipped.
    Applied,
    /// An action was in flight; the recompute runs once it completes.
    Deferred,
}

/// Result of dispatching one host event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchOutcome {
    /// Phase after the event.
    pub phase: Phase,
    /// Category the action was classified into (action events only).
    pub category: Option<String>,
    /// True when the engine equipped the precast set itself and the framework
    /// must skip its generic precast equip.
    pub handled: bool,
    /// Sets the engine equipped directly, in order.
    #[cfg_attr(feature = "serde", serde(with = "set_paths"))]
    pub layers: Vec<SetPath>,
    pub baseline: BaselineStatus,
}

#[cfg(feature = "serde")]
mod set_paths {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::library::SetPath;

    pub fn serialize<S: Serializer>(paths: &[SetPath], serializer: S) -> Result<S::Ok, S::Error> {
        let raw: Vec<String> = paths.iter().map(ToString::to_string).collect();
        raw.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<SetPath>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|path| SetPath::parse(path).map_err(serde::de::Error::custom))
            .collect()
    }
}
