//! One character session: the engine plus the framework behaviour around it.
//!
//! The real framework equips a generic precast set before the engine's
//! precast hook, a generic midcast set before the post-midcast hook, and
//! reverts to the idle/engaged baseline at aftercast. [`Session`] reproduces
//! that sequence against a [`SimulatedHost`] and records every step in a
//! [`Transcript`].

use std::fmt;

use gear_core::{
    ActionDescriptor, CommandSink, DispatchOutcome, EngineError, Fragment, GearConfig, GearEngine,
    ItemRef, Phase, PlayerOracle, SetPath, Slot, StateError,
};
use serde::Serialize;

use crate::error::{Result, RuntimeError};
use crate::host::{HostCommand, SimulatedHost};

const PRECAST_ROOT: &str = "precast.FC";
const MIDCAST_ROOT: &str = "midcast";

/// Generic set lookups the framework performs on its own.
#[derive(Clone, Debug)]
struct GenericSets {
    precast: SetPath,
    midcast: SetPath,
}

impl GenericSets {
    fn new() -> std::result::Result<Self, EngineError> {
        Ok(Self {
            precast: SetPath::parse(PRECAST_ROOT)?,
            midcast: SetPath::parse(MIDCAST_ROOT)?,
        })
    }
}

#[derive(Clone, Debug)]
struct InFlight {
    action: ActionDescriptor,
    default_category: String,
}

/// One recorded session step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub step: usize,
    pub label: String,
    /// Engine phase after the step.
    pub phase: Phase,
    /// Engine outcomes, one per engine callback the step made.
    pub outcomes: Vec<DispatchOutcome>,
    /// Host commands issued during the step, in order.
    pub commands: Vec<HostCommand>,
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{:>3}] {} ({})", self.step, self.label, self.phase)?;
        for outcome in &self.outcomes {
            if let Some(category) = &outcome.category {
                writeln!(f, "      category {category}")?;
            }
            if outcome.handled {
                writeln!(f, "      precast handled")?;
            }
        }
        for command in &self.commands {
            writeln!(f, "      {command}")?;
        }
        Ok(())
    }
}

/// Ordered record of a session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Every command issued over the session.
    pub fn commands(&self) -> impl Iterator<Item = &HostCommand> {
        self.entries.iter().flat_map(|entry| entry.commands.iter())
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Drives a [`GearEngine`] against a [`SimulatedHost`].
#[derive(Debug)]
pub struct Session<'c> {
    engine: GearEngine<'c>,
    host: SimulatedHost,
    generic: GenericSets,
    in_flight: Option<InFlight>,
    transcript: Transcript,
}

impl<'c> Session<'c> {
    /// Starts the engine against `host` and equips the initial baseline.
    pub fn start(config: &'c GearConfig, mut host: SimulatedHost) -> Result<Self> {
        let engine = GearEngine::start(config, &mut host)?;
        let mut session = Self {
            engine,
            host,
            generic: GenericSets::new()?,
            in_flight: None,
            transcript: Transcript::default(),
        };

        let outcome = session.engine.refresh(&mut session.host)?;
        session.record("start".to_string(), vec![outcome]);
        Ok(session)
    }

    pub fn engine(&self) -> &GearEngine<'c> {
        &self.engine
    }

    pub fn host(&self) -> &SimulatedHost {
        &self.host
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn into_transcript(self) -> Transcript {
        self.transcript
    }

    /// Name of the action currently being cast.
    pub fn in_flight(&self) -> Option<&str> {
        self.in_flight.as_ref().map(|flight| flight.action.name.as_str())
    }

    /// Casts an action from precast through aftercast.
    pub fn cast(
        &mut self,
        action: ActionDescriptor,
        default_category: &str,
    ) -> Result<&TranscriptEntry> {
        let label = format!("cast {}", action.name);
        let mut outcomes = self.run_begin(action, default_category)?;
        outcomes.push(self.run_finish()?);
        Ok(self.record(label, outcomes))
    }

    /// Runs precast and midcast, leaving the action in flight.
    ///
    /// Events delivered before [`Self::finish_cast`] see the mid-action guard.
    pub fn begin_cast(
        &mut self,
        action: ActionDescriptor,
        default_category: &str,
    ) -> Result<&TranscriptEntry> {
        let label = format!("begin {}", action.name);
        let outcomes = self.run_begin(action, default_category)?;
        Ok(self.record(label, outcomes))
    }

    /// Completes the in-flight action.
    pub fn finish_cast(&mut self) -> Result<&TranscriptEntry> {
        let label = match &self.in_flight {
            Some(flight) => format!("finish {}", flight.action.name),
            None => return Err(RuntimeError::NoActionInFlight),
        };
        let outcome = self.run_finish()?;
        Ok(self.record(label, vec![outcome]))
    }

    /// Gains or loses a status effect.
    pub fn buff(&mut self, effect: &str, gained: bool) -> Result<&TranscriptEntry> {
        self.host.set_effect(effect, gained);
        let outcome = self
            .engine
            .on_buff_change(&mut self.host, effect, gained)?;
        let sign = if gained { '+' } else { '-' };
        Ok(self.record(format!("buff {sign}{effect}"), vec![outcome]))
    }

    /// Sets a mode from its textual value.
    pub fn set_mode(&mut self, mode: &str, raw: &str) -> Result<&TranscriptEntry> {
        let state = self.engine.state();
        let spec = state.mode_spec(mode).ok_or_else(|| unknown_mode(mode))?;
        let new = spec.parse_value(mode, raw)?;
        let old = state.mode(mode).cloned().ok_or_else(|| unknown_mode(mode))?;

        let outcome = self
            .engine
            .on_state_change(&mut self.host, mode, &new, &old)?;
        Ok(self.record(format!("mode {mode} = {new}"), vec![outcome]))
    }

    /// Advances a cycle mode or flips a toggle.
    pub fn cycle_mode(&mut self, mode: &str) -> Result<&TranscriptEntry> {
        let state = self.engine.state();
        let spec = state.mode_spec(mode).ok_or_else(|| unknown_mode(mode))?;
        let old = state.mode(mode).cloned().ok_or_else(|| unknown_mode(mode))?;
        let new = spec.next(&old);

        let outcome = self
            .engine
            .on_state_change(&mut self.host, mode, &new, &old)?;
        Ok(self.record(format!("cycle {mode} -> {new}"), vec![outcome]))
    }

    /// Engages or disengages.
    pub fn status(&mut self, engaged: bool) -> Result<&TranscriptEntry> {
        self.host.set_engaged(engaged);
        let outcome = self.engine.on_status_change(&mut self.host, engaged)?;
        let label = if engaged { "engage" } else { "disengage" };
        Ok(self.record(label.to_string(), vec![outcome]))
    }

    /// Manual gear refresh.
    pub fn refresh(&mut self) -> Result<&TranscriptEntry> {
        let outcome = self.engine.refresh(&mut self.host)?;
        Ok(self.record("refresh".to_string(), vec![outcome]))
    }

    /// Equips an item by hand, outside the engine, then lets the engine lock
    /// the slot if the item is protected.
    pub fn wear(&mut self, slot: Slot, item: impl Into<ItemRef>) -> &TranscriptEntry {
        let item = item.into();
        let label = format!("wear {slot} {}", item.name);
        self.host.wear(slot, item);
        let outcome = self.engine.on_equipment_change(&mut self.host);
        self.record(label, vec![outcome])
    }

    fn run_begin(
        &mut self,
        action: ActionDescriptor,
        default_category: &str,
    ) -> Result<Vec<DispatchOutcome>> {
        if let Some(flight) = &self.in_flight {
            return Err(RuntimeError::ActionInFlight {
                in_flight: flight.action.name.clone(),
            });
        }
        let _span = tracing::debug_span!("cast", action = %action.name).entered();
        self.host.set_mid_action(true);

        let precast = self
            .engine
            .on_precast(&mut self.host, &action, default_category)?;
        let category = precast
            .category
            .clone()
            .unwrap_or_else(|| default_category.to_string());

        if !precast.handled {
            let keys = [action.name.as_str(), category.as_str(), default_category];
            if let Some((path, set)) = self.generic_set(&self.generic.precast, &keys, None)? {
                tracing::trace!(%path, "generic precast");
                self.host.equip(&set);
            }
        }

        let casting = self
            .engine
            .state()
            .choice(&self.engine.config().rules().casting_mode)
            .map(str::to_string);
        let keys = [action.name.as_str(), category.as_str(), default_category];
        if let Some((path, set)) =
            self.generic_set(&self.generic.midcast, &keys, casting.as_deref())?
        {
            tracing::trace!(%path, "generic midcast");
            self.host.equip(&set);
        }

        let midcast = self
            .engine
            .on_post_midcast(&mut self.host, &action, default_category)?;

        self.in_flight = Some(InFlight {
            action,
            default_category: default_category.to_string(),
        });
        Ok(vec![precast, midcast])
    }

    fn run_finish(&mut self) -> Result<DispatchOutcome> {
        let flight = self.in_flight.take().ok_or(RuntimeError::NoActionInFlight)?;
        let _span = tracing::debug_span!(
            "aftercast",
            action = %flight.action.name,
            default_category = %flight.default_category
        )
        .entered();
        self.host.set_mid_action(false);

        let baseline = self.engine.baseline(self.host.is_engaged())?;
        self.host.equip(&baseline);

        Ok(self.engine.on_aftercast(&mut self.host, &flight.action)?)
    }

    /// Finds the most specific generic set under `root`: the first key with a
    /// set, else the root itself, then refined by `qualifier`.
    fn generic_set(
        &self,
        root: &SetPath,
        keys: &[&str],
        qualifier: Option<&str>,
    ) -> Result<Option<(SetPath, Fragment)>> {
        let library = self.engine.config().library();
        let found = keys
            .iter()
            .map(|key| root.child(key))
            .find(|path| library.contains(path))
            .or_else(|| library.contains(root).then(|| root.clone()));

        let Some(path) = found else {
            return Ok(None);
        };
        let (path, set) = library
            .select(&path, qualifier)
            .map_err(EngineError::from)?;
        Ok(Some((path, set.clone())))
    }

    fn record(&mut self, label: String, outcomes: Vec<DispatchOutcome>) -> &TranscriptEntry {
        let entry = TranscriptEntry {
            step: self.transcript.entries.len(),
            label,
            phase: self.engine.phase(),
            outcomes,
            commands: self.host.drain_commands(),
        };
        tracing::debug!(step = entry.step, label = %entry.label, commands = entry.commands.len(), "session step");
        self.transcript.entries.push(entry);
        &self.transcript.entries[self.transcript.entries.len() - 1]
    }
}

fn unknown_mode(mode: &str) -> RuntimeError {
    StateError::UnknownMode {
        mode: mode.to_string(),
    }
    .into()
}
