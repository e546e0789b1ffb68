//! TOML event scripts replayed through a [`Session`].
//!
//! ```toml
//! name = "sleep under saboteur"
//!
//! [setup]
//! effects = ["Saboteur"]
//! worn = { ring1 = "Warp Ring" }
//!
//! [[events]]
//! kind = "buff"
//! effect = "Stymie"
//! gained = true
//!
//! [[events]]
//! kind = "cast"
//! name = "Sleep II"
//! skill = "enfeebling_magic"
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use gear_core::{ActionDescriptor, Element, GearConfig, Skill, Slot, TargetKind};
use serde::Deserialize;

use crate::error::{Result, RuntimeError};
use crate::host::SimulatedHost;
use crate::session::{Session, Transcript};

/// An action as written in a script.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CastSpec {
    pub name: String,
    #[serde(default)]
    pub skill: Skill,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub target: TargetKind,
    /// Category the framework would report; defaults from the skill.
    #[serde(default)]
    pub category: Option<String>,
}

impl CastSpec {
    pub fn descriptor(&self) -> ActionDescriptor {
        ActionDescriptor {
            name: self.name.clone(),
            skill: self.skill,
            element: self.element,
            target: self.target,
        }
    }

    pub fn default_category(&self) -> &str {
        self.category
            .as_deref()
            .unwrap_or_else(|| self.skill.default_category())
    }
}

/// Host state before the first event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptSetup {
    pub engaged: bool,
    pub effects: Vec<String>,
    /// Slot name to item name.
    pub worn: BTreeMap<String, String>,
}

impl ScriptSetup {
    /// Builds the simulated host this setup describes.
    pub fn host(&self) -> Result<SimulatedHost> {
        let mut host = SimulatedHost::new().engaged(self.engaged);
        for effect in &self.effects {
            host.set_effect(effect, true);
        }
        for (slot, item) in &self.worn {
            let slot = Slot::from_str(slot)
                .map_err(|_| RuntimeError::ScriptParse(format!("unknown slot '{slot}' in setup")))?;
            host.wear(slot, item.as_str());
        }
        Ok(host)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Full precast-to-aftercast cycle.
    Cast(CastSpec),
    /// Precast and midcast only; the action stays in flight.
    BeginCast(CastSpec),
    FinishCast,
    Buff { effect: String, gained: bool },
    /// Sets a mode. Toggles take `on`/`off`.
    Mode { mode: String, value: String },
    Cycle { mode: String },
    Status { engaged: bool },
    Wear { slot: Slot, item: String },
    Refresh,
}

impl ScriptEvent {
    fn apply(&self, session: &mut Session<'_>) -> Result<()> {
        match self {
            ScriptEvent::Cast(spec) => {
                session.cast(spec.descriptor(), spec.default_category())?;
            }
            ScriptEvent::BeginCast(spec) => {
                session.begin_cast(spec.descriptor(), spec.default_category())?;
            }
            ScriptEvent::FinishCast => {
                session.finish_cast()?;
            }
            ScriptEvent::Buff { effect, gained } => {
                session.buff(effect, *gained)?;
            }
            ScriptEvent::Mode { mode, value } => {
                session.set_mode(mode, value)?;
            }
            ScriptEvent::Cycle { mode } => {
                session.cycle_mode(mode)?;
            }
            ScriptEvent::Status { engaged } => {
                session.status(*engaged)?;
            }
            ScriptEvent::Wear { slot, item } => {
                session.wear(*slot, item.as_str());
            }
            ScriptEvent::Refresh => {
                session.refresh()?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub setup: ScriptSetup,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl Script {
    /// Replays the script against `config` and returns the transcript.
    pub fn run(&self, config: &GearConfig) -> Result<Transcript> {
        let _span = tracing::info_span!("script", name = %self.name).entered();

        let mut session = Session::start(config, self.setup.host()?)?;
        for (index, event) in self.events.iter().enumerate() {
            event.apply(&mut session).inspect_err(|err| {
                tracing::warn!(index, error = %err, "script event failed");
            })?;
        }
        if let Some(action) = session.in_flight() {
            tracing::warn!(%action, "script ended with an action in flight");
        }

        tracing::info!(steps = session.transcript().len(), "script finished");
        Ok(session.into_transcript())
    }
}

pub struct ScriptLoader;

impl ScriptLoader {
    pub fn load(path: &Path) -> Result<Script> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::ScriptIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Script> {
        toml::from_str(content).map_err(|e| RuntimeError::ScriptParse(e.to_string()))
    }
}
