//! Event dispatch and phase tracking.
//!
//! [`GearEngine`] is the single owner of the session's mutable state: tracked
//! effects and modes, the current phase, and the slot lock set. Every host
//! callback flows through [`GearEngine::dispatch`] (or the matching `on_*`
//! handler), which decides what to equip and re-validates slot locks before
//! returning a [`DispatchOutcome`].

mod errors;
mod events;
mod locks;
mod midcast;

#[cfg(test)]
mod tests;

pub use errors::EngineError;
pub use events::{BaselineStatus, DispatchOutcome, HostEvent, Phase};
pub use locks::{LockReason, SlotLocks};

use crate::action::ActionDescriptor;
use crate::config::GearConfig;
use crate::env::GearHost;
use crate::state::{Fragment, ModeValue, SlotSet, TrackedState, compose};

use locks::{SlotLockManager, movement_applies};

/// Reactive equipment selector for one character session.
///
/// Borrows an immutable [`GearConfig`] for its whole lifetime. The host is
/// passed into each call rather than stored so the engine never outlives a
/// callback's access to it.
#[derive(Clone, Debug)]
pub struct GearEngine<'a> {
    config: &'a GearConfig,
    state: TrackedState,
    phase: Phase,
    locks: SlotLocks,
    pending_baseline: bool,
}

impl<'a> GearEngine<'a> {
    /// Creates an engine around an existing state, idle and with no locks.
    pub fn with_state(config: &'a GearConfig, state: TrackedState) -> Self {
        Self {
            config,
            state,
            phase: Phase::Idle,
            locks: SlotLocks::new(),
            pending_baseline: false,
        }
    }

    /// Starts a session.
    ///
    /// Registers every mode with the host, seeds tracked effects from the
    /// host's current buffs, picks the phase from combat status and restores
    /// any locks the current state calls for. Nothing is equipped.
    pub fn start(config: &'a GearConfig, host: &mut dyn GearHost) -> Result<Self, EngineError> {
        for (name, spec) in config.modes() {
            host.register_mode(name, spec);
        }

        let mut state = config.initial_state()?;
        state.sync_effects(&*host);

        let mut engine = Self::with_state(config, state);
        engine.phase = Phase::resting(host.is_engaged());

        let rules = config.rules();
        if engine.state.is_on(&rules.weapon_lock_mode) {
            engine.locks.acquire(LockReason::WeaponLock, SlotSet::WEAPONS);
            host.disable(SlotSet::WEAPONS);
        }
        if engine.state.effect(&rules.incapacitation_effect) {
            engine.locks.acquire(LockReason::Incapacitated, SlotSet::INCAPACITATION);
            host.disable(SlotSet::INCAPACITATION);
        }
        SlotLockManager::new(config).check_protected_rings(host, &mut engine.locks);

        tracing::info!(
            phase = %engine.phase,
            locked = %engine.locks.lock_set(),
            "gear engine started"
        );
        Ok(engine)
    }

    pub fn config(&self) -> &'a GearConfig {
        self.config
    }

    pub fn state(&self) -> &TrackedState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn locks(&self) -> &SlotLocks {
        &self.locks
    }

    /// Returns true while a baseline recompute is waiting for the in-flight
    /// action to finish.
    pub fn has_pending_baseline(&self) -> bool {
        self.pending_baseline
    }

    /// Routes a host event to its handler.
    pub fn dispatch(
        &mut self,
        host: &mut dyn GearHost,
        event: &HostEvent,
    ) -> Result<DispatchOutcome, EngineError> {
        let _span = tracing::debug_span!("dispatch", event = event.kind()).entered();

        match event {
            HostEvent::Precast {
                action,
                default_category,
            } => self.on_precast(host, action, default_category),
            HostEvent::PostMidcast {
                action,
                default_category,
            } => self.on_post_midcast(host, action, default_category),
            HostEvent::Aftercast { action } => self.on_aftercast(host, action),
            HostEvent::BuffChange { effect, gained } => self.on_buff_change(host, effect, *gained),
            HostEvent::StateChange { mode, new, old } => self.on_state_change(host, mode, new, old),
            HostEvent::StatusChange { engaged } => self.on_status_change(host, *engaged),
        }
    }

    /// Classifies the action and equips its precast override, if any.
    ///
    /// `handled` is set when an override was equipped; the host must then skip
    /// its generic precast equip for this action.
    pub fn on_precast(
        &mut self,
        host: &mut dyn GearHost,
        action: &ActionDescriptor,
        default_category: &str,
    ) -> Result<DispatchOutcome, EngineError> {
        let config = self.config;
        self.phase = Phase::Precast;
        self.sync_protected_items(host);

        let category = config.tables().classify(action, default_category);
        let mut outcome = DispatchOutcome {
            category: Some(category.to_string()),
            ..DispatchOutcome::default()
        };

        if let Some(precast) = config.precast_override(&action.name, category) {
            tracing::debug!(action = %action.name, set = %precast.set, "precast override");
            host.equip(config.library().get(&precast.set)?);
            outcome.handled = true;
            outcome.layers.push(precast.set.clone());
        }

        Ok(self.finish(host, outcome))
    }

    /// Layers the conditional midcast sets over the host's generic midcast
    /// equip.
    pub fn on_post_midcast(
        &mut self,
        host: &mut dyn GearHost,
        action: &ActionDescriptor,
        default_category: &str,
    ) -> Result<DispatchOutcome, EngineError> {
        let config = self.config;
        self.phase = Phase::Midcast;
        self.sync_protected_items(host);

        let category = config.tables().classify(action, default_category);
        let layers = midcast::midcast_layers(config, &self.state, action, host.is_engaged());
        for layer in &layers {
            host.equip(config.library().get(layer)?);
        }
        if !layers.is_empty() {
            tracing::debug!(action = %action.name, %category, layers = layers.len(), "midcast layers applied");
        }

        let outcome = DispatchOutcome {
            category: Some(category.to_string()),
            layers,
            ..DispatchOutcome::default()
        };
        Ok(self.finish(host, outcome))
    }

    /// Settles the phase once an action completes and flushes any baseline
    /// recompute deferred while it was in flight.
    ///
    /// The host reverts gear to the baseline on its own; the engine only
    /// re-applies it when a buff changed during the action.
    pub fn on_aftercast(
        &mut self,
        host: &mut dyn GearHost,
        action: &ActionDescriptor,
    ) -> Result<DispatchOutcome, EngineError> {
        self.phase = Phase::Aftercast;
        self.sync_protected_items(host);
        let engaged = host.is_engaged();

        let mut outcome = DispatchOutcome::default();
        if self.pending_baseline {
            tracing::debug!(action = %action.name, "flushing deferred baseline");
            self.apply_baseline(host, engaged)?;
            outcome.baseline = BaselineStatus::Applied;
        }

        self.phase = Phase::resting(engaged);
        Ok(self.finish(host, outcome))
    }

    /// Records a buff change and reacts to it.
    ///
    /// Untracked effects are ignored entirely. The incapacitating condition
    /// equips its set and holds rings and waist on gain, and releases them on
    /// loss. Every tracked change then requests a baseline recompute, which is
    /// deferred while an action is in flight.
    pub fn on_buff_change(
        &mut self,
        host: &mut dyn GearHost,
        effect: &str,
        gained: bool,
    ) -> Result<DispatchOutcome, EngineError> {
        let config = self.config;
        let rules = config.rules();

        if !self.state.set_effect(effect, gained) {
            return Ok(DispatchOutcome {
                phase: self.phase,
                ..DispatchOutcome::default()
            });
        }

        self.sync_protected_items(host);
        let mut outcome = DispatchOutcome::default();
        if effect.eq_ignore_ascii_case(&rules.incapacitation_effect) {
            let slots = SlotSet::INCAPACITATION;
            if gained {
                let set = &config.rule_sets().incapacitation;
                host.equip(config.library().get(set)?);
                host.send_message(&rules.incapacitation_message);
                self.locks.acquire(LockReason::Incapacitated, slots);
                host.disable(slots);
                outcome.layers.push(set.clone());
                tracing::info!(%effect, locked = %slots, "incapacitated");
            } else {
                // The condition overrides every other hold on these slots,
                // so protected items are re-locked before the baseline returns.
                self.locks.release_all(slots);
                host.enable(slots);
                tracing::info!(%effect, released = %slots, "incapacitation cleared");
                self.sync_protected_items(host);
            }
        }

        outcome.baseline = self.request_baseline(host)?;
        Ok(self.finish(host, outcome))
    }

    /// Stores a user mode change.
    ///
    /// The weapon-lock toggle disables the weapon slots when turned on and
    /// re-enables them when turned off. Other modes only change state.
    pub fn on_state_change(
        &mut self,
        host: &mut dyn GearHost,
        mode: &str,
        new: &ModeValue,
        old: &ModeValue,
    ) -> Result<DispatchOutcome, EngineError> {
        let previous = self.state.set_mode(mode, new.clone())?;
        if previous != *old {
            tracing::debug!(%mode, reported = %old, stored = %previous, "host reported a stale previous value");
        }

        if mode == self.config.rules().weapon_lock_mode {
            let slots = SlotSet::WEAPONS;
            if new.is_on() {
                self.locks.acquire(LockReason::WeaponLock, slots);
                host.disable(slots);
            } else {
                self.locks.release(LockReason::WeaponLock, slots);
                host.enable(slots);
            }
            tracing::debug!(%mode, value = %new, "weapon lock updated");
        }

        Ok(self.finish(host, DispatchOutcome::default()))
    }

    /// Moves between idle and engaged and recomputes the baseline.
    pub fn on_status_change(
        &mut self,
        host: &mut dyn GearHost,
        engaged: bool,
    ) -> Result<DispatchOutcome, EngineError> {
        if !self.phase.is_mid_action() {
            self.phase = Phase::resting(engaged);
        }
        self.sync_protected_items(host);

        let mut outcome = DispatchOutcome::default();
        if self.phase.is_mid_action() || host.is_mid_action() {
            self.pending_baseline = true;
            outcome.baseline = BaselineStatus::Deferred;
        } else {
            self.apply_baseline(host, engaged)?;
            outcome.baseline = BaselineStatus::Applied;
        }

        Ok(self.finish(host, outcome))
    }

    /// Recomputes and equips the baseline on request (the user's manual
    /// refresh), honoring the mid-action guard.
    pub fn refresh(&mut self, host: &mut dyn GearHost) -> Result<DispatchOutcome, EngineError> {
        self.sync_protected_items(host);
        let outcome = DispatchOutcome {
            baseline: self.request_baseline(host)?,
            ..DispatchOutcome::default()
        };
        Ok(self.finish(host, outcome))
    }

    /// Re-derives the protected-item locks after gear changed outside the
    /// engine, such as a manual swap. Nothing is equipped.
    pub fn on_equipment_change(&mut self, host: &mut dyn GearHost) -> DispatchOutcome {
        self.sync_protected_items(host);
        DispatchOutcome {
            phase: self.phase,
            ..DispatchOutcome::default()
        }
    }

    /// Layers the engine's automatic sets over `base`.
    ///
    /// In order: the defense set for the active defense mode, the movement
    /// set when kiting applies, and the incapacitation set while that
    /// condition is active.
    pub fn resolve_automatic_equip(&self, base: &Fragment) -> Result<Fragment, EngineError> {
        let config = self.config;
        let rules = config.rules();
        let sets = config.rule_sets();
        let library = config.library();

        let mut resolved = base.clone();
        if let Some(defense) = self.state.choice(&rules.defense_mode) {
            if defense != rules.defense_neutral {
                resolved = compose(&resolved, library.get(&sets.defense.child(defense))?);
            }
        }
        if movement_applies(config, &self.state) {
            resolved = compose(&resolved, library.get(&sets.kiting)?);
        }
        if self.state.effect(&rules.incapacitation_effect) {
            resolved = compose(&resolved, library.get(&sets.incapacitation)?);
        }
        Ok(resolved)
    }

    /// Computes the idle or engaged baseline for the current modes.
    ///
    /// The engaged set is refined by the offense mode and the idle set by the
    /// idle mode, then passed through [`Self::resolve_automatic_equip`].
    pub fn baseline(&self, engaged: bool) -> Result<Fragment, EngineError> {
        let config = self.config;
        let rules = config.rules();
        let sets = config.rule_sets();

        let (path, base) = if engaged {
            config
                .library()
                .select(&sets.engaged, self.state.choice(&rules.offense_mode))?
        } else {
            config
                .library()
                .select(&sets.idle, self.state.choice(&rules.idle_mode))?
        };
        tracing::trace!(%path, "baseline selected");
        self.resolve_automatic_equip(base)
    }

    fn request_baseline(&mut self, host: &mut dyn GearHost) -> Result<BaselineStatus, EngineError> {
        if self.phase.is_mid_action() || host.is_mid_action() {
            tracing::debug!(phase = %self.phase, "action in flight, deferring baseline");
            self.pending_baseline = true;
            return Ok(BaselineStatus::Deferred);
        }
        let engaged = host.is_engaged();
        self.apply_baseline(host, engaged)?;
        Ok(BaselineStatus::Applied)
    }

    fn apply_baseline(&mut self, host: &mut dyn GearHost, engaged: bool) -> Result<(), EngineError> {
        let fragment = self.baseline(engaged)?;
        host.equip(&fragment);
        self.pending_baseline = false;
        Ok(())
    }

    /// Locks any protected ring worn since the last check. Runs before every
    /// automatic equip.
    fn sync_protected_items(&mut self, host: &mut dyn GearHost) {
        SlotLockManager::new(self.config).check_protected_rings(host, &mut self.locks);
    }

    /// Runs the slot lock checks that follow every equip-affecting event.
    fn finish(&mut self, host: &mut dyn GearHost, mut outcome: DispatchOutcome) -> DispatchOutcome {
        let manager = SlotLockManager::new(self.config);

        if !self.phase.is_mid_action()
            && !host.is_mid_action()
            && manager.check_movement_gear(host, &self.state)
        {
            outcome.layers.push(self.config.rule_sets().kiting.clone());
        }
        manager.check_protected_rings(host, &mut self.locks);
        outcome.phase = self.phase;
        outcome
    }
}
