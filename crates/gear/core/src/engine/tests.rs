use std::collections::{BTreeMap, BTreeSet};

use super::*;
use crate::action::{ClassificationTable, ClassificationTables, Skill, TableKind, TargetKind};
use crate::config::RuleConfig;
use crate::library::{SetDecl, SetLibrary, SetPath};
use crate::state::{ItemRef, ModeSpec, Slot};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Equip(Fragment),
    Enable(SlotSet),
    Disable(SlotSet),
    Message(String),
}

#[derive(Default)]
struct RecordingHost {
    worn: BTreeMap<Slot, ItemRef>,
    disabled: SlotSet,
    effects: BTreeSet<String>,
    engaged: bool,
    mid_action: bool,
    registered: Vec<String>,
    commands: Vec<Command>,
}

impl RecordingHost {
    fn wearing(mut self, slot: Slot, item: &str) -> Self {
        self.worn.insert(slot, ItemRef::new(item));
        self
    }

    fn with_effect(mut self, effect: &str) -> Self {
        self.effects.insert(effect.to_ascii_lowercase());
        self
    }

    fn worn(&self, slot: Slot) -> Option<&str> {
        self.worn.get(&slot).map(|item| item.name.as_str())
    }

    fn equips(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Equip(_)))
            .count()
    }

    fn clear(&mut self) {
        self.commands.clear();
    }
}

impl crate::env::PlayerOracle for RecordingHost {
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

impl crate::env::CommandSink for RecordingHost {
    fn equip(&mut self, fragment: &Fragment) {
        for (slot, value) in fragment.iter() {
            if self.disabled.has(slot) {
                continue;
            }
            match value.item() {
                Some(item) => self.worn.insert(slot, item.clone()),
                None => self.worn.remove(&slot),
            };
        }
        self.commands.push(Command::Equip(fragment.clone()));
    }

    fn enable(&mut self, slots: SlotSet) {
        self.disabled.remove(slots);
        self.commands.push(Command::Enable(slots));
    }

    fn disable(&mut self, slots: SlotSet) {
        self.disabled.insert(slots);
        self.commands.push(Command::Disable(slots));
    }

    fn send_message(&mut self, text: &str) {
        self.commands.push(Command::Message(text.to_string()));
    }

    fn register_mode(&mut self, name: &str, _spec: &ModeSpec) {
        self.registered.push(name.to_string());
    }
}

fn path(raw: &str) -> SetPath {
    SetPath::parse(raw).unwrap()
}

fn set(raw: &str, items: &[(Slot, &str)]) -> SetDecl {
    let fragment = items
        .iter()
        .fold(Fragment::builder(), |b, (slot, item)| b.item(*slot, *item))
        .build();
    SetDecl::plain(path(raw), fragment)
}

fn config() -> GearConfig {
    let library = SetLibrary::builder()
        .declare(set(
            "idle",
            &[
                (Slot::Main, "Daybreak"),
                (Slot::Ring1, "Stikini Ring +1"),
                (Slot::Ring2, "Stikini Ring +1"),
                (Slot::Waist, "Fucho-no-Obi"),
                (Slot::Feet, "Nyame Sollerets"),
            ],
        ))
        .declare(set("idle.Refresh", &[(Slot::Body, "Lethargy Sayon +3")]))
        .declare(set("engaged", &[(Slot::Ring1, "Chirich Ring +1"), (Slot::Waist, "Orpheus's Sash")]))
        .declare(set("engaged.Acc", &[(Slot::Ring1, "Cacoethic Ring +1")]))
        .declare(set("defense", &[]))
        .declare(set("defense.PDT", &[(Slot::Body, "Nyame Mail")]))
        .declare(set("kiting", &[(Slot::Legs, "Carmine Cuisses +1")]))
        .declare(set("buff.Saboteur", &[(Slot::Hands, "Lethargy Gantherots +3")]))
        .declare(set("buff.Composure", &[(Slot::Head, "Lethargy Chappel +3")]))
        .declare(set("buff.Doom", &[(Slot::Ring1, "Purity Ring"), (Slot::Waist, "Gishdubar Sash")]))
        .declare(set("midcast.Sleeps", &[(Slot::Body, "Atrophy Tabard +3")]))
        .declare(set(
            "midcast.Sleeps.MaxDuration",
            &[(Slot::Ring2, "Kishar Ring"), (Slot::Feet, "Vitiation Boots +3")],
        ))
        .declare(set("magic_burst", &[(Slot::Head, "Ea Hat +1")]))
        .declare(set("magic_burst.Engaged", &[(Slot::Main, "Bunzi's Rod")]))
        .declare(set(
            "precast.Impact",
            &[(Slot::Body, "Twilight Cloak"), (Slot::Ring1, "Kishar Ring")],
        ))
        .build()
        .unwrap();

    let tables = ClassificationTables::new(vec![
        ClassificationTable::new(TableKind::SkillEnfeebling, "MndEnfeebles", ["Distract III", "Frazzle III"]),
        ClassificationTable::new(TableKind::MndEnfeebling, "MndEnfeebles", ["Paralyze", "Slow II"]),
        ClassificationTable::new(TableKind::IntEnfeebling, "IntEnfeebles", ["Blind", "Gravity"]),
        ClassificationTable::new(TableKind::DurationEnfeebling, "Sleeps", ["Sleep", "Sleep II"]),
        ClassificationTable::new(TableKind::SkillEnhancing, "SkillEnhancing", ["Temper II"]),
    ]);

    GearConfig::builder(library)
        .tables(tables)
        .mode("OffenseMode", ModeSpec::cycle(["Normal", "Acc"], "Normal"))
        .mode("IdleMode", ModeSpec::cycle(["Normal", "Refresh"], "Normal"))
        .mode("DefenseMode", ModeSpec::cycle(["None", "PDT"], "None"))
        .mode("Kiting", ModeSpec::toggle(false))
        .mode("MagicBurst", ModeSpec::toggle(false))
        .mode("WeaponLock", ModeSpec::toggle(false))
        .protect_item("Warp Ring")
        .protect_item("Dimensional Ring Holla")
        .precast_override("Impact", path("precast.Impact"))
        .build()
        .unwrap()
}

fn spell(name: &str, skill: Skill, target: TargetKind) -> ActionDescriptor {
    ActionDescriptor::new(name, skill, target)
}

#[test]
fn start_registers_modes_and_seeds_effects() {
    let config = config();
    let mut host = RecordingHost::default().with_effect("Saboteur");
    let engine = GearEngine::start(&config, &mut host).unwrap();

    assert_eq!(host.registered.len(), 6);
    assert!(engine.state().effect("Saboteur"));
    assert!(!engine.state().effect("Stymie"));
    assert_eq!(engine.phase(), Phase::Idle);
    assert!(engine.locks().lock_set().is_empty());
    assert_eq!(host.equips(), 0);
}

#[test]
fn start_restores_locks_for_worn_protected_rings_and_active_doom() {
    let config = config();
    let mut host = RecordingHost::default()
        .wearing(Slot::Ring2, "Warp Ring")
        .with_effect("doom");
    host.engaged = true;

    let engine = GearEngine::start(&config, &mut host).unwrap();
    assert_eq!(engine.phase(), Phase::Engaged);
    assert_eq!(engine.locks().lock_set(), SlotSet::INCAPACITATION);
    assert_eq!(engine.locks().held_by(LockReason::ProtectedItem), SlotSet::RING2);
}

#[test]
fn precast_override_marks_the_event_handled() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    let impact = spell("Impact", Skill::ElementalMagic, TargetKind::Enemy);
    let outcome = engine.on_precast(&mut host, &impact, "ElementalMagic").unwrap();

    assert!(outcome.handled);
    assert_eq!(outcome.phase, Phase::Precast);
    assert_eq!(outcome.layers, vec![path("precast.Impact")]);
    assert_eq!(host.worn(Slot::Body), Some("Twilight Cloak"));

    let sleep = spell("Sleep II", Skill::EnfeeblingMagic, TargetKind::Enemy);
    let outcome = engine.on_precast(&mut host, &sleep, "EnfeeblingMagic").unwrap();
    assert!(!outcome.handled);
    assert_eq!(outcome.category.as_deref(), Some("Sleeps"));
}

#[test]
fn saboteur_and_stymie_select_max_duration_for_sleeps() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();
    engine.on_buff_change(&mut host, "Saboteur", true).unwrap();
    engine.on_buff_change(&mut host, "Stymie", true).unwrap();

    let sleep = spell("Sleep II", Skill::EnfeeblingMagic, TargetKind::Enemy);
    let outcome = engine.on_post_midcast(&mut host, &sleep, "EnfeeblingMagic").unwrap();

    assert_eq!(outcome.layers, vec![path("midcast.Sleeps.MaxDuration")]);
    assert_eq!(outcome.phase, Phase::Midcast);
    assert_eq!(host.worn(Slot::Ring2), Some("Kishar Ring"));
}

#[test]
fn sleeps_without_stymie_keep_the_standard_midcast() {
    let config = config();
    let mut host = RecordingHost::default().with_effect("Saboteur");
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    let sleep = spell("Sleep", Skill::EnfeeblingMagic, TargetKind::Enemy);
    let outcome = engine.on_post_midcast(&mut host, &sleep, "EnfeeblingMagic").unwrap();
    assert!(outcome.layers.is_empty());
}

#[test]
fn saboteur_layers_over_primary_stat_enfeebles_only() {
    let config = config();
    let mut host = RecordingHost::default().with_effect("Saboteur");
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    let paralyze = spell("Paralyze", Skill::EnfeeblingMagic, TargetKind::Enemy);
    let outcome = engine.on_post_midcast(&mut host, &paralyze, "EnfeeblingMagic").unwrap();
    assert_eq!(outcome.layers, vec![path("buff.Saboteur")]);

    let distract = spell("Distract III", Skill::EnfeeblingMagic, TargetKind::Enemy);
    let outcome = engine.on_post_midcast(&mut host, &distract, "EnfeeblingMagic").unwrap();
    assert_eq!(outcome.category.as_deref(), Some("MndEnfeebles"));
    assert!(outcome.layers.is_empty());
}

#[test]
fn composure_layers_over_self_targeted_enhancing() {
    let config = config();
    let mut host = RecordingHost::default().with_effect("Composure");
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    let temper = spell("Temper II", Skill::EnhancingMagic, TargetKind::SelfTarget);
    let outcome = engine.on_post_midcast(&mut host, &temper, "EnhancingMagic").unwrap();
    assert_eq!(outcome.layers, vec![path("buff.Composure")]);
    assert_eq!(host.worn(Slot::Head), Some("Lethargy Chappel +3"));

    let refresh = spell("Refresh III", Skill::EnhancingMagic, TargetKind::Party);
    let outcome = engine.on_post_midcast(&mut host, &refresh, "EnhancingMagic").unwrap();
    assert!(outcome.layers.is_empty());
}

#[test]
fn magic_burst_adds_the_engaged_layer_when_engaged() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();
    engine
        .on_state_change(&mut host, "MagicBurst", &ModeValue::Toggle(true), &ModeValue::Toggle(false))
        .unwrap();

    let fire = spell("Fire V", Skill::ElementalMagic, TargetKind::Enemy);
    let outcome = engine.on_post_midcast(&mut host, &fire, "ElementalMagic").unwrap();
    assert_eq!(outcome.layers, vec![path("magic_burst")]);

    host.engaged = true;
    let outcome = engine.on_post_midcast(&mut host, &fire, "ElementalMagic").unwrap();
    assert_eq!(outcome.layers, vec![path("magic_burst"), path("magic_burst.Engaged")]);
}

#[test]
fn doom_with_protected_rings_locks_and_then_restores_baseline() {
    let config = config();
    let mut host = RecordingHost::default()
        .wearing(Slot::Ring1, "Warp Ring")
        .wearing(Slot::Ring2, "Dimensional Ring Holla");
    let mut engine = GearEngine::start(&config, &mut host).unwrap();
    assert_eq!(host.disabled, SlotSet::RING1 | SlotSet::RING2);
    host.clear();

    let outcome = engine.on_buff_change(&mut host, "doom", true).unwrap();
    assert_eq!(host.disabled, SlotSet::INCAPACITATION);
    assert_eq!(engine.locks().lock_set(), SlotSet::INCAPACITATION);
    assert_eq!(outcome.layers, vec![path("buff.Doom")]);
    assert!(host.commands.contains(&Command::Message(RuleConfig::DEFAULT_INCAPACITATION_MESSAGE.into())));
    // Rings stayed put; the waist was free when the doom set went on.
    assert_eq!(host.worn(Slot::Ring1), Some("Warp Ring"));
    assert_eq!(host.worn(Slot::Waist), Some("Gishdubar Sash"));

    host.clear();
    let outcome = engine.on_buff_change(&mut host, "doom", false).unwrap();
    assert_eq!(outcome.baseline, BaselineStatus::Applied);
    assert_eq!(
        &host.commands[..3],
        &[
            Command::Enable(SlotSet::INCAPACITATION),
            Command::Disable(SlotSet::RING1),
            Command::Disable(SlotSet::RING2),
        ]
    );
    assert_eq!(host.disabled, SlotSet::RING1 | SlotSet::RING2);
    assert_eq!(engine.locks().lock_set(), SlotSet::RING1 | SlotSet::RING2);
    assert_eq!(engine.locks().held_by(LockReason::ProtectedItem), SlotSet::RING1 | SlotSet::RING2);
    // The baseline came back everywhere except the protected rings.
    assert_eq!(host.worn(Slot::Ring1), Some("Warp Ring"));
    assert_eq!(host.worn(Slot::Ring2), Some("Dimensional Ring Holla"));
    assert_eq!(host.worn(Slot::Waist), Some("Fucho-no-Obi"));
}

#[test]
fn buff_change_mid_action_defers_the_baseline_until_aftercast() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    let paralyze = spell("Paralyze", Skill::EnfeeblingMagic, TargetKind::Enemy);
    engine.on_precast(&mut host, &paralyze, "EnfeeblingMagic").unwrap();
    host.mid_action = true;
    host.clear();

    let outcome = engine.on_buff_change(&mut host, "Saboteur", true).unwrap();
    assert_eq!(outcome.baseline, BaselineStatus::Deferred);
    assert!(engine.has_pending_baseline());
    assert_eq!(host.equips(), 0);

    host.mid_action = false;
    let outcome = engine.on_aftercast(&mut host, &paralyze).unwrap();
    assert_eq!(outcome.baseline, BaselineStatus::Applied);
    assert_eq!(outcome.phase, Phase::Idle);
    assert!(!engine.has_pending_baseline());
    assert_eq!(host.equips(), 1);
}

#[test]
fn host_mid_action_flag_alone_defers_the_baseline() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();
    host.mid_action = true;

    let outcome = engine.on_buff_change(&mut host, "Composure", true).unwrap();
    assert_eq!(outcome.baseline, BaselineStatus::Deferred);
    assert_eq!(host.equips(), 0);
}

#[test]
fn untracked_effects_are_ignored() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    let outcome = engine.on_buff_change(&mut host, "Protect", true).unwrap();
    assert_eq!(outcome.baseline, BaselineStatus::NotRequested);
    assert!(host.commands.is_empty());
}

#[test]
fn weapon_lock_toggles_the_weapon_slots() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    engine
        .on_state_change(&mut host, "WeaponLock", &ModeValue::Toggle(true), &ModeValue::Toggle(false))
        .unwrap();
    assert_eq!(host.disabled, SlotSet::WEAPONS);
    assert_eq!(engine.locks().held_by(LockReason::WeaponLock), SlotSet::WEAPONS);

    engine
        .on_state_change(&mut host, "WeaponLock", &ModeValue::Toggle(false), &ModeValue::Toggle(true))
        .unwrap();
    assert!(host.disabled.is_empty());
    assert!(engine.locks().lock_set().is_empty());
}

#[test]
fn invalid_mode_values_are_rejected() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    let err = engine
        .on_state_change(&mut host, "DefenseMode", &ModeValue::from("MDT"), &ModeValue::from("None"))
        .unwrap_err();
    assert!(matches!(err, EngineError::State(_)));
    assert_eq!(engine.state().choice("DefenseMode"), Some("None"));
}

#[test]
fn baseline_follows_status_and_mode_qualifiers() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    engine
        .on_state_change(&mut host, "OffenseMode", &ModeValue::from("Acc"), &ModeValue::from("Normal"))
        .unwrap();
    host.engaged = true;
    let outcome = engine.on_status_change(&mut host, true).unwrap();

    assert_eq!(outcome.phase, Phase::Engaged);
    assert_eq!(outcome.baseline, BaselineStatus::Applied);
    assert_eq!(host.worn(Slot::Ring1), Some("Cacoethic Ring +1"));

    let idle = engine.baseline(false).unwrap();
    assert_eq!(idle.item(Slot::Main).map(|i| i.name.as_str()), Some("Daybreak"));
}

#[test]
fn automatic_equip_layers_defense_then_movement() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    engine
        .on_state_change(&mut host, "Kiting", &ModeValue::Toggle(true), &ModeValue::Toggle(false))
        .unwrap();
    let resolved = engine.resolve_automatic_equip(&Fragment::empty()).unwrap();
    assert_eq!(resolved.item(Slot::Legs).map(|i| i.name.as_str()), Some("Carmine Cuisses +1"));

    engine
        .on_state_change(&mut host, "DefenseMode", &ModeValue::from("PDT"), &ModeValue::from("None"))
        .unwrap();
    let resolved = engine.resolve_automatic_equip(&Fragment::empty()).unwrap();
    assert_eq!(resolved.item(Slot::Body).map(|i| i.name.as_str()), Some("Nyame Mail"));
    assert!(resolved.item(Slot::Legs).is_none());
}

#[test]
fn movement_gear_is_reapplied_after_events_when_kiting() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    let outcome = engine
        .on_state_change(&mut host, "Kiting", &ModeValue::Toggle(true), &ModeValue::Toggle(false))
        .unwrap();
    assert_eq!(outcome.layers, vec![path("kiting")]);
    assert_eq!(host.worn(Slot::Legs), Some("Carmine Cuisses +1"));
}

#[test]
fn protected_ring_lock_follows_the_worn_item() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();
    let acc = ModeValue::from("Acc");
    let normal = ModeValue::from("Normal");

    // The user puts the ring on by hand; the next event locks it.
    host.worn.insert(Slot::Ring1, ItemRef::new("Warp Ring"));
    engine.on_state_change(&mut host, "OffenseMode", &acc, &normal).unwrap();
    assert_eq!(engine.locks().held_by(LockReason::ProtectedItem), SlotSet::RING1);
    assert_eq!(host.commands.last(), Some(&Command::Disable(SlotSet::RING1)));

    // A baseline recompute leaves the locked ring alone.
    engine.refresh(&mut host).unwrap();
    assert_eq!(host.worn(Slot::Ring1), Some("Warp Ring"));

    host.worn.insert(Slot::Ring1, ItemRef::new("Stikini Ring +1"));
    host.clear();
    engine.on_state_change(&mut host, "OffenseMode", &normal, &acc).unwrap();
    assert!(engine.locks().lock_set().is_empty());
    assert_eq!(host.commands, vec![Command::Enable(SlotSet::RING1)]);

    host.clear();
    engine.on_state_change(&mut host, "OffenseMode", &acc, &normal).unwrap();
    assert!(host.commands.is_empty());
}

#[test]
fn dispatch_routes_events_to_handlers() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    let event = HostEvent::Precast {
        action: spell("Blind", Skill::EnfeeblingMagic, TargetKind::Enemy),
        default_category: "EnfeeblingMagic".into(),
    };
    let outcome = engine.dispatch(&mut host, &event).unwrap();
    assert_eq!(outcome.category.as_deref(), Some("IntEnfeebles"));
    assert_eq!(engine.phase(), Phase::Precast);
}

#[test]
fn precast_override_leaves_a_hand_worn_protected_ring() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    host.worn.insert(Slot::Ring1, ItemRef::new("Warp Ring"));
    let impact = spell("Impact", Skill::ElementalMagic, TargetKind::Enemy);
    let outcome = engine.on_precast(&mut host, &impact, "ElementalMagic").unwrap();

    assert!(outcome.handled);
    assert_eq!(host.worn(Slot::Ring1), Some("Warp Ring"));
    assert_eq!(host.worn(Slot::Body), Some("Twilight Cloak"));
    assert_eq!(host.commands.first(), Some(&Command::Disable(SlotSet::RING1)));
}

#[test]
fn deferred_baseline_at_aftercast_leaves_a_protected_ring() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    let paralyze = spell("Paralyze", Skill::EnfeeblingMagic, TargetKind::Enemy);
    engine.on_precast(&mut host, &paralyze, "EnfeeblingMagic").unwrap();
    host.mid_action = true;
    engine.on_buff_change(&mut host, "Saboteur", true).unwrap();

    host.worn.insert(Slot::Ring2, ItemRef::new("Warp Ring"));
    host.mid_action = false;
    let outcome = engine.on_aftercast(&mut host, &paralyze).unwrap();

    assert_eq!(outcome.baseline, BaselineStatus::Applied);
    assert_eq!(host.worn(Slot::Ring2), Some("Warp Ring"));
    assert_eq!(host.worn(Slot::Ring1), Some("Stikini Ring +1"));
    assert_eq!(engine.locks().held_by(LockReason::ProtectedItem), SlotSet::RING2);
}

#[test]
fn doom_gained_after_a_manual_ring_swap_keeps_the_ring() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    host.worn.insert(Slot::Ring1, ItemRef::new("Dimensional Ring Holla"));
    engine.on_buff_change(&mut host, "doom", true).unwrap();
    assert_eq!(host.worn(Slot::Ring1), Some("Dimensional Ring Holla"));
    assert_eq!(host.worn(Slot::Waist), Some("Gishdubar Sash"));

    engine.on_buff_change(&mut host, "doom", false).unwrap();
    assert_eq!(host.worn(Slot::Ring1), Some("Dimensional Ring Holla"));
    assert_eq!(host.disabled, SlotSet::RING1);
}

#[test]
fn equipment_change_locks_without_equipping() {
    let config = config();
    let mut host = RecordingHost::default();
    let mut engine = GearEngine::start(&config, &mut host).unwrap();

    host.worn.insert(Slot::Ring2, ItemRef::new("Warp Ring"));
    let outcome = engine.on_equipment_change(&mut host);

    assert_eq!(outcome.phase, Phase::Idle);
    assert_eq!(host.commands, vec![Command::Disable(SlotSet::RING2)]);
    assert_eq!(host.equips(), 0);
}
