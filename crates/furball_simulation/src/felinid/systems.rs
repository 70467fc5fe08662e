//! Felinid observers + hairball sweep

use bevy::prelude::*;

use crate::actions::ActionsService;
use crate::components::{
    Bloodstream, CoughingUpHairball, Felinid, FelinidFood, Hands, Hunger, HungerThreshold,
    IngestionBlocker, InventorySlots, SolutionContainer, MASK_SLOT,
};
use crate::config::FurballConfig;
use crate::interaction::{
    DidEquipHand, DidUnequipHand, EatMouseActionEvent, HairballActionEvent, MapInit, PlaySound,
    PopupKind, PopupNotice,
};
use crate::prototypes::EntityPrototypes;
use crate::{log, log_error, DeterministicRng};

use super::HAIRBALL_SOUND;

// ============================================================================
// Action grants
// ============================================================================

/// MapInit: выдать hairball action (если сконфигурирован и ещё не выдан)
pub fn on_map_init(
    trigger: Trigger<MapInit>,
    mut felinids: Query<&mut Felinid>,
    mut actions: ActionsService,
) {
    let uid = trigger.target();
    let Ok(mut felinid) = felinids.get_mut(uid) else {
        return;
    };

    let Some(action_id) = felinid.hairball_action.clone() else {
        return;
    };
    if felinid.hairball_action_entity.is_some() {
        return;
    }

    felinid.hairball_action_entity = actions.grant(uid, &action_id);
}

/// Еда в руке → eat-mouse action
pub fn on_equip_hand(
    trigger: Trigger<DidEquipHand>,
    mut felinids: Query<&mut Felinid>,
    food: Query<(), With<FelinidFood>>,
    mut actions: ActionsService,
) {
    let uid = trigger.target();
    let equipped = trigger.event().equipped;

    let Ok(mut felinid) = felinids.get_mut(uid) else {
        return;
    };
    if !food.contains(equipped) {
        return;
    }
    // Без eat action target не нужен (handle и target живут парой)
    let Some(action_id) = felinid.eat_action.clone() else {
        return;
    };

    if felinid.eat_action_entity.is_none() {
        felinid.eat_action_entity = actions.grant(uid, &action_id);
    }
    if felinid.eat_action_entity.is_some() {
        felinid.eat_action_target = Some(equipped);
    }
}

/// Еду убрали из руки → отозвать eat-mouse action
pub fn on_unequip_hand(
    trigger: Trigger<DidUnequipHand>,
    mut felinids: Query<&mut Felinid>,
    mut actions: ActionsService,
) {
    let uid = trigger.target();
    let Ok(mut felinid) = felinids.get_mut(uid) else {
        return;
    };

    if felinid.eat_action_target != Some(trigger.event().unequipped) {
        return;
    }

    let handle = felinid.take_eat_action();
    if felinid.eat_action.is_some() {
        if let Some(handle) = handle {
            actions.revoke(handle);
        }
    }
}

// ============================================================================
// Hairball action
// ============================================================================

/// Маска в слоте, которая сейчас закрывает рот
pub fn blocking_mask(
    uid: Entity,
    inventories: &Query<&InventorySlots>,
    blockers: &Query<&IngestionBlocker>,
) -> Option<Entity> {
    let mask = inventories.get(uid).ok()?.slot_entity(MASK_SLOT)?;
    let blocker = blockers.get(mask).ok()?;
    blocker.enabled.then_some(mask)
}

/// Кашель: через маску нельзя, иначе запускаем CoughingUpHairball
pub fn on_hairball_action(
    mut trigger: Trigger<HairballActionEvent>,
    felinids: Query<(), With<Felinid>>,
    inventories: Query<&InventorySlots>,
    blockers: Query<&IngestionBlocker>,
    config: Res<FurballConfig>,
    mut popups: EventWriter<PopupNotice>,
    mut sounds: EventWriter<PlaySound>,
    mut commands: Commands,
) {
    let uid = trigger.target();
    if !felinids.contains(uid) {
        return;
    }

    if let Some(mask) = blocking_mask(uid, &inventories, &blockers) {
        // handled не ставим: charge/cooldown не тратятся
        popups.write(PopupNotice {
            source: uid,
            recipient: Some(uid),
            key: "hairball-mask",
            args: vec![("mask", mask)],
            kind: PopupKind::Small,
        });
        return;
    }

    popups.write(PopupNotice {
        source: uid,
        recipient: None,
        key: "hairball-cough",
        args: vec![("name", uid)],
        kind: PopupKind::Small,
    });
    sounds.write(PlaySound {
        source: uid,
        path: HAIRBALL_SOUND.to_string(),
        variation: Some(0.15),
    });

    commands
        .entity(uid)
        .insert_if_new(CoughingUpHairball::new(config.cough_up_time));
    trigger.event_mut().handled = true;

    log(&format!("🐈 {:?} started coughing up a hairball", uid));
}

// ============================================================================
// Eat mouse action
// ============================================================================

/// Съесть еду из руки: hunger +N, вернуть один charge кашля, action одноразовый
#[allow(clippy::too_many_arguments)]
pub fn on_eat_mouse_action(
    mut trigger: Trigger<EatMouseActionEvent>,
    mut felinids: Query<&mut Felinid>,
    mut hungers: Query<&mut Hunger>,
    mut hands: Query<&mut Hands>,
    inventories: Query<&InventorySlots>,
    blockers: Query<&IngestionBlocker>,
    exists: Query<()>,
    mut actions: ActionsService,
    mut rng: ResMut<DeterministicRng>,
    config: Res<FurballConfig>,
    mut popups: EventWriter<PopupNotice>,
    mut sounds: EventWriter<PlaySound>,
    mut commands: Commands,
) {
    let uid = trigger.target();
    let Ok(mut felinid) = felinids.get_mut(uid) else {
        return;
    };
    let Some(target) = felinid.eat_action_target else {
        return;
    };
    let Ok(mut hunger) = hungers.get_mut(uid) else {
        return;
    };

    if hunger.current_threshold() == HungerThreshold::Overfed {
        popups.write(PopupNotice {
            source: uid,
            recipient: Some(uid),
            key: "food-system-you-cannot-eat-any-more",
            args: Vec::new(),
            kind: PopupKind::SmallCaution,
        });
        return;
    }

    if let Some(mask) = blocking_mask(uid, &inventories, &blockers) {
        popups.write(PopupNotice {
            source: uid,
            recipient: Some(uid),
            key: "hairball-mask",
            args: vec![("mask", mask)],
            kind: PopupKind::SmallCaution,
        });
        return;
    }

    // Съел: ровно один кашель обратно, cooldown сгорает
    if felinid.hairball_action.is_some() {
        if let Some(hairball_action) = felinid.hairball_action_entity {
            actions.set_charges(hairball_action, 1);
            actions.set_enabled(hairball_action, true);
            actions.clear_cooldown(hairball_action);
        }
    }

    if exists.contains(target) {
        commands.entity(target).despawn();
    }
    felinid.eat_action_target = None;
    if let Ok(mut hands) = hands.get_mut(uid) {
        if hands.is_holding(target) {
            hands.active_hand_entity = None;
        }
    }

    let variant = rng.next_range(1..3);
    sounds.write(PlaySound {
        source: uid,
        path: format!("/Audio/Items/eating_{}.ogg", variant),
        variation: Some(0.15),
    });

    hunger.modify(config.eat_hunger_gain);

    let eat_action = felinid.eat_action_entity.take();
    if felinid.eat_action.is_some() {
        if let Some(eat_action) = eat_action {
            actions.revoke(eat_action);
        }
    }

    trigger.event_mut().handled = true;
    log(&format!("🐭 {:?} ate {:?} (hunger: {:.1})", uid, target, hunger.current));
}

// ============================================================================
// Hairball sweep (FixedUpdate)
// ============================================================================

/// System: накопление CoughingUpHairball, spawn hairball по порогу
///
/// Удаление CoughingUpHairball идёт второй фазой после обхода query.
pub fn update_coughing_up_hairball(
    mut commands: Commands,
    mut coughing: Query<(Entity, &mut CoughingUpHairball, &Felinid, Option<&Transform>)>,
    mut bloodstreams: Query<(&Bloodstream, &mut SolutionContainer)>,
    prototypes: Res<EntityPrototypes>,
    config: Res<FurballConfig>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let mut finished = Vec::new();

    for (uid, mut hairball, felinid, transform) in coughing.iter_mut() {
        if !hairball.tick(delta) {
            continue;
        }

        hairball.accumulator = 0.0;
        let position = transform.map(|t| t.translation).unwrap_or(Vec3::ZERO);
        let source = bloodstreams.get_mut(uid).ok();

        spawn_hairball(
            &mut commands,
            &prototypes,
            felinid,
            position,
            source,
            config.hairball_transfer_volume,
        );
        finished.push(uid);
    }

    for uid in finished {
        commands.entity(uid).remove::<CoughingUpHairball>();
    }
}

/// Spawn hairball + перелить до `volume` units из кровотока
///
/// Нехватка жидкости или переполнение hairball не мешают spawn.
pub fn spawn_hairball(
    commands: &mut Commands,
    prototypes: &EntityPrototypes,
    felinid: &Felinid,
    position: Vec3,
    source: Option<(&Bloodstream, Mut<SolutionContainer>)>,
    volume: f32,
) -> Option<Entity> {
    let Some(mut instance) = prototypes.instantiate(&felinid.hairball_prototype) else {
        log_error(&format!("Hairball prototype not found: {:?}", felinid.hairball_prototype));
        return None;
    };

    if let Some((bloodstream, mut solutions)) = source {
        if let Some(chemicals) = solutions.get_mut(&bloodstream.chemical_solution_name) {
            let portion = chemicals.split(volume);
            let slot = instance.hairball.as_ref().map(|h| h.solution_name.clone());

            if let Some(sink) = slot.and_then(|name| instance.solutions.get_mut(&name)) {
                if sink.try_add(portion).is_err() {
                    log("Hairball solution overflow, portion discarded");
                }
            }
        }
    }

    let hairball = instance.spawn(commands, position);
    log(&format!("🧶 Hairball {:?} spawned at {:?}", hairball, position));
    Some(hairball)
}
