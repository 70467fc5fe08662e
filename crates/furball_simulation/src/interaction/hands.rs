//! Hands interactions: pickup, drop, equip/unequip, throw
//!
//! World-level helpers — точки входа для хоста (input, AI, тесты).
//! Каждый helper поднимает attempt/notify события через dispatcher и
//! применяет результат, если никто не отменил.

use bevy::prelude::*;

use super::events::*;
use super::raise;
use crate::components::{AttachedTo, Hands};

/// Положить entity в активную руку (без attempt проверки)
///
/// Если рука занята — сначала unequip старого.
pub fn equip_hand(world: &mut World, user: Entity, item: Entity) {
    let previous = world.get::<Hands>(user).and_then(|h| h.active_hand_entity);
    if previous == Some(item) {
        return;
    }
    if previous.is_some() {
        unequip_hand(world, user);
    }

    let Some(mut hands) = world.get_mut::<Hands>(user) else {
        crate::log_warning(&format!("equip_hand: {:?} has no Hands", user));
        return;
    };
    hands.active_hand_entity = Some(item);

    if let Ok(mut entity) = world.get_entity_mut(item) {
        entity.insert(AttachedTo(user));
    }

    raise(world, user, DidEquipHand { equipped: item });
}

/// Освободить активную руку. Возвращает что было в руке
pub fn unequip_hand(world: &mut World, user: Entity) -> Option<Entity> {
    let item = world
        .get_mut::<Hands>(user)
        .and_then(|mut hands| hands.active_hand_entity.take())?;

    if let Ok(mut entity) = world.get_entity_mut(item) {
        if entity.get::<AttachedTo>() == Some(&AttachedTo(user)) {
            entity.remove::<AttachedTo>();
        }
    }

    raise(world, user, DidUnequipHand { unequipped: item });
    Some(item)
}

/// Попытка поднять entity. true — entity в руке
pub fn try_pickup(world: &mut World, user: Entity, item: Entity) -> bool {
    if world.get::<Hands>(user).is_none() {
        return false;
    }

    let attempt = raise(world, item, GettingPickedUpAttempt::new(user, item));
    if attempt.cancelled {
        crate::log(&format!("Pickup of {:?} by {:?} cancelled", item, user));
        return false;
    }

    equip_hand(world, user, item);
    true
}

/// Попытка уронить entity из активной руки. true — уронили
pub fn try_drop(world: &mut World, user: Entity) -> bool {
    let Some(item) = world.get::<Hands>(user).and_then(|h| h.active_hand_entity) else {
        return false;
    };

    let attempt = raise(world, item, DropAttempt::new(user));
    if attempt.cancelled {
        crate::log(&format!("Drop of {:?} by {:?} cancelled", item, user));
        return false;
    }

    unequip_hand(world, user).is_some()
}

/// Брошенная entity попала в target
pub fn throw_hit(world: &mut World, thrown: Entity, target: Entity) {
    raise(world, thrown, ThrowDoHit { target });
}
