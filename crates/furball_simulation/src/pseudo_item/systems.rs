//! Pseudo-item observers: insert, verbs, guards

use bevy::ecs::system::SystemState;
use bevy::prelude::*;
use std::sync::Arc;

use crate::components::{reanchor_to_world_root, AttachedTo, Item, PseudoItem};
use crate::config::FurballConfig;
use crate::do_after::{start_do_after, DoAfterArgs, DoAfterEvent, DoAfterPayload};
use crate::interaction::{DropAttempt, EntRemovedFromContainer, GettingPickedUpAttempt};
use crate::storage::StorageService;
use crate::verbs::{GetVerbs, Verb, VerbKind};

pub const INSERT_SELF_VERB: &str = "action-name-insert-self";
pub const INSERT_OTHER_VERB: &str = "action-name-insert-other";
const INSERT_VERB_PRIORITY: i32 = 2;

// ============================================================================
// Insert
// ============================================================================

/// Положить pseudo-item в контейнер. true — entity теперь Disguised
///
/// Все команды идут через очередь `StorageService` (Item → insert → re-anchor).
pub fn try_insert(
    storage: &mut StorageService,
    container: Entity,
    entity: Entity,
    pseudo: &mut PseudoItem,
) -> bool {
    if !storage.has_storage(container) {
        return false;
    }
    if let Err(reason) = storage.can_insert(container, entity) {
        crate::log(&format!("PseudoItem: {:?} → {:?} blocked: {}", entity, container, reason));
        return false;
    }

    pseudo.active = true;
    storage.commands().entity(entity).insert(Item);

    if let Err(reason) = storage.insert(container, entity) {
        pseudo.active = false;
        storage.commands().entity(entity).remove::<Item>();
        crate::log_warning(&format!("PseudoItem: insert {:?} → {:?} failed: {}", entity, container, reason));
        return false;
    }

    // Членство держит Storage, spatial parent не нужен
    reanchor_to_world_root(storage.commands(), entity);

    crate::log(&format!("🎒 {:?} is now hiding in {:?}", entity, container));
    true
}

/// World-level try_insert (verb activation, host)
pub fn insert_pseudo_item(world: &mut World, container: Entity, entity: Entity) -> bool {
    let mut state = SystemState::<(Query<&mut PseudoItem>, StorageService)>::new(world);

    let inserted = {
        let (mut pseudos, mut storage) = state.get_mut(world);
        match pseudos.get_mut(entity) {
            Ok(mut pseudo) => try_insert(&mut storage, container, entity, &mut pseudo),
            Err(_) => false,
        }
    };

    state.apply(world);
    inserted
}

// ============================================================================
// Verbs
// ============================================================================

/// Innate verb: залезть в контейнер самому
pub fn add_insert_verb(
    mut trigger: Trigger<GetVerbs>,
    pseudos: Query<&PseudoItem>,
    attached: Query<&AttachedTo>,
    storage: StorageService,
) {
    let event = trigger.event();
    if event.kind != VerbKind::Innate || !event.can_interact_and_access() {
        return;
    }

    let (user, target) = (event.user, event.target);
    let Ok(pseudo) = pseudos.get(user) else {
        return;
    };
    if pseudo.active || !storage.has_storage(target) {
        return;
    }
    if storage.can_insert(target, user).is_err() {
        return;
    }
    // Контейнер в руках у entity / entity уже висит на контейнере
    if attached.get(target).is_ok_and(|a| a.parent() == user) {
        return;
    }
    if attached.get(user).is_ok_and(|a| a.parent() == target) {
        return;
    }

    trigger.event_mut().verbs.push(Verb {
        kind: VerbKind::Innate,
        text: INSERT_SELF_VERB,
        text_args: Vec::new(),
        priority: INSERT_VERB_PRIORITY,
        act: Arc::new(move |world: &mut World| {
            insert_pseudo_item(world, target, user);
        }),
    });
}

/// Alternative verb: засунуть target в сумку из своей руки (do-after)
pub fn add_insert_alt_verb(
    mut trigger: Trigger<GetVerbs>,
    pseudos: Query<(), With<PseudoItem>>,
    storage: StorageService,
    config: Res<FurballConfig>,
) {
    let event = trigger.event();
    if event.kind != VerbKind::Alternative || !event.can_interact_and_access() {
        return;
    }

    let (user, target) = (event.user, event.target);
    if user == target || !pseudos.contains(target) {
        return;
    }
    let Some(used) = event.active_hand_entity() else {
        return;
    };
    if !storage.has_storage(used) {
        return;
    }

    let delay = config.insert_other_delay;
    trigger.event_mut().verbs.push(Verb {
        kind: VerbKind::Alternative,
        text: INSERT_OTHER_VERB,
        text_args: vec![("target", target)],
        priority: INSERT_VERB_PRIORITY,
        act: Arc::new(move |world: &mut World| {
            let args = DoAfterArgs {
                user,
                delay,
                target,
                used: Some(used),
                break_on_move: true,
                need_hand: true,
            };
            start_do_after(world, args, DoAfterPayload::PseudoItemInsert);
        }),
    });
}

// ============================================================================
// Lifecycle + guards
// ============================================================================

/// Do-after insert-other завершён
pub fn on_do_after(
    mut trigger: Trigger<DoAfterEvent>,
    mut pseudos: Query<&mut PseudoItem>,
    mut storage: StorageService,
) {
    let target = trigger.target();
    let event = *trigger.event();

    if event.payload != DoAfterPayload::PseudoItemInsert || event.handled || event.cancelled {
        return;
    }
    let Some(used) = event.args.used else {
        return;
    };
    let Ok(mut pseudo) = pseudos.get_mut(target) else {
        return;
    };

    let inserted = try_insert(&mut storage, used, target, &mut pseudo);
    trigger.event_mut().handled = inserted;
}

/// Извлекли из контейнера → Free
pub fn on_ent_removed(
    trigger: Trigger<EntRemovedFromContainer>,
    mut pseudos: Query<&mut PseudoItem>,
    mut commands: Commands,
) {
    let entity = trigger.target();
    let Ok(mut pseudo) = pseudos.get_mut(entity) else {
        return;
    };
    if !pseudo.active {
        return;
    }

    pseudo.active = false;
    commands.entity(entity).remove::<Item>();
    crate::log(&format!(
        "🎒 {:?} left {:?}, no longer an item",
        entity,
        trigger.event().container
    ));
}

/// Чужой pickup Disguised entity отменяется
pub fn on_getting_picked_up_attempt(
    mut trigger: Trigger<GettingPickedUpAttempt>,
    pseudos: Query<&PseudoItem>,
    mut commands: Commands,
) {
    let entity = trigger.target();
    if !pseudos.get(entity).is_ok_and(|p| p.active) {
        return;
    }
    if trigger.event().user == entity {
        return;
    }

    reanchor_to_world_root(&mut commands, entity);
    trigger.event_mut().cancel();
}

/// Disguised entity нельзя уронить как предмет
pub fn on_drop_attempt(mut trigger: Trigger<DropAttempt>, pseudos: Query<&PseudoItem>) {
    if pseudos.get(trigger.target()).is_ok_and(|p| p.active) {
        trigger.event_mut().cancel();
    }
}
