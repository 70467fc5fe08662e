//! Interaction dispatcher — synchronous event bus поверх Bevy observers
//!
//! # Architecture
//!
//! Подсистемы регистрируют observers в своём `Plugin::build` (один раз на старте App).
//! Ключ (component, event): observer берёт `trigger.target()` и резолвит свой
//! trait компонент через Query — если его нет, событие не для этой подсистемы.
//!
//! ```text
//! host / collaborator
//!   ↓ interaction::raise(world, target, event)
//! World::trigger_targets_ref → observers (синхронно, по очереди)
//!   ↓ observers мутируют event (handled / cancelled) + компоненты
//! host читает итоговый event
//! ```
//!
//! Внутри observers/systems follow-up события идут через
//! `Commands::trigger_targets` (выполняются на ближайшем flush).

use bevy::prelude::*;

pub mod events;
pub mod hands;

pub use events::*;
pub use hands::{equip_hand, throw_hit, try_drop, try_pickup, unequip_hand};

/// Поднять событие на entity и вернуть его после всех observers
///
/// Команды, накопленные observers, применяются до возврата.
pub fn raise<E: Event>(world: &mut World, target: Entity, mut event: E) -> E {
    world.trigger_targets_ref(&mut event, target);
    world.flush();
    event
}

/// Инициализация entity на карте (MapInit)
pub fn map_init(world: &mut World, entity: Entity) {
    raise(world, entity, MapInit);
}

/// Interaction plugin: outbound события для presentation слоя
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PopupNotice>()
            .add_event::<PlaySound>()
            .add_event::<NauseaTriggered>();
    }
}
