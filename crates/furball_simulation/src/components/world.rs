//! World positioning компоненты: AttachedTo

use bevy::prelude::*;

/// Spatial parent: entity привязана к другой entity (рука, сумка, стол)
///
/// Отсутствие компонента = entity заякорена на grid/map root.
/// Членство в контейнере хранится отдельно (`storage::ContainedIn`),
/// поэтому pseudo-item внутри сумки может не иметь AttachedTo.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AttachedTo(pub Entity);

impl AttachedTo {
    pub fn parent(&self) -> Entity {
        self.0
    }
}

/// Снять spatial parent: entity заякорена на grid/map root
pub fn reanchor_to_world_root(commands: &mut Commands, entity: Entity) {
    commands.entity(entity).remove::<AttachedTo>();
}
