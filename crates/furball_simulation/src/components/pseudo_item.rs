//! Pseudo-item компоненты: PseudoItem, Item

use bevy::prelude::*;

/// PseudoItem — entity, которую можно положить в storage как предмет
///
/// Инвариант: `active == true` ⇔ entity лежит в контейнере И попала туда
/// через `pseudo_item::try_insert`. Любое извлечение из контейнера → false.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PseudoItem {
    pub active: bool,
}

impl PseudoItem {
    /// Free / Disguised
    pub fn state(&self) -> PseudoItemState {
        if self.active {
            PseudoItemState::Disguised
        } else {
            PseudoItemState::Free
        }
    }
}

/// Состояние pseudo-item FSM (вычисляется из `active`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoItemState {
    Free,
    Disguised,
}

/// Item — entity ведёт себя как переносимый предмет
///
/// Обычным предметам выдаётся на spawn. Pseudo-item получает его на время
/// пребывания в контейнере.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Item;
