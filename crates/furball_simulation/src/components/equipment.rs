//! Equipment компоненты: Hands, InventorySlots, IngestionBlocker
//!
//! # Архитектура
//!
//! **Hands** — что актор держит в активной руке:
//! - Один активный hand (other hands не моделируем)
//! - equip/unequip идут через `interaction::hands` (DidEquipHand / DidUnequipHand)
//!
//! **InventorySlots** — именованные слоты одежды ("mask", "head", ...):
//! - Lookup по имени слота
//!
//! **IngestionBlocker** — маска/шлем, закрывающие рот:
//! - `enabled == false` → маска поднята, есть/кашлять можно

use bevy::prelude::*;
use std::collections::HashMap;

/// Слот маски
pub const MASK_SLOT: &str = "mask";

/// Руки актора
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Hands {
    /// Entity в активной руке
    pub active_hand_entity: Option<Entity>,
}

impl Hands {
    pub fn holding(entity: Entity) -> Self {
        Self {
            active_hand_entity: Some(entity),
        }
    }

    pub fn is_holding(&self, entity: Entity) -> bool {
        self.active_hand_entity == Some(entity)
    }
}

/// Inventory слоты (одежда)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct InventorySlots {
    pub slots: HashMap<String, Entity>,
}

impl InventorySlots {
    /// Entity в слоте (если есть)
    pub fn slot_entity(&self, slot: &str) -> Option<Entity> {
        self.slots.get(slot).copied()
    }

    pub fn set_slot(&mut self, slot: impl Into<String>, entity: Entity) {
        self.slots.insert(slot.into(), entity);
    }

    pub fn clear_slot(&mut self, slot: &str) -> Option<Entity> {
        self.slots.remove(slot)
    }
}

/// Блокирует приём пищи (и кашель) пока надет и включён
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct IngestionBlocker {
    pub enabled: bool,
}

impl Default for IngestionBlocker {
    fn default() -> Self {
        Self { enabled: true }
    }
}
