//! Felinid abilities module
//!
//! # Architecture
//!
//! **Observers (Interaction dispatcher):**
//! - `MapInit` → выдать hairball action
//! - `DidEquipHand` / `DidUnequipHand` → выдать/отозвать eat-mouse action
//! - `HairballActionEvent` → кашель (CoughingUpHairball)
//! - `EatMouseActionEvent` → съесть мышь (hunger + вернуть charge кашля)
//! - `ThrowDoHit` / `GettingPickedUpAttempt` на Hairball → шанс тошноты
//!
//! **FixedUpdate:**
//! - `update_coughing_up_hairball` — накопление таймера, spawn hairball,
//!   двухфазное удаление CoughingUpHairball
//!
//! # Hairball Flow
//!
//! ```text
//! HairballActionEvent (маска не мешает)
//!   ↓ popup + звук, CoughingUpHairball { accumulator: 0 }
//! update_coughing_up_hairball (каждый тик)
//!   ↓ accumulator ≥ cough_up_time
//! spawn Hairball + перелить ≤20u из Bloodstream → remove CoughingUpHairball
//! ```

use bevy::prelude::*;

pub mod hairball;
pub mod systems;

#[cfg(test)]
mod systems_tests;

pub use hairball::*;
pub use systems::*;

pub const HAIRBALL_SOUND: &str = "/Audio/Effects/Species/hairball.ogg";

/// Felinid plugin
pub struct FelinidPlugin;

impl Plugin for FelinidPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(on_map_init)
            .add_observer(on_equip_hand)
            .add_observer(on_unequip_hand)
            .add_observer(on_hairball_action)
            .add_observer(on_eat_mouse_action)
            .add_observer(on_hairball_hit)
            .add_observer(on_hairball_pickup_attempt)
            .add_systems(FixedUpdate, update_coughing_up_hairball);
    }
}
