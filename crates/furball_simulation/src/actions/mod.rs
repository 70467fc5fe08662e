//! Actions — выдаваемые способности (action bar)
//!
//! # Architecture
//!
//! **Action = entity** с компонентом `Action` (charges, cooldown, enabled).
//! Владелец хранит handle (`Entity`) у себя в trait компоненте.
//!
//! **Lifecycle:**
//! - `ActionsService::grant` → spawn action entity, вернуть handle
//! - `ActionsService::revoke` → despawn action entity
//! - `perform_action` → поднять action event на владельце;
//!   если observer пометил handled → потратить charge + запустить cooldown
//!
//! **ActionDefinitions** — static registry (id → event kind + charges/cooldown).

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::interaction::{raise, EatMouseActionEvent, HairballActionEvent};

pub const HAIRBALL_ACTION: &str = "ActionHairball";
pub const EAT_MOUSE_ACTION: &str = "ActionEatMouse";

/// Action identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Какое событие поднимает action при активации
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum ActionEventKind {
    Hairball,
    EatMouse,
}

/// Static action definition
#[derive(Clone, Debug)]
pub struct ActionDefinition {
    pub event: ActionEventKind,
    /// None = без ограничения
    pub charges: Option<u32>,
    /// Cooldown после успешного использования (секунды)
    pub cooldown: Option<f32>,
}

/// Registry action definitions
#[derive(Resource, Debug, Clone)]
pub struct ActionDefinitions {
    definitions: HashMap<ActionId, ActionDefinition>,
}

impl Default for ActionDefinitions {
    fn default() -> Self {
        let mut definitions = HashMap::new();

        definitions.insert(
            ActionId::from(HAIRBALL_ACTION),
            ActionDefinition {
                event: ActionEventKind::Hairball,
                charges: Some(1),
                cooldown: Some(30.0),
            },
        );
        definitions.insert(
            ActionId::from(EAT_MOUSE_ACTION),
            ActionDefinition {
                event: ActionEventKind::EatMouse,
                charges: None,
                cooldown: None,
            },
        );

        Self { definitions }
    }
}

impl ActionDefinitions {
    pub fn get(&self, id: &ActionId) -> Option<&ActionDefinition> {
        self.definitions.get(id)
    }

    pub fn insert(&mut self, id: ActionId, definition: ActionDefinition) {
        self.definitions.insert(id, definition);
    }
}

/// Выданный action (живёт на отдельной entity)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Action {
    pub id: ActionId,
    pub owner: Entity,
    pub event: ActionEventKind,
    pub charges: Option<u32>,
    pub enabled: bool,
    pub cooldown: Option<f32>,
    pub cooldown_remaining: f32,
}

impl Action {
    pub fn new(id: ActionId, owner: Entity, definition: &ActionDefinition) -> Self {
        Self {
            id,
            owner,
            event: definition.event,
            charges: definition.charges,
            enabled: true,
            cooldown: definition.cooldown,
            cooldown_remaining: 0.0,
        }
    }

    /// Можно ли активировать прямо сейчас
    pub fn is_usable(&self) -> bool {
        self.enabled && self.cooldown_remaining <= 0.0 && self.charges != Some(0)
    }

    /// Потратить использование: charge + cooldown
    pub fn consume_use(&mut self) {
        if let Some(charges) = self.charges.as_mut() {
            *charges = charges.saturating_sub(1);
            if *charges == 0 {
                self.enabled = false;
            }
        }
        if let Some(cooldown) = self.cooldown {
            self.cooldown_remaining = cooldown;
        }
    }
}

/// Action-grant сервис (SystemParam для observers/systems)
#[derive(SystemParam)]
pub struct ActionsService<'w, 's> {
    commands: Commands<'w, 's>,
    actions: Query<'w, 's, &'static mut Action>,
    definitions: Res<'w, ActionDefinitions>,
}

impl ActionsService<'_, '_> {
    /// Выдать action владельцу. None — definition не найдена
    pub fn grant(&mut self, owner: Entity, id: &ActionId) -> Option<Entity> {
        let Some(definition) = self.definitions.get(id) else {
            crate::log_error(&format!("Action definition not found: {:?}", id));
            return None;
        };

        let action = Action::new(id.clone(), owner, definition);
        let handle = self.commands.spawn(action).id();
        crate::log(&format!("Granted action {} to {:?} → {:?}", id.0, owner, handle));
        Some(handle)
    }

    /// Отозвать action (despawn). Повторный revoke — no-op
    pub fn revoke(&mut self, handle: Entity) {
        if self.actions.get(handle).is_err() {
            return;
        }
        self.commands.entity(handle).despawn();
        crate::log(&format!("Revoked action {:?}", handle));
    }

    pub fn set_charges(&mut self, handle: Entity, charges: u32) {
        if let Ok(mut action) = self.actions.get_mut(handle) {
            action.charges = Some(charges);
        }
    }

    pub fn set_enabled(&mut self, handle: Entity, enabled: bool) {
        if let Ok(mut action) = self.actions.get_mut(handle) {
            action.enabled = enabled;
        }
    }

    pub fn clear_cooldown(&mut self, handle: Entity) {
        if let Ok(mut action) = self.actions.get_mut(handle) {
            action.cooldown_remaining = 0.0;
        }
    }
}

/// Активировать action (input / AI). true — событие обработано
pub fn perform_action(world: &mut World, handle: Entity) -> bool {
    let Some(action) = world.get::<Action>(handle) else {
        crate::log_warning(&format!("perform_action: {:?} is not an action", handle));
        return false;
    };

    if !action.is_usable() {
        return false;
    }

    let (owner, kind) = (action.owner, action.event);
    let handled = match kind {
        ActionEventKind::Hairball => {
            raise(world, owner, HairballActionEvent { action: handle, handled: false }).handled
        }
        ActionEventKind::EatMouse => {
            raise(world, owner, EatMouseActionEvent { action: handle, handled: false }).handled
        }
    };

    // Action мог быть отозван observer'ом (одноразовый eat)
    if handled {
        if let Some(mut action) = world.get_mut::<Action>(handle) {
            action.consume_use();
        }
    }

    handled
}

/// System: обновление action cooldown таймеров
pub fn update_action_cooldowns(mut query: Query<&mut Action>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut action in query.iter_mut() {
        if action.cooldown_remaining > 0.0 {
            action.cooldown_remaining = (action.cooldown_remaining - delta).max(0.0);
        }
    }
}

/// Actions plugin
pub struct ActionsPlugin;

impl Plugin for ActionsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActionDefinitions>()
            .add_systems(FixedUpdate, update_action_cooldowns);
    }
}
