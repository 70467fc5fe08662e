//! Interaction события
//!
//! # Architecture
//!
//! **Targeted events (observers):**
//! Поднимаются на конкретной entity через `interaction::raise` или
//! `Commands::trigger_targets`. Observer подсистемы резолвит свой trait
//! компонент на `trigger.target()` и выходит, если компонента нет.
//!
//! **Attempt events** (`GettingPickedUpAttempt`, `DropAttempt`):
//! - observer может вызвать `cancel()`
//! - инициатор читает `cancelled` после dispatch
//!
//! **Action events** (`HairballActionEvent`, `EatMouseActionEvent`):
//! - observer выставляет `handled = true` если действие состоялось
//! - `actions::perform_action` тратит charge/cooldown только при handled
//!
//! **Outbound events (EventWriter):**
//! `PopupNotice`, `PlaySound`, `NauseaTriggered` — для presentation слоя.

use bevy::prelude::*;

// ============================================================================
// World lifecycle
// ============================================================================

/// Entity инициализирована на карте (один раз после spawn)
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct MapInit;

// ============================================================================
// Hands
// ============================================================================

/// Актор взял entity в руку (raised on user)
#[derive(Event, Debug, Clone, Copy)]
pub struct DidEquipHand {
    pub equipped: Entity,
}

/// Актор убрал entity из руки (raised on user)
#[derive(Event, Debug, Clone, Copy)]
pub struct DidUnequipHand {
    pub unequipped: Entity,
}

/// Кто-то пытается поднять entity (raised on item)
#[derive(Event, Debug, Clone, Copy)]
pub struct GettingPickedUpAttempt {
    pub user: Entity,
    pub item: Entity,
    pub cancelled: bool,
}

impl GettingPickedUpAttempt {
    pub fn new(user: Entity, item: Entity) -> Self {
        Self {
            user,
            item,
            cancelled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

/// Кто-то пытается уронить entity (raised on dropped entity)
#[derive(Event, Debug, Clone, Copy)]
pub struct DropAttempt {
    pub user: Entity,
    pub cancelled: bool,
}

impl DropAttempt {
    pub fn new(user: Entity) -> Self {
        Self {
            user,
            cancelled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

// ============================================================================
// Throwing
// ============================================================================

/// Брошенная entity попала в цель (raised on thrown entity)
#[derive(Event, Debug, Clone, Copy)]
pub struct ThrowDoHit {
    pub target: Entity,
}

// ============================================================================
// Containers
// ============================================================================

/// Entity извлечена из контейнера — любым способом (raised on entity)
#[derive(Event, Debug, Clone, Copy)]
pub struct EntRemovedFromContainer {
    pub container: Entity,
}

// ============================================================================
// Actions
// ============================================================================

/// Активирован hairball action (raised on performer)
#[derive(Event, Debug, Clone, Copy)]
pub struct HairballActionEvent {
    pub action: Entity,
    pub handled: bool,
}

/// Активирован eat-mouse action (raised on performer)
#[derive(Event, Debug, Clone, Copy)]
pub struct EatMouseActionEvent {
    pub action: Entity,
    pub handled: bool,
}

// ============================================================================
// Outbound (presentation)
// ============================================================================

/// Localization key (реальный текст — забота presentation слоя)
pub type LocKey = &'static str;

/// Стиль popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupKind {
    #[default]
    Small,
    SmallCaution,
}

/// Всплывающее сообщение
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PopupNotice {
    /// Над кем показываем
    pub source: Entity,
    /// Кому видно (None = всем рядом)
    pub recipient: Option<Entity>,
    pub key: LocKey,
    /// Аргументы локализации (имя → entity)
    pub args: Vec<(&'static str, Entity)>,
    pub kind: PopupKind,
}

/// Проиграть звук на entity
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlaySound {
    pub source: Entity,
    pub path: String,
    /// Pitch variation (±)
    pub variation: Option<f32>,
}

/// Entity стошнило (status-effect сервис)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NauseaTriggered {
    pub entity: Entity,
}
