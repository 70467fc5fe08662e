//! Verbs — контекстное меню действий (user → target)
//!
//! # Flow
//!
//! ```text
//! host: collect_verbs(world, user, target, context)
//!   ↓ GetVerbs { kind: Innate } на user       (что user умеет сам)
//!   ↓ GetVerbs { kind: Alternative } на target (что можно сделать с target)
//! observers подсистем добавляют Verb в event.verbs
//!   ↓
//! host показывает меню → activate(world, &verb)
//! ```
//!
//! Рендер меню и проверки дистанции — забота хоста (`VerbContext`).

use bevy::prelude::*;
use std::fmt;
use std::sync::Arc;

use crate::components::Hands;
use crate::interaction::{raise, LocKey};

/// Категория verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbKind {
    /// Действие самого user (raised on user)
    Innate,
    /// Альтернативное действие над target (raised on target)
    Alternative,
}

/// Что выполнить при выборе verb
pub type VerbAct = Arc<dyn Fn(&mut World) + Send + Sync>;

/// Пункт меню
#[derive(Clone)]
pub struct Verb {
    pub kind: VerbKind,
    pub text: LocKey,
    pub text_args: Vec<(&'static str, Entity)>,
    pub priority: i32,
    pub act: VerbAct,
}

impl fmt::Debug for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verb")
            .field("kind", &self.kind)
            .field("text", &self.text)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Результат проверок взаимодействия (делает хост)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerbContext {
    pub can_interact: bool,
    pub can_access: bool,
}

impl Default for VerbContext {
    fn default() -> Self {
        Self {
            can_interact: true,
            can_access: true,
        }
    }
}

/// Сбор verbs (raised on user для Innate, на target для Alternative)
#[derive(Event, Debug, Clone)]
pub struct GetVerbs {
    pub kind: VerbKind,
    pub user: Entity,
    pub target: Entity,
    pub can_interact: bool,
    pub can_access: bool,
    /// None — у user нет рук
    pub hands: Option<Hands>,
    pub verbs: Vec<Verb>,
}

impl GetVerbs {
    pub fn can_interact_and_access(&self) -> bool {
        self.can_interact && self.can_access
    }

    /// Entity в активной руке user
    pub fn active_hand_entity(&self) -> Option<Entity> {
        self.hands.as_ref().and_then(|h| h.active_hand_entity)
    }
}

/// Собрать все verbs user → target (сортировка по priority, больше — выше)
pub fn collect_verbs(world: &mut World, user: Entity, target: Entity, context: VerbContext) -> Vec<Verb> {
    let hands = world.get::<Hands>(user).cloned();
    let mut verbs = Vec::new();

    for (kind, raised_on) in [(VerbKind::Innate, user), (VerbKind::Alternative, target)] {
        let event = raise(
            world,
            raised_on,
            GetVerbs {
                kind,
                user,
                target,
                can_interact: context.can_interact,
                can_access: context.can_access,
                hands: hands.clone(),
                verbs: Vec::new(),
            },
        );
        verbs.extend(event.verbs);
    }

    verbs.sort_by(|a, b| b.priority.cmp(&a.priority));
    verbs
}

/// Выполнить выбранный verb
pub fn activate(world: &mut World, verb: &Verb) {
    (verb.act)(world);
    world.flush();
}
