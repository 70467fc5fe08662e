//! Entity prototypes — статические шаблоны для spawn
//!
//! # Архитектура
//!
//! **EntityPrototype** — immutable blueprint (id + name + опциональные templates):
//! - Хранится в `EntityPrototypes` resource (HashMap lookup)
//! - Создаются hardcoded в `EntityPrototypes::default()`
//!
//! **PrototypeInstance** — ещё не заспавненный экземпляр:
//! - Компоненты можно подправить до spawn (например, налить раствор)
//! - `spawn()` кладёт всё через Commands

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::components::{Hairball, Item, Solution, SolutionContainer};

/// Prototype identifier ("Hairball", "Mouse", ...)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub struct PrototypeId(pub String);

impl From<&str> for PrototypeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Hairball template: слот раствора под содержимое
#[derive(Clone, Debug)]
pub struct HairballTemplate {
    pub solution_name: String,
    pub max_volume: f32,
}

/// Static entity definition
#[derive(Clone, Debug)]
pub struct EntityPrototype {
    pub id: PrototypeId,
    pub name: String,
    /// Получает Item компонент (можно подобрать/положить в сумку)
    pub item: bool,
    pub hairball: Option<HairballTemplate>,
}

/// Registry прототипов
#[derive(Resource, Debug, Clone)]
pub struct EntityPrototypes {
    prototypes: HashMap<PrototypeId, EntityPrototype>,
}

impl Default for EntityPrototypes {
    fn default() -> Self {
        let mut registry = Self {
            prototypes: HashMap::new(),
        };

        registry.register(EntityPrototype {
            id: PrototypeId::from("Hairball"),
            name: "hairball".to_string(),
            item: true,
            hairball: Some(HairballTemplate {
                solution_name: "hairball".to_string(),
                max_volume: 100.0,
            }),
        });

        registry
    }
}

impl EntityPrototypes {
    pub fn register(&mut self, prototype: EntityPrototype) {
        self.prototypes.insert(prototype.id.clone(), prototype);
    }

    pub fn get(&self, id: &PrototypeId) -> Option<&EntityPrototype> {
        self.prototypes.get(id)
    }

    /// Собрать экземпляр (без spawn)
    pub fn instantiate(&self, id: &PrototypeId) -> Option<PrototypeInstance> {
        let prototype = self.get(id)?;

        let mut solutions = SolutionContainer::default();
        let hairball = prototype.hairball.as_ref().map(|template| {
            solutions
                .solutions
                .insert(template.solution_name.clone(), Solution::with_capacity(template.max_volume));
            Hairball {
                solution_name: template.solution_name.clone(),
            }
        });

        Some(PrototypeInstance {
            name: Name::new(prototype.name.clone()),
            item: prototype.item,
            hairball,
            solutions,
        })
    }
}

/// Экземпляр прототипа до spawn
#[derive(Debug, Clone)]
pub struct PrototypeInstance {
    pub name: Name,
    pub item: bool,
    pub hairball: Option<Hairball>,
    pub solutions: SolutionContainer,
}

impl PrototypeInstance {
    /// Spawn в мире в заданной позиции
    pub fn spawn(self, commands: &mut Commands, position: Vec3) -> Entity {
        let mut entity = commands.spawn((
            self.name,
            Transform::from_translation(position),
            self.solutions,
        ));

        if self.item {
            entity.insert(Item);
        }
        if let Some(hairball) = self.hairball {
            entity.insert(hairball);
        }

        entity.id()
    }
}
