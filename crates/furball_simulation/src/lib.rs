//! Furball Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: две gameplay подсистемы поверх общего
//! event-dispatch (observers) и per-tick (FixedUpdate) модели.
//!
//! - felinid: hairball / eat-mouse способности + тошнота от hairball
//! - pseudo_item: entity прячется в сумку как предмет (verbs + do-after)
//!
//! Компоненты — только данные. Поведение — в observers и systems подсистем.

use bevy::prelude::*;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::Range;
use std::time::Duration;

// Публичные модули
pub mod actions;
pub mod components;
pub mod config;
pub mod do_after;
pub mod felinid;
pub mod interaction;
pub mod logger;
pub mod prototypes;
pub mod pseudo_item;
pub mod storage;
pub mod verbs;

// Re-export базовых типов
pub use actions::{perform_action, Action, ActionId, ActionsPlugin, ActionsService};
pub use components::*;
pub use config::FurballConfig;
pub use do_after::{DoAfter, DoAfterEvent, DoAfterPlugin};
pub use felinid::FelinidPlugin;
pub use interaction::{InteractionPlugin, NauseaTriggered, PlaySound, PopupNotice};
pub use logger::{log, log_error, log_info, log_warning};
pub use prototypes::{EntityPrototypes, PrototypeId};
pub use pseudo_item::{try_insert, PseudoItemPlugin};
pub use storage::{ContainedIn, InsertBlocked, Storage, StoragePlugin, StorageService};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<FurballConfig>() {
            app.insert_resource(FurballConfig::default());
        }
        if !app.world().contains_resource::<DeterministicRng>() {
            // Детерминистичный RNG (seed по умолчанию)
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<EntityPrototypes>()
            // Collaborators, затем подсистемы
            .add_plugins((InteractionPlugin, ActionsPlugin, DoAfterPlugin, StoragePlugin))
            .add_plugins((FelinidPlugin, PseudoItemPlugin));
    }
}

/// RNG resource для вероятностных эффектов
///
/// По умолчанию seeded ChaCha8. Тесты подкладывают любой `RngCore`
/// (например `rand::rngs::mock::StepRng`) через `from_rng`.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: Box<dyn RngCore + Send + Sync>,
    /// None — scripted источник без seed
    pub seed: Option<u64>,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Box::new(ChaCha8Rng::seed_from_u64(seed)),
            seed: Some(seed),
        }
    }

    /// Scripted источник (seed неизвестен)
    pub fn from_rng(rng: impl RngCore + Send + Sync + 'static) -> Self {
        Self {
            rng: Box::new(rng),
            seed: None,
        }
    }

    /// true с вероятностью `chance` (uniform float < chance)
    pub fn prob(&mut self, chance: f32) -> bool {
        self.rng.gen::<f32>() < chance
    }

    /// Uniform из [start, end)
    pub fn next_range(&mut self, range: Range<u32>) -> u32 {
        self.rng.gen_range(range)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Прогнать один FixedUpdate тик с явной delta (детерминированно, без wall clock)
pub fn run_fixed_tick(world: &mut World, delta: f32) {
    world
        .resource_mut::<Time<Fixed>>()
        .advance_by(Duration::from_secs_f32(delta));
    world.run_schedule(FixedUpdate);
    world.flush();
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
