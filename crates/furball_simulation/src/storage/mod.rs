//! Storage — контейнеры (сумки, ящики) и членство в них
//!
//! # Architecture
//!
//! **Storage** (на контейнере) — bookkeeping содержимого + capacity.
//! **ContainedIn** (на содержимом) — обратная ссылка на контейнер.
//!
//! Spatial parent (`AttachedTo`) ставится при insert, но отдельные подсистемы
//! могут перевесить entity на world root — членство от этого не меняется.
//!
//! Извлечение (любым путём) поднимает `EntRemovedFromContainer` на entity.
//!
//! **Despawn:** контейнер исчез → всё содержимое извлекается (с событием);
//! исчез член → слот в `contents` освобождается.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use thiserror::Error;

use crate::components::AttachedTo;
use crate::interaction::{raise, EntRemovedFromContainer};

/// Storage plugin (чистка членства при despawn)
pub struct StoragePlugin;

impl Plugin for StoragePlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(on_storage_removed)
            .add_observer(on_contained_in_removed);
    }
}

/// Контейнер
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Storage {
    pub capacity: usize,
    pub contents: Vec<Entity>,
}

impl Default for Storage {
    fn default() -> Self {
        Self::with_capacity(4)
    }
}

impl Storage {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            contents: Vec::new(),
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.contents.contains(&entity)
    }

    pub fn is_full(&self) -> bool {
        self.contents.len() >= self.capacity
    }
}

/// Entity лежит в контейнере
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ContainedIn(pub Entity);

/// Причина, по которой insert невозможен
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InsertBlocked {
    #[error("target has no storage")]
    NoStorage,
    #[error("cannot insert a container into itself")]
    SelfInsertion,
    #[error("entity is already inside a container")]
    AlreadyContained,
    #[error("container is held by the entity being inserted")]
    Recursive,
    #[error("container is full")]
    Full,
}

/// Storage сервис (SystemParam для observers/systems)
#[derive(SystemParam)]
pub struct StorageService<'w, 's> {
    commands: Commands<'w, 's>,
    storages: Query<'w, 's, &'static mut Storage>,
    contained: Query<'w, 's, &'static ContainedIn>,
    attached: Query<'w, 's, &'static AttachedTo>,
}

impl<'w, 's> StorageService<'w, 's> {
    /// Очередь команд сервиса (follow-up команды идут строго после insert/remove)
    pub fn commands(&mut self) -> &mut Commands<'w, 's> {
        &mut self.commands
    }

    pub fn has_storage(&self, container: Entity) -> bool {
        self.storages.contains(container)
    }

    /// Проверка без побочных эффектов. Ok — insert пройдёт
    pub fn can_insert(&self, container: Entity, entity: Entity) -> Result<(), InsertBlocked> {
        let storage = self.storages.get(container).map_err(|_| InsertBlocked::NoStorage)?;
        check_insert(storage, container, entity, self.contained.contains(entity), self.attached.get(container).ok())
    }

    /// Положить entity в контейнер
    pub fn insert(&mut self, container: Entity, entity: Entity) -> Result<(), InsertBlocked> {
        self.can_insert(container, entity)?;

        let mut storage = self.storages.get_mut(container).map_err(|_| InsertBlocked::NoStorage)?;
        storage.contents.push(entity);

        self.commands
            .entity(entity)
            .insert((ContainedIn(container), AttachedTo(container)));

        crate::log(&format!("Storage: {:?} inserted into {:?}", entity, container));
        Ok(())
    }

    /// Достать entity из контейнера. false — её там не было
    pub fn remove(&mut self, container: Entity, entity: Entity) -> bool {
        let Ok(mut storage) = self.storages.get_mut(container) else {
            return false;
        };
        if !storage.contains(entity) {
            return false;
        }
        storage.contents.retain(|e| *e != entity);

        let attached_here = self.attached.get(entity).is_ok_and(|a| a.parent() == container);
        let mut commands = self.commands.entity(entity);
        commands.remove::<ContainedIn>();
        if attached_here {
            commands.remove::<AttachedTo>();
        }

        self.commands
            .trigger_targets(EntRemovedFromContainer { container }, entity);
        true
    }
}

fn check_insert(
    storage: &Storage,
    container: Entity,
    entity: Entity,
    already_contained: bool,
    container_parent: Option<&AttachedTo>,
) -> Result<(), InsertBlocked> {
    if container == entity {
        return Err(InsertBlocked::SelfInsertion);
    }
    if already_contained || storage.contains(entity) {
        return Err(InsertBlocked::AlreadyContained);
    }
    if container_parent.is_some_and(|parent| parent.parent() == entity) {
        return Err(InsertBlocked::Recursive);
    }
    if storage.is_full() {
        return Err(InsertBlocked::Full);
    }
    Ok(())
}

/// Storage снят / контейнер despawn → извлечь всё содержимое
pub fn on_storage_removed(
    trigger: Trigger<OnRemove, Storage>,
    storages: Query<&Storage>,
    attached: Query<&AttachedTo>,
    exists: Query<()>,
    mut commands: Commands,
) {
    let container = trigger.target();
    let Ok(storage) = storages.get(container) else {
        return;
    };

    for &member in &storage.contents {
        if !exists.contains(member) {
            continue;
        }

        let mut entity = commands.entity(member);
        entity.try_remove::<ContainedIn>();
        if attached.get(member).is_ok_and(|a| a.parent() == container) {
            entity.try_remove::<AttachedTo>();
        }
        commands.trigger_targets(EntRemovedFromContainer { container }, member);
    }

    if !storage.contents.is_empty() {
        crate::log(&format!(
            "Storage: {:?} removed, released {} entities",
            container,
            storage.contents.len()
        ));
    }
}

/// ContainedIn снят (в т.ч. despawn члена) → освободить слот
pub fn on_contained_in_removed(
    trigger: Trigger<OnRemove, ContainedIn>,
    contained: Query<&ContainedIn>,
    mut storages: Query<&mut Storage>,
) {
    let entity = trigger.target();
    let Ok(&ContainedIn(container)) = contained.get(entity) else {
        return;
    };
    if let Ok(mut storage) = storages.get_mut(container) {
        storage.contents.retain(|e| *e != entity);
    }
}

/// World-level извлечение (host: кто-то вытащил entity из сумки)
pub fn remove_from_container(world: &mut World, container: Entity, entity: Entity) -> bool {
    let Some(mut storage) = world.get_mut::<Storage>(container) else {
        return false;
    };
    if !storage.contains(entity) {
        return false;
    }
    storage.contents.retain(|e| *e != entity);

    if let Ok(mut contained) = world.get_entity_mut(entity) {
        contained.remove::<ContainedIn>();
        if contained.get::<AttachedTo>().is_some_and(|a| a.parent() == container) {
            contained.remove::<AttachedTo>();
        }
    }

    raise(world, entity, EntRemovedFromContainer { container });
    true
}

/// Контейнер, в котором лежит entity
pub fn container_of(world: &World, entity: Entity) -> Option<Entity> {
    world.get::<ContainedIn>(entity).map(|c| c.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (Entity, Entity) {
        (Entity::from_raw(1), Entity::from_raw(2))
    }

    #[test]
    fn test_check_insert_ok() {
        let (container, entity) = ids();
        let storage = Storage::with_capacity(1);

        assert_eq!(check_insert(&storage, container, entity, false, None), Ok(()));
    }

    #[test]
    fn test_check_insert_reasons() {
        let (container, entity) = ids();
        let mut storage = Storage::with_capacity(1);

        assert_eq!(
            check_insert(&storage, container, container, false, None),
            Err(InsertBlocked::SelfInsertion)
        );
        assert_eq!(
            check_insert(&storage, container, entity, true, None),
            Err(InsertBlocked::AlreadyContained)
        );
        assert_eq!(
            check_insert(&storage, container, entity, false, Some(&AttachedTo(entity))),
            Err(InsertBlocked::Recursive)
        );

        storage.contents.push(Entity::from_raw(3));
        assert_eq!(
            check_insert(&storage, container, entity, false, None),
            Err(InsertBlocked::Full)
        );
    }

    #[test]
    fn test_remove_from_container_world() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        let container = world.spawn(Storage::default()).id();
        world.entity_mut(entity).insert((ContainedIn(container), AttachedTo(container)));
        world.get_mut::<Storage>(container).expect("storage").contents.push(entity);

        assert!(remove_from_container(&mut world, container, entity));
        assert!(container_of(&world, entity).is_none());
        assert!(world.get::<AttachedTo>(entity).is_none());

        // Повторно — её там уже нет
        assert!(!remove_from_container(&mut world, container, entity));
    }

    #[test]
    fn test_despawned_member_frees_slot() {
        let mut app = App::new();
        app.add_plugins(StoragePlugin);
        let world = app.world_mut();
        let container = world.spawn(Storage::with_capacity(1)).id();
        let first = world.spawn_empty().id();

        world.entity_mut(first).insert((ContainedIn(container), AttachedTo(container)));
        world.get_mut::<Storage>(container).expect("storage").contents.push(first);
        assert!(world.get::<Storage>(container).is_some_and(|s| s.is_full()));

        world.despawn(first);
        world.flush();

        let storage = world.get::<Storage>(container).expect("storage");
        assert!(storage.contents.is_empty());
        assert!(!storage.is_full());
    }

    #[test]
    fn test_despawned_container_releases_contents() {
        let mut app = App::new();
        app.add_plugins(StoragePlugin);
        let world = app.world_mut();
        let container = world.spawn(Storage::default()).id();
        let entity = world.spawn_empty().id();

        world.entity_mut(entity).insert((ContainedIn(container), AttachedTo(container)));
        world.get_mut::<Storage>(container).expect("storage").contents.push(entity);

        world.despawn(container);
        world.flush();

        assert!(world.get_entity(entity).is_ok());
        assert!(container_of(world, entity).is_none());
        assert!(world.get::<AttachedTo>(entity).is_none());
    }
}
