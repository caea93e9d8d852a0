//! The [`World`] is the top-level container for the ECS. It owns the entity
//! allocator, the component registry, and one sparse-set storage per
//! component type.

use std::any::TypeId;
use std::collections::HashMap;

use crate::component::{Component, ComponentRegistry, ComponentTypeId};
use crate::entity::{EntityAllocator, EntityId};
use crate::query::{ComponentSet, View};
use crate::storage::{ErasedStorage, SparseSet};
use crate::EcsError;

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// The entity store.
///
/// Entities are plain [`EntityId`]s; all data lives in component storages.
/// Every accessor validates the id's generation, so a handle cached across a
/// destruction is reported as stale rather than aliasing a recycled slot.
#[derive(Default)]
pub struct World {
    /// Entity ID allocator.
    allocator: EntityAllocator,
    /// Component type registry.
    registry: ComponentRegistry,
    /// One storage per component type, keyed by Rust `TypeId`.
    storages: HashMap<TypeId, Box<dyn ErasedStorage>>,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entity_count", &self.allocator.alive_count())
            .field("component_types", &self.registry.len())
            .finish()
    }
}

impl World {
    /// Create a new, empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only access to the component registry.
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Register a component type under a human-readable name.
    ///
    /// Optional: attaching an unregistered type registers it under its Rust
    /// type name.
    pub fn register_component<T: Component>(&mut self, name: &str) -> ComponentTypeId {
        let id = self.registry.register::<T>(name);
        self.storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SparseSet::<T>::new()));
        id
    }

    // -- storage helpers ----------------------------------------------------

    fn storage<T: Component>(&self) -> Option<&SparseSet<T>> {
        self.storages
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<SparseSet<T>>())
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut SparseSet<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|s| s.as_any_mut().downcast_mut::<SparseSet<T>>())
    }

    fn not_found<T: Component>(&self, entity: EntityId) -> EcsError {
        if self.allocator.is_alive(entity) {
            EcsError::ComponentNotFound {
                entity,
                component: self.registry.name_of::<T>(),
            }
        } else {
            EcsError::StaleEntity { entity }
        }
    }

    // -- entity lifecycle ---------------------------------------------------

    /// Allocate a new entity with no components.
    pub fn create(&mut self) -> EntityId {
        let entity = self.allocator.allocate();
        tracing::trace!(%entity, "entity created");
        entity
    }

    /// Create an entity and return a builder for attaching its components.
    ///
    /// ```
    /// use breakdown_ecs::prelude::*;
    /// struct Score(u32);
    /// struct Hud;
    /// breakdown_ecs::impl_component!(Score, Hud);
    ///
    /// let mut world = World::new();
    /// let e = world.spawn().with(Score(0)).with(Hud).id();
    /// assert!(world.has::<(Score, Hud)>(e));
    /// ```
    pub fn spawn(&mut self) -> EntityBuilder<'_> {
        let entity = self.create();
        EntityBuilder {
            world: self,
            entity,
        }
    }

    /// Create an entity and attach a single component.
    pub fn spawn_with<T: Component>(&mut self, component: T) -> EntityId {
        let entity = self.create();
        self.insert_unchecked(entity, component);
        entity
    }

    /// Destroy an entity, dropping every attached component and recycling
    /// the id.
    pub fn destroy(&mut self, entity: EntityId) -> Result<(), EcsError> {
        if !self.allocator.is_alive(entity) {
            return Err(EcsError::StaleEntity { entity });
        }
        for storage in self.storages.values_mut() {
            storage.remove_entity(entity);
        }
        self.allocator.deallocate(entity);
        tracing::trace!(%entity, "entity destroyed");
        Ok(())
    }

    /// Destroy every entity in `view` that is still alive.
    ///
    /// Returns the number of entities actually destroyed; stale ids are
    /// skipped.
    pub fn destroy_all(&mut self, view: View) -> usize {
        let mut destroyed = 0;
        for entity in view {
            if self.destroy(entity).is_ok() {
                destroyed += 1;
            }
        }
        tracing::debug!(destroyed, "bulk destroy");
        destroyed
    }

    /// Whether `entity` is a live handle.
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Total number of alive entities.
    pub fn entity_count(&self) -> usize {
        self.allocator.alive_count()
    }

    // -- component access ---------------------------------------------------

    fn insert_unchecked<T: Component>(&mut self, entity: EntityId, value: T) -> Option<T> {
        self.registry.ensure_registered::<T>();
        let storage = self
            .storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SparseSet::<T>::new()));
        storage
            .as_any_mut()
            .downcast_mut::<SparseSet<T>>()
            .and_then(|set| set.insert(entity, value))
    }

    /// Attach a component to an entity, overwriting any existing value of
    /// the same type.
    pub fn attach<T: Component>(&mut self, entity: EntityId, value: T) -> Result<(), EcsError> {
        if !self.allocator.is_alive(entity) {
            return Err(EcsError::StaleEntity { entity });
        }
        self.insert_unchecked(entity, value);
        Ok(())
    }

    /// Remove a component from an entity, returning it.
    ///
    /// Returns `None` if the entity is stale or does not have the component.
    pub fn detach<T: Component>(&mut self, entity: EntityId) -> Option<T> {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        self.storage_mut::<T>()?.remove(entity)
    }

    /// Shared access to a component.
    ///
    /// Fails with [`EcsError::ComponentNotFound`] if the component is absent
    /// or [`EcsError::StaleEntity`] if the entity is gone.
    pub fn get<T: Component>(&self, entity: EntityId) -> Result<&T, EcsError> {
        self.try_get::<T>(entity)
            .ok_or_else(|| self.not_found::<T>(entity))
    }

    /// Exclusive access to a component. Fails like [`get`](Self::get).
    pub fn get_mut<T: Component>(&mut self, entity: EntityId) -> Result<&mut T, EcsError> {
        if self.try_get::<T>(entity).is_none() {
            return Err(self.not_found::<T>(entity));
        }
        self.try_get_mut::<T>(entity)
            .ok_or(EcsError::StaleEntity { entity })
    }

    /// Shared access to a component, `None` if absent.
    pub fn try_get<T: Component>(&self, entity: EntityId) -> Option<&T> {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        self.storage::<T>()?.get(entity)
    }

    /// Exclusive access to a component, `None` if absent.
    pub fn try_get_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        self.storage_mut::<T>()?.get_mut(entity)
    }

    /// Whether `entity` has every component in `Q`.
    pub fn has<Q: ComponentSet>(&self, entity: EntityId) -> bool {
        if !self.allocator.is_alive(entity) {
            return false;
        }
        Q::type_ids().iter().all(|type_id| {
            self.storages
                .get(type_id)
                .is_some_and(|s| s.contains_entity(entity))
        })
    }

    /// Number of entities holding component `T`.
    pub fn count<T: Component>(&self) -> usize {
        self.storage::<T>().map_or(0, |s| s.len())
    }

    // -- views --------------------------------------------------------------

    /// Snapshot every entity that holds all components in `Q`, ordered by
    /// creation.
    pub fn view<Q: ComponentSet>(&self) -> View {
        let mut storages = Vec::new();
        for type_id in Q::type_ids() {
            match self.storages.get(&type_id) {
                Some(storage) => storages.push(storage.as_ref()),
                None => return View::default(),
            }
        }
        let Some(smallest) = storages.iter().min_by_key(|s| s.entity_list().len()) else {
            return View::default();
        };

        let mut matched: Vec<(u64, EntityId)> = smallest
            .entity_list()
            .iter()
            .copied()
            .filter(|&e| storages.iter().all(|s| s.contains_entity(e)))
            .filter_map(|e| self.allocator.serial(e).map(|serial| (serial, e)))
            .collect();
        matched.sort_unstable_by_key(|(serial, _)| *serial);

        View::from_sorted(matched.into_iter().map(|(_, e)| e).collect())
    }

    /// The oldest entity holding all of `Q`, if any.
    pub fn first<Q: ComponentSet>(&self) -> Option<EntityId> {
        self.view::<Q>().first()
    }
}

// ---------------------------------------------------------------------------
// EntityBuilder
// ---------------------------------------------------------------------------

/// Attaches components to a freshly created entity.
///
/// The entity is alive for the whole lifetime of the builder, so attaching
/// cannot fail.
pub struct EntityBuilder<'w> {
    world: &'w mut World,
    entity: EntityId,
}

impl EntityBuilder<'_> {
    /// Attach `component`, overwriting any earlier value of the same type.
    pub fn with<T: Component>(self, component: T) -> Self {
        self.world.insert_unchecked(self.entity, component);
        self
    }

    /// Attach `component` only when it is `Some`.
    pub fn with_opt<T: Component>(self, component: Option<T>) -> Self {
        match component {
            Some(c) => self.with(c),
            None => self,
        }
    }

    /// The entity being built.
    pub fn id(&self) -> EntityId {
        self.entity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    struct Frozen;

    crate::impl_component!(Position, Velocity, Frozen);

    #[test]
    fn create_attach_get() {
        let mut world = World::new();
        let e = world.create();
        world.attach(e, Position { x: 1.0, y: 2.0 }).unwrap();
        assert_eq!(world.get::<Position>(e).unwrap(), &Position { x: 1.0, y: 2.0 });
    }

    #[test]
    fn builder_attaches_everything() {
        let mut world = World::new();
        let e = world
            .spawn()
            .with(Position { x: 1.0, y: 2.0 })
            .with_opt(None::<Velocity>)
            .with(Frozen)
            .id();
        assert!(world.has::<(Position, Frozen)>(e));
        assert!(!world.has::<Velocity>(e));
    }

    #[test]
    fn attach_overwrites() {
        let mut world = World::new();
        let e = world.spawn_with(Position { x: 1.0, y: 2.0 });
        world.attach(e, Position { x: 3.0, y: 4.0 }).unwrap();
        assert_eq!(world.count::<Position>(), 1);
        assert_eq!(world.get::<Position>(e).unwrap().x, 3.0);
    }

    #[test]
    fn get_missing_component_reports_name() {
        let mut world = World::new();
        world.register_component::<Velocity>("velocity");
        let e = world.create();
        match world.get::<Velocity>(e) {
            Err(EcsError::ComponentNotFound { entity, component }) => {
                assert_eq!(entity, e);
                assert_eq!(component, "velocity");
            }
            other => panic!("expected ComponentNotFound, got {other:?}"),
        }
    }

    #[test]
    fn get_on_destroyed_entity_is_stale() {
        let mut world = World::new();
        let e = world.spawn_with(Position { x: 0.0, y: 0.0 });
        world.destroy(e).unwrap();
        assert!(matches!(
            world.get::<Position>(e),
            Err(EcsError::StaleEntity { .. })
        ));
        assert!(world.try_get::<Position>(e).is_none());
        assert!(world.attach(e, Frozen).is_err());
    }

    #[test]
    fn recycled_index_does_not_inherit_components() {
        let mut world = World::new();
        let old = world.spawn_with(Position { x: 9.0, y: 9.0 });
        world.destroy(old).unwrap();
        let new = world.create();
        assert_eq!(new.index(), old.index());
        assert!(world.try_get::<Position>(new).is_none());
    }

    #[test]
    fn has_checks_every_member() {
        let mut world = World::new();
        let e = world.spawn_with(Position { x: 0.0, y: 0.0 });
        assert!(world.has::<Position>(e));
        assert!(!world.has::<(Position, Velocity)>(e));
        world.attach(e, Velocity { dx: 1.0, dy: 1.0 }).unwrap();
        assert!(world.has::<(Position, Velocity)>(e));
    }

    #[test]
    fn get_mut_modifies_in_place() {
        let mut world = World::new();
        let e = world.spawn_with(Velocity { dx: 0.0, dy: 0.0 });
        world.get_mut::<Velocity>(e).unwrap().dx = 5.0;
        assert_eq!(world.get::<Velocity>(e).unwrap().dx, 5.0);
        assert!(world.get_mut::<Position>(e).is_err());
    }

    #[test]
    fn detach_removes_only_that_component() {
        let mut world = World::new();
        let e = world.spawn_with(Position { x: 1.0, y: 1.0 });
        world.attach(e, Frozen).unwrap();
        assert!(world.detach::<Frozen>(e).is_some());
        assert!(!world.has::<Frozen>(e));
        assert!(world.has::<Position>(e));
        assert!(world.detach::<Frozen>(e).is_none());
    }

    #[test]
    fn view_follows_creation_order_after_recycling() {
        let mut world = World::new();
        let a = world.spawn_with(Frozen);
        let b = world.spawn_with(Frozen);
        world.destroy(a).unwrap();
        let c = world.spawn_with(Frozen); // reuses a's index
        let d = world.spawn_with(Frozen);
        world.destroy(b).unwrap();
        world.attach(b, Frozen).unwrap_err();

        let order: Vec<_> = world.view::<Frozen>().into_iter().collect();
        assert_eq!(order, vec![c, d]);
    }

    #[test]
    fn view_of_unknown_type_is_empty() {
        let world = World::new();
        assert!(world.view::<(Position, Velocity)>().is_empty());
    }

    #[test]
    fn destroy_while_walking_a_view() {
        let mut world = World::new();
        let ids: Vec<_> = (0..5)
            .map(|i| world.spawn_with(Position { x: i as f32, y: 0.0 }))
            .collect();

        let view = world.view::<Position>();
        let mut visited = 0;
        for e in &view {
            if !world.is_alive(e) {
                continue;
            }
            visited += 1;
            // Destroy the current entity and the next one.
            world.destroy(e).unwrap();
            if let Some(next) = ids.iter().copied().find(|&n| n.index() == e.index() + 1) {
                let _ = world.destroy(next);
            }
        }
        assert_eq!(visited, 3);
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn destroy_all_skips_stale_ids() {
        let mut world = World::new();
        let a = world.spawn_with(Frozen);
        let _b = world.spawn_with(Frozen);
        let view = world.view::<Frozen>();
        world.destroy(a).unwrap();
        assert_eq!(world.destroy_all(view), 1);
        assert_eq!(world.entity_count(), 0);
    }
}
