//! Sparse-set component storage.
//!
//! Each component type owns one [`SparseSet`]: a dense array of values, a
//! parallel dense array of owning entities, and a sparse array indexed by
//! [`EntityId::index`] that points into the dense arrays. Lookup, insert and
//! remove are O(1); removal swaps the last dense element into the hole.
//!
//! The [`ErasedStorage`] trait lets the [`World`](crate::world::World) hold
//! storages for heterogeneous component types in one map and remove an
//! entity from all of them without knowing their concrete types.

use std::any::Any;

use crate::entity::EntityId;

// ---------------------------------------------------------------------------
// SparseSet
// ---------------------------------------------------------------------------

/// Storage for every instance of one component type.
#[derive(Debug)]
pub struct SparseSet<T> {
    /// Entity index -> dense slot.
    sparse: Vec<Option<u32>>,
    /// Owner of each dense slot (full id, so generations are checked).
    entities: Vec<EntityId>,
    /// Component values, parallel to `entities`.
    values: Vec<T>,
}

impl<T> SparseSet<T> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            entities: Vec::new(),
            values: Vec::new(),
        }
    }

    fn slot(&self, entity: EntityId) -> Option<usize> {
        let slot = (*self.sparse.get(entity.index() as usize)?)? as usize;
        (self.entities[slot] == entity).then_some(slot)
    }

    /// Insert `value` for `entity`, returning the previous value if any.
    pub fn insert(&mut self, entity: EntityId, value: T) -> Option<T> {
        if let Some(slot) = self.slot(entity) {
            return Some(std::mem::replace(&mut self.values[slot], value));
        }

        let idx = entity.index() as usize;
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, None);
        }
        self.sparse[idx] = Some(self.entities.len() as u32);
        self.entities.push(entity);
        self.values.push(value);
        None
    }

    /// Remove and return the value for `entity`.
    pub fn remove(&mut self, entity: EntityId) -> Option<T> {
        let slot = self.slot(entity)?;
        self.sparse[entity.index() as usize] = None;

        let last = self.entities.len() - 1;
        if slot != last {
            let moved = self.entities[last];
            self.sparse[moved.index() as usize] = Some(slot as u32);
        }
        self.entities.swap_remove(slot);
        Some(self.values.swap_remove(slot))
    }

    /// Shared access to the value for `entity`.
    pub fn get(&self, entity: EntityId) -> Option<&T> {
        self.slot(entity).map(|slot| &self.values[slot])
    }

    /// Exclusive access to the value for `entity`.
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.slot(entity).map(|slot| &mut self.values[slot])
    }

    /// Whether `entity` has a value in this set.
    pub fn contains(&self, entity: EntityId) -> bool {
        self.slot(entity).is_some()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Owning entities in dense order (not creation order).
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// ErasedStorage
// ---------------------------------------------------------------------------

/// Type-erased view of a [`SparseSet`].
pub(crate) trait ErasedStorage: Any {
    /// Drop the component owned by `entity`. Returns `true` if one existed.
    fn remove_entity(&mut self, entity: EntityId) -> bool;
    fn contains_entity(&self, entity: EntityId) -> bool;
    fn entity_list(&self) -> &[EntityId];
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> ErasedStorage for SparseSet<T> {
    fn remove_entity(&mut self, entity: EntityId) -> bool {
        self.remove(entity).is_some()
    }

    fn contains_entity(&self, entity: EntityId) -> bool {
        self.contains(entity)
    }

    fn entity_list(&self) -> &[EntityId] {
        self.entities()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let mut set = SparseSet::new();
        let e = EntityId::new(3, 0);
        assert_eq!(set.insert(e, 10u32), None);
        assert_eq!(set.get(e), Some(&10));
        assert_eq!(set.insert(e, 11), Some(10));
        assert_eq!(set.remove(e), Some(11));
        assert!(set.is_empty());
        assert_eq!(set.remove(e), None);
    }

    #[test]
    fn swap_remove_keeps_moved_entity_reachable() {
        let mut set = SparseSet::new();
        let a = EntityId::new(0, 0);
        let b = EntityId::new(1, 0);
        let c = EntityId::new(2, 0);
        set.insert(a, 'a');
        set.insert(b, 'b');
        set.insert(c, 'c');

        set.remove(a);
        assert_eq!(set.get(c), Some(&'c'));
        assert_eq!(set.get(b), Some(&'b'));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn stale_generation_is_not_found() {
        let mut set = SparseSet::new();
        let old = EntityId::new(5, 0);
        let new = EntityId::new(5, 1);
        set.insert(old, 1u8);
        assert!(!set.contains(new));
        assert_eq!(set.get_mut(new), None);
    }

    #[test]
    fn erased_removal() {
        let mut set: Box<dyn ErasedStorage> = Box::new(SparseSet::<u16>::new());
        let e = EntityId::new(0, 0);
        set.as_any_mut()
            .downcast_mut::<SparseSet<u16>>()
            .unwrap()
            .insert(e, 7);
        assert!(set.contains_entity(e));
        assert!(set.remove_entity(e));
        assert!(!set.remove_entity(e));
        assert!(set.entity_list().is_empty());
    }
}
