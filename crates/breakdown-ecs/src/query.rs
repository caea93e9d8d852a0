//! Views: snapshots of the entities holding a set of component types.
//!
//! A [`ComponentSet`] names one component type (`Velocity`) or a tuple of
//! them (`(BallTag, Velocity)`). [`World::view`](crate::world::World::view)
//! resolves the set to a [`View`], an owned list of matching ids sorted by
//! creation order.
//!
//! Because a view owns its ids it does not borrow the world, so a system can
//! destroy the entity it is currently visiting (or any other) while walking
//! the view. Ids visited after such a destruction must be checked with
//! [`World::is_alive`](crate::world::World::is_alive) before use.

use std::any::TypeId;

use crate::component::Component;
use crate::entity::EntityId;

// ---------------------------------------------------------------------------
// ComponentSet
// ---------------------------------------------------------------------------

/// A set of component types used by `has` and `view`.
pub trait ComponentSet {
    /// `TypeId`s of every member of the set.
    fn type_ids() -> Vec<TypeId>;
}

impl<C: Component> ComponentSet for C {
    fn type_ids() -> Vec<TypeId> {
        vec![TypeId::of::<C>()]
    }
}

macro_rules! impl_component_set_tuple {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            fn type_ids() -> Vec<TypeId> {
                vec![$(TypeId::of::<$name>()),+]
            }
        }
    };
}

impl_component_set_tuple!(A);
impl_component_set_tuple!(A, B);
impl_component_set_tuple!(A, B, C);
impl_component_set_tuple!(A, B, C, D);
impl_component_set_tuple!(A, B, C, D, E);
impl_component_set_tuple!(A, B, C, D, E, F);

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Owned snapshot of entity ids, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    entities: Vec<EntityId>,
}

impl View {
    pub(crate) fn from_sorted(entities: Vec<EntityId>) -> Self {
        Self { entities }
    }

    /// Iterate the ids.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, EntityId>> {
        self.entities.iter().copied()
    }

    /// Number of ids captured.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the view matched nothing.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// First (oldest) matching entity.
    pub fn first(&self) -> Option<EntityId> {
        self.entities.first().copied()
    }

    /// Whether `entity` was captured.
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains(&entity)
    }

    /// The captured ids as a slice.
    pub fn as_slice(&self) -> &[EntityId] {
        &self.entities
    }
}

impl IntoIterator for View {
    type Item = EntityId;
    type IntoIter = std::vec::IntoIter<EntityId>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.into_iter()
    }
}

impl<'a> IntoIterator for &'a View {
    type Item = EntityId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, EntityId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;
    crate::impl_component!(A, B);

    #[test]
    fn tuple_sets_list_every_member() {
        assert_eq!(<A as ComponentSet>::type_ids(), vec![TypeId::of::<A>()]);
        assert_eq!(
            <(A, B) as ComponentSet>::type_ids(),
            vec![TypeId::of::<A>(), TypeId::of::<B>()]
        );
    }

    #[test]
    fn view_iterates_in_stored_order() {
        let ids = vec![EntityId::new(2, 0), EntityId::new(0, 1)];
        let view = View::from_sorted(ids.clone());
        assert_eq!(view.iter().collect::<Vec<_>>(), ids);
        assert_eq!(view.first(), Some(ids[0]));
        assert!(view.contains(ids[1]));
        assert_eq!(view.len(), 2);
    }
}
