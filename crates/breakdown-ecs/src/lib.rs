//! Breakdown ECS -- sparse-set Entity Component System.
//!
//! Entities are generational ids with no data of their own. Each component
//! type lives in its own sparse set, so attaching and detaching a component
//! is O(1) and never moves other components. Views snapshot the matching
//! ids in creation order, which keeps iteration deterministic and makes it
//! safe to destroy entities mid-iteration.
//!
//! # Quick Start
//!
//! ```
//! use breakdown_ecs::prelude::*;
//! use breakdown_ecs::impl_component;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Position { x: f32, y: f32 }
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Velocity { dx: f32, dy: f32 }
//!
//! impl_component!(Position, Velocity);
//!
//! let mut world = World::new();
//! let entity = world.create();
//! world.attach(entity, Position { x: 0.0, y: 0.0 }).unwrap();
//! world.attach(entity, Velocity { dx: 1.0, dy: 0.0 }).unwrap();
//!
//! for e in world.view::<(Position, Velocity)>() {
//!     let dx = world.get::<Velocity>(e).unwrap().dx;
//!     world.get_mut::<Position>(e).unwrap().x += dx;
//! }
//!
//! assert_eq!(world.get::<Position>(entity).unwrap(), &Position { x: 1.0, y: 0.0 });
//! ```

#![deny(unsafe_code)]

pub mod component;
pub mod entity;
pub mod query;
pub mod storage;
pub mod world;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by ECS operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// The entity does not exist (stale generation or never allocated).
    #[error("entity {entity:?} does not exist (stale or never allocated)")]
    StaleEntity { entity: entity::EntityId },

    /// The entity is alive but has no component of the requested type.
    #[error("entity {entity:?} has no '{component}' component")]
    ComponentNotFound {
        entity: entity::EntityId,
        component: String,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::component::{Component, ComponentInfo, ComponentRegistry, ComponentTypeId};
    pub use crate::entity::{EntityAllocator, EntityId};
    pub use crate::query::{ComponentSet, View};
    pub use crate::storage::SparseSet;
    pub use crate::world::{EntityBuilder, World};
    pub use crate::EcsError;
}
