//! # Boxed Entities
//!
//! The comparison storage for the chunk engine: every entity is its own
//! heap allocation holding a map from field id to a boxed component.
//! Systems visit entities one at a time and look each component up by id,
//! so nothing is laid out contiguously.
//!
//! ```text
//! BoxedWorld
//!   entities: BoxedId -> Box<BoxedEntity>
//!                          components: FieldId -> Box<dyn Any>
//! ```

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use strata_core::{Component, FieldId};

/// Handle of one boxed entity. Ids are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoxedId(u64);

impl BoxedId {
    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BoxedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boxed#{}", self.0)
    }
}

/// One entity and its components.
#[derive(Default)]
pub struct BoxedEntity {
    components: BTreeMap<FieldId, Box<dyn Any + Send + Sync>>,
}

impl BoxedEntity {
    /// Creates an entity with no components.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a component.
    pub fn insert<C: Component>(&mut self, value: C) {
        self.components.insert(C::ID, Box::new(value));
    }

    /// Builder variant of [`insert`](Self::insert).
    #[must_use]
    pub fn with<C: Component>(mut self, value: C) -> Self {
        self.insert(value);
        self
    }

    /// Reads a component.
    #[must_use]
    pub fn get<C: Component>(&self) -> Option<&C> {
        self.components.get(&C::ID)?.downcast_ref()
    }

    /// Mutable access to a component.
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components.get_mut(&C::ID)?.downcast_mut()
    }

    /// Checks if every field is present.
    #[must_use]
    pub fn has_all(&self, fields: &[FieldId]) -> bool {
        fields.iter().all(|field| self.components.contains_key(field))
    }

    /// Number of components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Checks if the entity has no components.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Debug for BoxedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.components.keys()).finish()
    }
}

/// Owner of every boxed entity.
#[derive(Debug, Default)]
pub struct BoxedWorld {
    entities: HashMap<BoxedId, Box<BoxedEntity>>,
    next_id: u64,
}

impl BoxedWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves an entity onto the heap and returns its handle.
    pub fn spawn(&mut self, entity: BoxedEntity) -> BoxedId {
        let id = BoxedId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Box::new(entity));
        id
    }

    /// Drops an entity. `false` if it was already gone.
    pub fn despawn(&mut self, id: BoxedId) -> bool {
        self.entities.remove(&id).is_some()
    }

    /// Looks up an entity.
    #[must_use]
    pub fn get(&self, id: BoxedId) -> Option<&BoxedEntity> {
        self.entities.get(&id).map(|entity| &**entity)
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, id: BoxedId) -> Option<&mut BoxedEntity> {
        self.entities.get_mut(&id).map(|entity| &mut **entity)
    }

    /// Checks if an entity is alive.
    #[must_use]
    pub fn contains(&self, id: BoxedId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Live entities.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Checks if no entity is alive.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Every entity storing all of `fields`, in no particular order.
    pub fn matching_mut<'w>(
        &'w mut self,
        fields: &'w [FieldId],
    ) -> impl Iterator<Item = (BoxedId, &'w mut BoxedEntity)> + 'w {
        self.entities
            .iter_mut()
            .filter(move |(_, entity)| entity.has_all(fields))
            .map(|(&id, entity)| (id, &mut **entity))
    }
}

/// A system over [`BoxedWorld`] entities.
///
/// The counterpart of [`strata_core::System`]: `for_each` sees one entity
/// at a time instead of one chunk of columns, and `finish` runs after the
/// pass so that destruction never invalidates the iteration.
pub trait BoxedSystem {
    /// Fields an entity must store to be visited.
    fn boxed_fields(&self) -> &[FieldId];

    /// Called once per matching entity.
    fn for_each(&mut self, id: BoxedId, entity: &mut BoxedEntity, delta: f32);

    /// Called once after the pass.
    fn finish_boxed(&mut self, _world: &mut BoxedWorld) {}

    /// Visits every matching entity, then calls
    /// [`finish_boxed`](Self::finish_boxed).
    fn run_boxed(&mut self, world: &mut BoxedWorld, delta: f32) {
        let fields = self.boxed_fields().to_vec();
        for (id, entity) in world.matching_mut(&fields) {
            self.for_each(id, entity, delta);
        }
        self.finish_boxed(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Life, Rotation, Scale};

    #[test]
    fn test_entity_components() {
        let mut entity = BoxedEntity::new().with(Scale([2.0; 3])).with(Life(3.0));
        assert_eq!(entity.len(), 2);
        assert_eq!(entity.get::<Scale>(), Some(&Scale([2.0; 3])));
        assert_eq!(entity.get::<Rotation>(), None);
        assert!(entity.has_all(&[Life::ID, Scale::ID]));
        assert!(!entity.has_all(&[Life::ID, Rotation::ID]));

        entity.get_mut::<Life>().unwrap().0 -= 1.0;
        assert_eq!(entity.get::<Life>(), Some(&Life(2.0)));
    }

    #[test]
    fn test_world_spawn_despawn() {
        let mut world = BoxedWorld::new();
        let a = world.spawn(BoxedEntity::new().with(Life(1.0)));
        let b = world.spawn(BoxedEntity::new().with(Scale::default()));
        assert_ne!(a, b);
        assert_eq!(world.len(), 2);

        assert!(world.despawn(a));
        assert!(!world.despawn(a));
        assert!(!world.contains(a));
        assert!(world.get(b).is_some());

        // Ids are not handed out twice.
        let c = world.spawn(BoxedEntity::new());
        assert_ne!(c, a);
    }

    #[test]
    fn test_matching_filters_by_fields() {
        let mut world = BoxedWorld::new();
        world.spawn(BoxedEntity::new().with(Life(1.0)).with(Scale::default()));
        world.spawn(BoxedEntity::new().with(Life(2.0)));
        world.spawn(BoxedEntity::new().with(Scale::default()));

        assert_eq!(world.matching_mut(&[Life::ID]).count(), 2);
        assert_eq!(world.matching_mut(&[Life::ID, Scale::ID]).count(), 1);
        assert_eq!(world.matching_mut(&[Rotation::ID]).count(), 0);
    }
}
