//! The concrete simulation world.
//!
//! One dense storage per flight component, one slot per entity index.
//! Entity indices are allocated monotonically and never recycled, so
//! iterating slots in index order is iterating in creation order.

use vela_core::{Component, ComponentStorage, CoreError, CoreResult, Entity, EntityId};

use crate::components::control::UnifiedFlightControl;
use crate::components::physics::Physics;
use crate::components::thruster::ThrusterSystem;
use crate::components::transform::Transform;

/// Default entity capacity when none is given.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Maps a component type to its storage field inside [`World`].
///
/// Implemented once per registered component; generic world accessors
/// route through it so adding a component type touches one impl block.
pub trait WorldComponent: Component {
    /// Shared storage for this component type.
    fn storage(world: &World) -> &ComponentStorage<Self>;
    /// Mutable storage for this component type.
    fn storage_mut(world: &mut World) -> &mut ComponentStorage<Self>;
}

macro_rules! world_component {
    ($ty:ty, $field:ident) => {
        impl WorldComponent for $ty {
            fn storage(world: &World) -> &ComponentStorage<Self> {
                &world.$field
            }
            fn storage_mut(world: &mut World) -> &mut ComponentStorage<Self> {
                &mut world.$field
            }
        }
    };
}

/// Fixed-capacity entity world holding all flight components.
pub struct World {
    entities: Box<[Entity]>,
    next_index: u32,
    generation: u32,
    alive_count: usize,
    transforms: ComponentStorage<Transform>,
    physics: ComponentStorage<Physics>,
    thrusters: ComponentStorage<ThrusterSystem>,
    controls: ComponentStorage<UnifiedFlightControl>,
}

world_component!(Transform, transforms);
world_component!(Physics, physics);
world_component!(ThrusterSystem, thrusters);
world_component!(UnifiedFlightControl, controls);

impl Default for World {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl World {
    /// World with room for `capacity` entities over its whole lifetime.
    ///
    /// Indices are never recycled, so the capacity bounds total entities
    /// ever created, not merely concurrent ones.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entities: vec![Entity::dead(); capacity].into_boxed_slice(),
            next_index: 0,
            generation: 0,
            alive_count: 0,
            transforms: ComponentStorage::new(capacity),
            physics: ComponentStorage::new(capacity),
            thrusters: ComponentStorage::new(capacity),
            controls: ComponentStorage::new(capacity),
        }
    }

    /// Number of live entities.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Total entity slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entities.len()
    }

    /// Allocate a fresh entity with no components.
    ///
    /// # Errors
    /// [`CoreError::CapacityExhausted`] once all slots have been handed out.
    pub fn create_entity(&mut self) -> CoreResult<EntityId> {
        let index = self.next_index as usize;
        if index >= self.entities.len() {
            return Err(CoreError::CapacityExhausted {
                capacity: self.entities.len(),
            });
        }
        let id = EntityId::new(self.next_index, self.generation);
        self.entities[index] = Entity::new(id);
        self.next_index += 1;
        self.alive_count += 1;
        Ok(id)
    }

    /// Destroy a live entity, resetting its component slots.
    ///
    /// The slot is retired, not recycled; stale handles to it stay
    /// detectably dead forever.
    ///
    /// # Errors
    /// [`CoreError::UnknownEntity`] for handles that are not live.
    pub fn destroy_entity(&mut self, id: EntityId) -> CoreResult<()> {
        let index = self.validate(id)?;
        self.entities[index] = Entity::dead();
        self.transforms.reset(index);
        self.physics.reset(index);
        self.thrusters.reset(index);
        self.controls.reset(index);
        self.alive_count -= 1;
        self.generation = self.generation.wrapping_add(1);
        Ok(())
    }

    /// Whether `id` refers to a live entity.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.validate(id).is_ok()
    }

    /// The entity slot for a live handle.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.validate(id).ok().map(|i| &self.entities[i])
    }

    /// Attach component `C` with its default value.
    ///
    /// # Errors
    /// [`CoreError::UnknownEntity`] for handles that are not live.
    pub fn add_component<C: WorldComponent>(&mut self, id: EntityId) -> CoreResult<()> {
        self.set_component(id, C::default())
    }

    /// Attach component `C` with an explicit value, overwriting any
    /// previous value.
    ///
    /// # Errors
    /// [`CoreError::UnknownEntity`] for handles that are not live.
    pub fn set_component<C: WorldComponent>(&mut self, id: EntityId, value: C) -> CoreResult<()> {
        let index = self.validate(id)?;
        self.entities[index].add_component(C::ID);
        C::storage_mut(self).set(index, value);
        Ok(())
    }

    /// Detach component `C`, resetting its slot.
    ///
    /// # Errors
    /// [`CoreError::UnknownEntity`] for dead handles;
    /// [`CoreError::MissingComponent`] when `C` is not attached.
    pub fn remove_component<C: WorldComponent>(&mut self, id: EntityId) -> CoreResult<()> {
        let index = self.validate(id)?;
        if !self.entities[index].has_component(C::ID) {
            return Err(CoreError::MissingComponent {
                id,
                component: C::NAME,
            });
        }
        self.entities[index].remove_component(C::ID);
        C::storage_mut(self).reset(index);
        Ok(())
    }

    /// Whether a live entity carries component `C`.
    #[must_use]
    pub fn has_component<C: WorldComponent>(&self, id: EntityId) -> bool {
        self.validate(id)
            .is_ok_and(|i| self.entities[i].has_component(C::ID))
    }

    /// Shared component access. Absence reads as `None`, never an error.
    #[must_use]
    pub fn get<C: WorldComponent>(&self, id: EntityId) -> Option<&C> {
        let index = self.validate(id).ok()?;
        if !self.entities[index].has_component(C::ID) {
            return None;
        }
        C::storage(self).get(index)
    }

    /// Mutable component access.
    pub fn get_mut<C: WorldComponent>(&mut self, id: EntityId) -> Option<&mut C> {
        let index = self.validate(id).ok()?;
        if !self.entities[index].has_component(C::ID) {
            return None;
        }
        C::storage_mut(self).get_mut(index)
    }

    /// Number of entity slots handed out so far, live or retired.
    ///
    /// Slot indices below this bound are the whole populated range;
    /// systems walk `0..allocated()` instead of collecting id lists so
    /// the per-tick loops never allocate.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.next_index as usize
    }

    /// Id of the slot at `index` when it is live and carries every
    /// component in `mask`.
    #[must_use]
    pub fn matching_id(&self, index: usize, mask: u64) -> Option<EntityId> {
        let entity = self.entities.get(index)?;
        (entity.alive && entity.matches_mask(mask)).then_some(entity.id)
    }

    /// Ids of live entities carrying every component in `mask`, in
    /// creation order.
    pub fn entities_matching(&self, mask: u64) -> impl Iterator<Item = EntityId> + '_ {
        (0..self.allocated()).filter_map(move |index| self.matching_id(index, mask))
    }

    fn validate(&self, id: EntityId) -> CoreResult<usize> {
        let index = id.index() as usize;
        match self.entities.get(index) {
            Some(slot) if slot.alive && slot.id == id => Ok(index),
            _ => Err(CoreError::UnknownEntity { id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_shared::math::Vec3;

    #[test]
    fn entity_lifecycle() {
        let mut world = World::new(8);
        let a = world.create_entity().unwrap();
        let b = world.create_entity().unwrap();
        assert_eq!(world.alive_count(), 2);
        assert!(world.is_alive(a));

        world.destroy_entity(a).unwrap();
        assert!(!world.is_alive(a));
        assert!(world.is_alive(b));
        assert_eq!(world.alive_count(), 1);

        // Stale handles are rejected, not resurrected.
        assert_eq!(
            world.destroy_entity(a),
            Err(CoreError::UnknownEntity { id: a })
        );
    }

    #[test]
    fn capacity_is_lifetime_total() {
        let mut world = World::new(2);
        let a = world.create_entity().unwrap();
        world.create_entity().unwrap();
        world.destroy_entity(a).unwrap();
        // Slots are retired, not recycled.
        assert!(matches!(
            world.create_entity(),
            Err(CoreError::CapacityExhausted { capacity: 2 })
        ));
    }

    #[test]
    fn component_attach_query_detach() {
        let mut world = World::new(4);
        let ship = world.create_entity().unwrap();

        assert!(world.get::<Transform>(ship).is_none());
        world
            .set_component(ship, Transform::at(Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();
        assert_eq!(world.get::<Transform>(ship).unwrap().position.y, 2.0);

        world.add_component::<Physics>(ship).unwrap();
        world.get_mut::<Physics>(ship).unwrap().mass = 42.0;
        assert_eq!(world.get::<Physics>(ship).unwrap().mass, 42.0);

        world.remove_component::<Physics>(ship).unwrap();
        assert!(world.get::<Physics>(ship).is_none());
        assert_eq!(
            world.remove_component::<Physics>(ship),
            Err(CoreError::MissingComponent {
                id: ship,
                component: "physics",
            })
        );
    }

    #[test]
    fn matching_iterates_in_creation_order() {
        let mut world = World::new(8);
        let mask = Transform::mask() | Physics::mask();
        let mut with_both = Vec::new();
        for i in 0..4 {
            let id = world.create_entity().unwrap();
            world.add_component::<Transform>(id).unwrap();
            if i % 2 == 0 {
                world.add_component::<Physics>(id).unwrap();
                with_both.push(id);
            }
        }
        assert_eq!(world.entities_matching(mask).collect::<Vec<_>>(), with_both);
    }

    #[test]
    fn matching_walk_skips_dead_and_mismatched_slots() {
        let mut world = World::new(8);
        let mask = Transform::mask() | Physics::mask();

        let full = world.create_entity().unwrap();
        world.add_component::<Transform>(full).unwrap();
        world.add_component::<Physics>(full).unwrap();

        let partial = world.create_entity().unwrap();
        world.add_component::<Transform>(partial).unwrap();

        let doomed = world.create_entity().unwrap();
        world.add_component::<Transform>(doomed).unwrap();
        world.add_component::<Physics>(doomed).unwrap();
        world.destroy_entity(doomed).unwrap();

        // The slot walk the systems use: only the fully-equipped live
        // entity comes back, by index.
        assert_eq!(world.allocated(), 3);
        assert_eq!(world.matching_id(0, mask), Some(full));
        assert_eq!(world.matching_id(1, mask), None);
        assert_eq!(world.matching_id(2, mask), None);
        assert_eq!(world.matching_id(99, mask), None);
        assert_eq!(world.entities_matching(mask).collect::<Vec<_>>(), [full]);
    }
}
