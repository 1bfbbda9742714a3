// tethys_sim/src/simulation/core/model.rs

use bevy_ecs::prelude::{Component, Entity, World};
use thiserror::Error;

use super::components::{Joint, Link, ParentModel};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("entity {0:?} does not exist")]
    MissingEntity(Entity),
}

/// Name-based lookup of the links and joints under a model entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelHandle(pub Entity);

impl ModelHandle {
    pub fn entity(&self) -> Entity {
        self.0
    }

    pub fn link_by_name(&self, world: &mut World, name: &str) -> Option<Entity> {
        let mut query = world.query::<(Entity, &Link, &ParentModel)>();
        query
            .iter(world)
            .find(|(_, link, parent)| parent.0 == self.0 && link.name == name)
            .map(|(entity, _, _)| entity)
    }

    pub fn joint_by_name(&self, world: &mut World, name: &str) -> Option<Entity> {
        let mut query = world.query::<(Entity, &Joint, &ParentModel)>();
        query
            .iter(world)
            .find(|(_, joint, parent)| parent.0 == self.0 && joint.name == name)
            .map(|(entity, _, _)| entity)
    }
}

/// Makes sure `entity` carries a `C`, inserting the default when it does not.
///
/// Returns `Ok(true)` when the component was created and `Ok(false)` when it
/// was already there; an existing value is never touched.
pub fn ensure_component<C: Component + Default>(
    world: &mut World,
    entity: Entity,
) -> Result<bool, ModelError> {
    let mut entity_mut = world
        .get_entity_mut(entity)
        .map_err(|_| ModelError::MissingEntity(entity))?;
    if entity_mut.contains::<C>() {
        return Ok(false);
    }
    entity_mut.insert(C::default());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::core::components::{JointPosition, Model, WorldPose};

    fn spawn_model(world: &mut World) -> (Entity, Entity, Entity) {
        let model = world.spawn(Model { name: "tethys".into() }).id();
        let link = world
            .spawn((Link { name: "base_link".into() }, ParentModel(model)))
            .id();
        let joint = world
            .spawn((Joint { name: "battery_joint".into() }, ParentModel(model)))
            .id();
        (model, link, joint)
    }

    #[test]
    fn lookup_finds_entities_by_name() {
        let mut world = World::new();
        let (model, link, joint) = spawn_model(&mut world);
        let handle = ModelHandle(model);
        assert_eq!(handle.link_by_name(&mut world, "base_link"), Some(link));
        assert_eq!(handle.joint_by_name(&mut world, "battery_joint"), Some(joint));
        assert_eq!(handle.link_by_name(&mut world, "battery_joint"), None);
    }

    #[test]
    fn lookup_is_scoped_to_the_model() {
        let mut world = World::new();
        let (model, _, _) = spawn_model(&mut world);
        let (other, other_link, _) = spawn_model(&mut world);
        assert_ne!(
            ModelHandle(model).link_by_name(&mut world, "base_link"),
            Some(other_link)
        );
        assert_eq!(
            ModelHandle(other).link_by_name(&mut world, "base_link"),
            Some(other_link)
        );
    }

    #[test]
    fn ensure_component_is_idempotent() {
        let mut world = World::new();
        let (_, link, joint) = spawn_model(&mut world);

        assert_eq!(ensure_component::<WorldPose>(&mut world, link), Ok(true));
        assert_eq!(ensure_component::<WorldPose>(&mut world, link), Ok(false));

        world.entity_mut(joint).insert(JointPosition(vec![0.3]));
        assert_eq!(ensure_component::<JointPosition>(&mut world, joint), Ok(false));
        assert_eq!(world.get::<JointPosition>(joint), Some(&JointPosition(vec![0.3])));
    }

    #[test]
    fn ensure_component_on_missing_entity_is_an_error() {
        let mut world = World::new();
        let gone = world.spawn_empty().id();
        world.despawn(gone);
        assert_eq!(
            ensure_component::<WorldPose>(&mut world, gone),
            Err(ModelError::MissingEntity(gone))
        );
    }
}
