// tethys_sim/src/simulation/core/system.rs

use bevy_app::{App, Plugin, PostUpdate, PreUpdate, Startup};
use bevy_ecs::prelude::{Entity, Mut, Resource, World};
use std::sync::{Mutex, PoisonError};

use super::clock::{SimClock, UpdateInfo};

/// The capability interface a simulation plugin implements.
///
/// The host calls `configure` once, then every tick `pre_update` (before
/// physics, may write components) and `post_update` (after physics,
/// read-only).
pub trait SimSystem: Send + Sync + 'static {
    fn configure(&mut self, entity: Entity, world: &mut World);

    fn pre_update(&mut self, _info: &UpdateInfo, _world: &mut World) {}

    fn post_update(&mut self, _info: &UpdateInfo, _world: &World) {}
}

/// One configured instance of `S` and the entity it is attached to.
pub struct SystemSlot<S: SimSystem> {
    pub entity: Entity,
    pub system: S,
}

/// Every instance of `S` registered with the app, in registration order.
#[derive(Resource)]
pub struct SystemSlots<S: SimSystem>(pub Vec<SystemSlot<S>>);

impl<S: SimSystem> SystemSlots<S> {
    pub fn iter(&self) -> impl Iterator<Item = &SystemSlot<S>> {
        self.0.iter()
    }

    /// The instance attached to `entity`, if any.
    pub fn get(&self, entity: Entity) -> Option<&S> {
        self.0
            .iter()
            .find(|slot| slot.entity == entity)
            .map(|slot| &slot.system)
    }
}

/// Registers a `SimSystem` instance with a Bevy `App`.
///
/// This is the explicit factory: the caller builds the system, names the
/// entity it belongs to, and hands both to the app.
pub struct SystemPlugin<S: SimSystem> {
    entity: Entity,
    system: Mutex<Option<S>>,
}

impl<S: SimSystem> SystemPlugin<S> {
    pub fn new(entity: Entity, system: S) -> Self {
        Self {
            entity,
            system: Mutex::new(Some(system)),
        }
    }
}

impl<S: SimSystem> Plugin for SystemPlugin<S> {
    fn build(&self, app: &mut App) {
        let Some(system) = self
            .system
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            return;
        };
        let slot = SystemSlot {
            entity: self.entity,
            system,
        };

        let world = app.world_mut();
        if let Some(mut slots) = world.get_resource_mut::<SystemSlots<S>>() {
            slots.0.push(slot);
            return;
        }
        world.insert_resource(SystemSlots(vec![slot]));

        // First instance of this type: schedule the shared drivers.
        app.add_systems(Startup, configure_slots::<S>)
            .add_systems(PreUpdate, pre_update_slots::<S>)
            .add_systems(PostUpdate, post_update_slots::<S>);
    }

    fn is_unique(&self) -> bool {
        false
    }
}

fn current_info(world: &World) -> UpdateInfo {
    world
        .get_resource::<SimClock>()
        .map(SimClock::info)
        .unwrap_or_default()
}

fn configure_slots<S: SimSystem>(world: &mut World) {
    world.resource_scope(|world, mut slots: Mut<SystemSlots<S>>| {
        for slot in slots.0.iter_mut() {
            slot.system.configure(slot.entity, world);
        }
    });
}

fn pre_update_slots<S: SimSystem>(world: &mut World) {
    let info = current_info(world);
    world.resource_scope(|world, mut slots: Mut<SystemSlots<S>>| {
        for slot in slots.0.iter_mut() {
            slot.system.pre_update(&info, world);
        }
    });
}

fn post_update_slots<S: SimSystem>(world: &mut World) {
    let info = current_info(world);
    world.resource_scope(|world, mut slots: Mut<SystemSlots<S>>| {
        for slot in slots.0.iter_mut() {
            slot.system.post_update(&info, world);
        }
    });
}
