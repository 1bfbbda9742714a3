// tethys_sim/src/simulation/core/simulation_setup.rs

use bevy_app::{App, First, Plugin};
use bevy_ecs::prelude::Resource;
use std::sync::Arc;
use std::time::Duration;

use tethys_core::spherical::SphericalCoordinates;
use tethys_core::transport::{Node, TopicBus};

use super::clock::{advance_sim_clock, SimClock};

/// The host's transport. Plugins open their `Node` from it during configure.
#[derive(Resource, Clone)]
pub struct SimTransport(pub Arc<TopicBus>);

impl SimTransport {
    pub fn node(&self) -> Node {
        Node::new(Arc::clone(&self.0))
    }
}

/// The world's geodetic reference, used to report latitude/longitude.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct WorldSphericalCoordinates(pub SphericalCoordinates);

/// Installs the host services every Tethys plugin relies on.
pub struct SimulationCorePlugin {
    pub step_size: Duration,
    pub bus: Arc<TopicBus>,
    pub spherical: SphericalCoordinates,
}

impl SimulationCorePlugin {
    pub fn new(step_size: Duration, bus: Arc<TopicBus>) -> Self {
        Self {
            step_size,
            bus,
            spherical: SphericalCoordinates::default(),
        }
    }

    pub fn with_spherical_coordinates(mut self, spherical: SphericalCoordinates) -> Self {
        self.spherical = spherical;
        self
    }
}

impl Plugin for SimulationCorePlugin {
    fn build(&self, app: &mut App) {
        tracing::info!(
            "Simulation core: step {:?}, {} existing topics",
            self.step_size,
            self.bus.topic_names().len()
        );
        app.insert_resource(SimClock::new(self.step_size))
            .insert_resource(SimTransport(Arc::clone(&self.bus)))
            .insert_resource(WorldSphericalCoordinates(self.spherical))
            .add_systems(First, advance_sim_clock);
    }
}
