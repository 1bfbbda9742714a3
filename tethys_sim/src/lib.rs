// tethys_sim/src/lib.rs

use bevy_app::{App, Plugin};
use bevy_ecs::prelude::{Entity, Resource};
use std::sync::Arc;

use tethys_core::config::{JointPositionConfig, ThrusterConfig};
use tethys_core::transport::TopicBus;

use crate::simulation::config::ScenarioConfig;
use crate::simulation::core::simulation_setup::SimulationCorePlugin;
use crate::simulation::plugins::actuators::joint_position::joint_position_controller;
use crate::simulation::plugins::actuators::thruster::thruster;
use crate::simulation::plugins::comm::comm_bridge;
use crate::simulation::plugins::vehicles::auv::VehicleDynamicsPlugin;
use crate::simulation::plugins::world::spawner::spawn_tethys_model;

// This prelude is for convenience for other files WITHIN the tethys_sim crate.
pub mod prelude;

pub mod cli;
pub mod simulation;

/// The vehicle spawned from the scenario.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleModel(pub Entity);

/// Brings together every part of a scenario: host services, the vehicle,
/// its actuators, the stand-in dynamics and the comm bridge.
pub struct TethysSimulationPlugin {
    pub scenario: ScenarioConfig,
    pub bus: Arc<TopicBus>,
}

impl TethysSimulationPlugin {
    pub fn new(scenario: ScenarioConfig, bus: Arc<TopicBus>) -> Self {
        Self { scenario, bus }
    }
}

impl Plugin for TethysSimulationPlugin {
    fn build(&self, app: &mut App) {
        let scenario = &self.scenario;
        let comm = &scenario.comm;
        let layout = scenario.vehicle_layout();
        let ns = comm.namespace.as_str();

        app.add_plugins((
            SimulationCorePlugin::new(scenario.simulation.step_size(), Arc::clone(&self.bus))
                .with_spherical_coordinates(scenario.world),
            VehicleDynamicsPlugin {
                joint_slew_rate: scenario.simulation.joint_slew_rate,
            },
        ))
        .insert_resource(scenario.clone());

        let model = spawn_tethys_model(app.world_mut(), &layout);
        app.insert_resource(VehicleModel(model));

        // Actuators listen on the same channels the bridge publishes to.
        for (joint, channel) in [
            (&layout.rudder_joint, &comm.rudder_topic),
            (&layout.elevator_joint, &comm.elevator_topic),
            (&layout.mass_shifter_joint, &comm.mass_shifter_topic),
        ] {
            let config = JointPositionConfig {
                topic: Some(channel.clone()),
                ..JointPositionConfig::new(ns, joint)
            };
            app.add_plugins(joint_position_controller(model, config));
        }
        let propeller = ThrusterConfig {
            topic: Some(comm.thruster_topic.clone()),
            ..ThrusterConfig::new(ns, &layout.propeller_joint, &layout.propeller_link)
        };
        app.add_plugins((thruster(model, propeller), comm_bridge(model, comm.clone())));
    }
}
