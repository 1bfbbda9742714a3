// tethys_sim/src/prelude.rs

// Re-export the tethys_core prelude so messages, configs and the transport
// are one import away.
pub use tethys_core::prelude::*;

pub use crate::simulation::config::{ScenarioConfig, ScenarioError, SimulationConfig};
pub use crate::simulation::core::clock::{SimClock, UpdateInfo};
pub use crate::simulation::core::components::*;
pub use crate::simulation::core::model::{ensure_component, ModelError, ModelHandle};
pub use crate::simulation::core::simulation_setup::{
    SimTransport, SimulationCorePlugin, WorldSphericalCoordinates,
};
pub use crate::simulation::core::system::{SimSystem, SystemPlugin, SystemSlots};

pub use crate::simulation::plugins::actuators::{JointPositionController, Thruster};
pub use crate::simulation::plugins::comm::{comm_bridge, BridgeStatsSnapshot, CommBridge};
pub use crate::simulation::plugins::vehicles::auv::VehicleDynamicsPlugin;
pub use crate::simulation::plugins::world::spawner::{spawn_tethys_model, VehicleLayout};
pub use crate::{TethysSimulationPlugin, VehicleModel};
