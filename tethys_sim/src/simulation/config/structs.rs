// tethys_sim/src/simulation/config/structs.rs

use bevy_ecs::prelude::Resource;
use serde::Deserialize;
use std::time::Duration;

use tethys_core::config::CommConfig;
use tethys_core::messages::LrauvCommand;
use tethys_core::spherical::SphericalCoordinates;

use crate::simulation::plugins::world::spawner::VehicleLayout;

/// Top-level scenario file.
#[derive(Resource, Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    pub simulation: SimulationConfig,
    /// Geodetic origin of the local frame.
    pub world: SphericalCoordinates,
    pub comm: CommConfig,
    /// Vehicle layout. When absent it is derived from `[comm]`.
    pub vehicle: Option<VehicleLayout>,
    /// Command replayed on the command topic every tick.
    pub command: LrauvCommand,
}

impl ScenarioConfig {
    pub fn vehicle_layout(&self) -> VehicleLayout {
        self.vehicle
            .clone()
            .unwrap_or_else(|| VehicleLayout::from_comm(&self.comm))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Physics step, milliseconds.
    pub step_ms: u64,
    /// Total simulated time, seconds.
    pub duration_s: f64,
    /// Maximum joint speed used by the stand-in dynamics.
    pub joint_slew_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_ms: 10,
            duration_s: 10.0,
            joint_slew_rate: 0.5,
        }
    }
}

impl SimulationConfig {
    pub fn step_size(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }

    /// Ticks needed to cover `duration_s`, rounded up.
    pub fn steps(&self) -> u64 {
        if self.step_ms == 0 || self.duration_s <= 0.0 {
            return 0;
        }
        (self.duration_s / self.step_size().as_secs_f64()).ceil() as u64
    }
}
