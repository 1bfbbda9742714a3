// tethys_sim/src/simulation/plugins/world/spawner.rs

use bevy_ecs::prelude::{Entity, World};
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use serde::Deserialize;

use tethys_core::config::CommConfig;

use crate::simulation::core::components::{
    AngularVelocity, Joint, JointPosition, Link, Model, ParentModel, WorldAngularVelocity,
    WorldLinearVelocity, WorldPose,
};
use crate::simulation::plugins::vehicles::auv::{HullDynamics, MountOffset, Propeller};

/// Everything needed to build a vehicle's entity tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehicleLayout {
    pub name: String,
    pub base_link: String,
    pub propeller_link: String,
    pub propeller_joint: String,
    pub rudder_joint: String,
    pub elevator_joint: String,
    pub mass_shifter_joint: String,
    /// Kilograms.
    pub mass: f64,
    /// N·s/m.
    pub linear_drag: f64,
    /// Distance of the propeller behind the hull origin, meters.
    pub propeller_offset: f64,
    /// Start position in the local ENU frame, meters.
    pub initial_position: [f64; 3],
    /// Start heading, degrees counter-clockwise from east.
    pub initial_yaw_deg: f64,
}

impl Default for VehicleLayout {
    fn default() -> Self {
        Self::from_comm(&CommConfig::default())
    }
}

impl VehicleLayout {
    /// A layout whose names match what a bridge with `comm` will look up.
    pub fn from_comm(comm: &CommConfig) -> Self {
        Self {
            name: comm.namespace.clone(),
            base_link: comm.model_link.clone(),
            propeller_link: comm.propeller_link.clone(),
            propeller_joint: "propeller_joint".to_string(),
            rudder_joint: comm.rudder_joint.clone(),
            elevator_joint: comm.elevator_joint.clone(),
            mass_shifter_joint: comm.mass_shifter_joint.clone(),
            mass: 147.8671,
            linear_drag: 60.0,
            propeller_offset: 2.0,
            initial_position: [0.0; 3],
            initial_yaw_deg: 0.0,
        }
    }

    pub fn initial_pose(&self) -> Isometry3<f64> {
        let [x, y, z] = self.initial_position;
        Isometry3::from_parts(
            Translation3::new(x, y, z),
            UnitQuaternion::from_euler_angles(0.0, 0.0, self.initial_yaw_deg.to_radians()),
        )
    }
}

/// Spawns the model entity with its links and joints. Returns the model.
pub fn spawn_tethys_model(world: &mut World, layout: &VehicleLayout) -> Entity {
    let model = world
        .spawn(Model {
            name: layout.name.clone(),
        })
        .id();
    let start = layout.initial_pose();

    world.spawn((
        Link {
            name: layout.base_link.clone(),
        },
        ParentModel(model),
        HullDynamics {
            mass: layout.mass,
            linear_drag: layout.linear_drag,
        },
        WorldPose(start),
        WorldLinearVelocity::default(),
    ));

    let offset = Isometry3::translation(-layout.propeller_offset, 0.0, 0.0);
    world.spawn((
        Link {
            name: layout.propeller_link.clone(),
        },
        ParentModel(model),
        Propeller,
        MountOffset(offset),
        WorldPose(start * offset),
        AngularVelocity(Vector3::zeros()),
        WorldAngularVelocity(Vector3::zeros()),
    ));

    for joint in [
        &layout.rudder_joint,
        &layout.elevator_joint,
        &layout.mass_shifter_joint,
    ] {
        world.spawn((
            Joint {
                name: joint.clone(),
            },
            ParentModel(model),
            JointPosition(vec![0.0]),
        ));
    }
    world.spawn((
        Joint {
            name: layout.propeller_joint.clone(),
        },
        ParentModel(model),
    ));

    tracing::info!(
        "Spawned vehicle [{}] as {:?} at ({:.1}, {:.1}, {:.1})",
        layout.name,
        model,
        start.translation.x,
        start.translation.y,
        start.translation.z
    );
    model
}
