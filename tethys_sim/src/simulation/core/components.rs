// tethys_sim/src/simulation/core/components.rs

use bevy_ecs::prelude::{Component, Entity};
use nalgebra::{Isometry3, Vector3};

// =========================================================================
// == Model Structure ==
// =========================================================================

/// Marks the root entity of a simulated model.
#[derive(Component, Debug, Clone)]
pub struct Model {
    pub name: String,
}

/// A rigid body belonging to a model.
#[derive(Component, Debug, Clone)]
pub struct Link {
    pub name: String,
}

/// A one-degree-of-freedom joint belonging to a model.
#[derive(Component, Debug, Clone)]
pub struct Joint {
    pub name: String,
}

/// Points from a link or joint back to the model that owns it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentModel(pub Entity);

// =========================================================================
// == Kinematic State (written by physics, read by sensors/telemetry) ==
// =========================================================================

/// Pose of a link in the world frame.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct WorldPose(pub Isometry3<f64>);

impl Default for WorldPose {
    fn default() -> Self {
        Self(Isometry3::identity())
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct WorldLinearVelocity(pub Vector3<f64>);

impl Default for WorldLinearVelocity {
    fn default() -> Self {
        Self(Vector3::zeros())
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct WorldAngularVelocity(pub Vector3<f64>);

impl Default for WorldAngularVelocity {
    fn default() -> Self {
        Self(Vector3::zeros())
    }
}

/// Angular velocity expressed in the link's own frame.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AngularVelocity(pub Vector3<f64>);

impl Default for AngularVelocity {
    fn default() -> Self {
        Self(Vector3::zeros())
    }
}

/// Joint positions, one entry per axis. Empty until physics fills it in.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct JointPosition(pub Vec<f64>);

// =========================================================================
// == Actuation (written by actuator plugins, read by physics) ==
// =========================================================================

/// Commanded position for a joint's first axis.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct JointPositionTarget(pub f64);

/// Force and torque to apply to a link during the next physics step, world frame.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ExternalWrench {
    pub force: Vector3<f64>,
    pub torque: Vector3<f64>,
}

impl Default for ExternalWrench {
    fn default() -> Self {
        Self {
            force: Vector3::zeros(),
            torque: Vector3::zeros(),
        }
    }
}
