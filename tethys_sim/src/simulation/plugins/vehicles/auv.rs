// tethys_sim/src/simulation/plugins/vehicles/auv.rs

//! A minimal stand-in for the physics engine: enough motion for the
//! telemetry loop to have something to report.
//!
//! Joints slew toward their targets, the hull is pushed by the sum of the
//! wrenches applied to its model's links and slowed by linear drag, and
//! propellers spin at the rate that would produce their applied thrust.
//! There is no hydrostatics and no attitude dynamics.

use bevy_app::{App, Plugin, Update};
use bevy_ecs::prelude::*;
use nalgebra::{Isometry3, Vector3};
use std::collections::HashMap;

use tethys_core::thrust::propeller_omega;

use crate::simulation::core::clock::SimClock;
use crate::simulation::core::components::{
    AngularVelocity, ExternalWrench, JointPosition, JointPositionTarget, Link, ParentModel,
    WorldAngularVelocity, WorldLinearVelocity, WorldPose,
};

// --- COMPONENTS ---

/// Rigid-body parameters of the link that carries a model's motion.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HullDynamics {
    /// Mass in kilograms.
    pub mass: f64,
    /// Linear drag coefficient in N·s/m.
    pub linear_drag: f64,
}

/// Fixed placement of a link relative to its model's hull.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MountOffset(pub Isometry3<f64>);

/// Marks a link whose spin follows the thrust applied to it.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Propeller;

/// Maximum joint speed, rad/s (or m/s for prismatic joints).
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct JointSlewRate(pub f64);

// --- THE PLUGIN ---

pub struct VehicleDynamicsPlugin {
    pub joint_slew_rate: f64,
}

impl Default for VehicleDynamicsPlugin {
    fn default() -> Self {
        Self {
            joint_slew_rate: 0.5,
        }
    }
}

impl Plugin for VehicleDynamicsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(JointSlewRate(self.joint_slew_rate))
            .add_systems(
                Update,
                (slew_joints, integrate_hulls, carry_links, spin_propellers).chain(),
            );
    }
}

// --- SYSTEMS ---

fn step_seconds(clock: &SimClock) -> Option<f64> {
    let info = clock.info();
    (!info.paused).then(|| info.dt.as_secs_f64())
}

/// Moves single-axis joints toward their targets at a bounded rate.
fn slew_joints(
    clock: Res<SimClock>,
    rate: Res<JointSlewRate>,
    mut joints: Query<(&JointPositionTarget, &mut JointPosition)>,
) {
    let Some(dt) = step_seconds(&clock) else {
        return;
    };
    let max_step = rate.0 * dt;
    for (target, mut position) in &mut joints {
        if position.0.is_empty() {
            position.0.push(0.0);
        }
        // Multi-axis joints are not modelled.
        if let [current] = position.0.as_mut_slice() {
            let error = target.0 - *current;
            *current += error.clamp(-max_step, max_step);
        }
    }
}

/// Integrates hull translation under the applied wrenches.
fn integrate_hulls(
    clock: Res<SimClock>,
    wrenches: Query<(&ExternalWrench, &ParentModel)>,
    mut hulls: Query<(
        &HullDynamics,
        &ParentModel,
        &mut WorldPose,
        &mut WorldLinearVelocity,
    )>,
) {
    let Some(dt) = step_seconds(&clock) else {
        return;
    };

    let mut net_force: HashMap<Entity, Vector3<f64>> = HashMap::new();
    for (wrench, parent) in &wrenches {
        *net_force.entry(parent.0).or_insert_with(Vector3::zeros) += wrench.force;
    }

    for (hull, parent, mut pose, mut velocity) in &mut hulls {
        let force = net_force
            .get(&parent.0)
            .copied()
            .unwrap_or_else(Vector3::zeros);
        let acceleration = (force - hull.linear_drag * velocity.0) / hull.mass;
        velocity.0 += acceleration * dt;
        pose.0.translation.vector += velocity.0 * dt;
    }
}

/// Keeps mounted links attached to their hull.
fn carry_links(
    hulls: Query<(&ParentModel, &WorldPose, &WorldLinearVelocity), With<HullDynamics>>,
    mut links: Query<
        (
            &ParentModel,
            &MountOffset,
            &mut WorldPose,
            Option<&mut WorldLinearVelocity>,
        ),
        (With<Link>, Without<HullDynamics>),
    >,
) {
    for (parent, offset, mut pose, velocity) in &mut links {
        let Some((_, hull_pose, hull_velocity)) =
            hulls.iter().find(|(hull_parent, _, _)| hull_parent.0 == parent.0)
        else {
            continue;
        };
        pose.0 = hull_pose.0 * offset.0;
        if let Some(mut velocity) = velocity {
            velocity.0 = hull_velocity.0;
        }
    }
}

/// Sets each propeller's spin from the thrust along its own x axis.
fn spin_propellers(
    mut propellers: Query<
        (
            &WorldPose,
            &ExternalWrench,
            &mut AngularVelocity,
            &mut WorldAngularVelocity,
        ),
        With<Propeller>,
    >,
) {
    for (pose, wrench, mut body_rate, mut world_rate) in &mut propellers {
        let thrust = (pose.0.rotation.inverse() * wrench.force).x;
        let spin = Vector3::new(propeller_omega(thrust), 0.0, 0.0);
        body_rate.0 = spin;
        world_rate.0 = pose.0.rotation * spin;
    }
}
