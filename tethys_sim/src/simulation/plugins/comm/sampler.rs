// tethys_sim/src/simulation/plugins/comm/sampler.rs

use bevy_ecs::prelude::{Component, Entity, World};
use thiserror::Error;

use tethys_core::messages::{Header, LrauvState, Time};
use tethys_core::spherical::SphericalCoordinates;

use super::wiring::{Binding, EntityBindings};
use crate::simulation::core::clock::UpdateInfo;
use crate::simulation::core::components::{
    JointPosition, WorldAngularVelocity, WorldLinearVelocity, WorldPose,
};

/// Why a tick produced no snapshot. The next tick samples afresh.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("{0} is not bound to an entity")]
    MissingEntity(Binding),

    #[error("{binding} has no {component} component")]
    MissingComponent {
        binding: Binding,
        component: &'static str,
    },

    #[error("{binding} component has the wrong size ({size}), expected 1")]
    JointPositionSize { binding: Binding, size: usize },
}

/// Everything the sampler reads besides the ECS world.
pub struct SampleContext<'a> {
    pub bindings: &'a EntityBindings,
    pub spherical: &'a SphericalCoordinates,
    pub buoyancy_volume: f64,
}

/// Builds this tick's state snapshot. Any failure aborts the whole snapshot.
pub fn sample_state(
    ctx: &SampleContext<'_>,
    info: &UpdateInfo,
    world: &World,
) -> Result<LrauvState, SampleError> {
    let bindings = ctx.bindings;

    // Attitude and depth
    let pose = read::<WorldPose>(world, bindings, Binding::ModelLink)?.0;
    let (roll, pitch, heading) = pose.rotation.euler_angles();
    let position = pose.translation.vector;

    // Speed
    let speed = read::<WorldLinearVelocity>(world, bindings, Binding::ModelLink)?
        .0
        .norm();

    // Control surfaces and battery
    let rudder_angle = single_joint_position(world, bindings, Binding::RudderJoint)?;
    let elevator_angle = single_joint_position(world, bindings, Binding::ElevatorJoint)?;
    let mass_position = single_joint_position(world, bindings, Binding::MassShifterJoint)?;

    let latlon = ctx.spherical.spherical_from_local_position(&position);

    let prop_omega = read::<WorldAngularVelocity>(world, bindings, Binding::PropellerLink)?
        .0
        .norm();

    Ok(LrauvState {
        header: Header {
            stamp: Time::from_duration(info.sim_time),
        },
        rph: nalgebra::Vector3::new(roll, pitch, heading),
        depth: -position.z,
        speed,
        rudder_angle,
        elevator_angle,
        mass_position,
        latitude_deg: latlon.x,
        longitude_deg: latlon.y,
        prop_omega,
        buoyancy_position: ctx.buoyancy_volume,
    })
}

fn entity(bindings: &EntityBindings, binding: Binding) -> Result<Entity, SampleError> {
    bindings
        .get(binding)
        .ok_or(SampleError::MissingEntity(binding))
}

fn read<'w, C: Component>(
    world: &'w World,
    bindings: &EntityBindings,
    binding: Binding,
) -> Result<&'w C, SampleError> {
    world
        .get::<C>(entity(bindings, binding)?)
        .ok_or(SampleError::MissingComponent {
            binding,
            component: short_type_name::<C>(),
        })
}

fn single_joint_position(
    world: &World,
    bindings: &EntityBindings,
    binding: Binding,
) -> Result<f64, SampleError> {
    match read::<JointPosition>(world, bindings, binding)?.0.as_slice() {
        [value] => Ok(*value),
        other => Err(SampleError::JointPositionSize {
            binding,
            size: other.len(),
        }),
    }
}

fn short_type_name<C>() -> &'static str {
    let full = std::any::type_name::<C>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
    use std::time::Duration;

    struct Fixture {
        world: World,
        bindings: EntityBindings,
    }

    fn fixture() -> Fixture {
        let mut world = World::new();
        let base = world
            .spawn((WorldPose::default(), WorldLinearVelocity::default()))
            .id();
        let prop = world.spawn(WorldAngularVelocity::default()).id();
        let rudder = world.spawn(JointPosition(vec![0.0])).id();
        let elevator = world.spawn(JointPosition(vec![0.0])).id();
        let battery = world.spawn(JointPosition(vec![0.0])).id();
        Fixture {
            world,
            bindings: EntityBindings {
                model_link: Some(base),
                propeller_link: Some(prop),
                rudder_joint: Some(rudder),
                elevator_joint: Some(elevator),
                mass_shifter_joint: Some(battery),
            },
        }
    }

    fn sample(f: &Fixture, volume: f64, sim_time: Duration) -> Result<LrauvState, SampleError> {
        let spherical = SphericalCoordinates::default();
        let ctx = SampleContext {
            bindings: &f.bindings,
            spherical: &spherical,
            buoyancy_volume: volume,
        };
        let info = UpdateInfo {
            sim_time,
            ..Default::default()
        };
        sample_state(&ctx, &info, &f.world)
    }

    #[test]
    fn snapshot_reflects_world_state() {
        let mut f = fixture();
        let rotation = UnitQuaternion::from_euler_angles(0.1, -0.2, 1.3);
        let b = f.bindings;
        f.world.entity_mut(b.model_link.unwrap()).insert((
            WorldPose(Isometry3::from_parts(
                Translation3::new(0.0, 0.0, -12.5),
                rotation,
            )),
            WorldLinearVelocity(Vector3::new(3.0, 4.0, 0.0)),
        ));
        f.world
            .entity_mut(b.propeller_link.unwrap())
            .insert(WorldAngularVelocity(Vector3::new(-30.0, 0.0, 0.0)));
        f.world.entity_mut(b.rudder_joint.unwrap()).insert(JointPosition(vec![0.05]));
        f.world.entity_mut(b.elevator_joint.unwrap()).insert(JointPosition(vec![-0.1]));
        f.world.entity_mut(b.mass_shifter_joint.unwrap()).insert(JointPosition(vec![0.02]));

        let state = sample(&f, 0.5, Duration::from_millis(2_500)).unwrap();

        assert_eq!(state.header.stamp, Time { sec: 2, nsec: 500_000_000 });
        assert_abs_diff_eq!(state.rph.x, 0.1, epsilon = 1e-9);
        assert_abs_diff_eq!(state.rph.y, -0.2, epsilon = 1e-9);
        assert_abs_diff_eq!(state.rph.z, 1.3, epsilon = 1e-9);
        assert_abs_diff_eq!(state.depth, 12.5);
        assert_abs_diff_eq!(state.speed, 5.0);
        assert_eq!(state.rudder_angle, 0.05);
        assert_eq!(state.elevator_angle, -0.1);
        assert_eq!(state.mass_position, 0.02);
        assert_abs_diff_eq!(state.prop_omega, 30.0);
        assert_eq!(state.buoyancy_position, 0.5);
        assert_abs_diff_eq!(state.latitude_deg, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.longitude_deg, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn joint_with_two_values_rejects_snapshot() {
        let mut f = fixture();
        let rudder = f.bindings.rudder_joint.unwrap();
        f.world.entity_mut(rudder).insert(JointPosition(vec![0.1, 0.2]));
        assert_eq!(
            sample(&f, 0.0, Duration::ZERO),
            Err(SampleError::JointPositionSize {
                binding: Binding::RudderJoint,
                size: 2
            })
        );
    }

    #[test]
    fn joint_with_no_value_rejects_snapshot() {
        let mut f = fixture();
        let battery = f.bindings.mass_shifter_joint.unwrap();
        f.world.entity_mut(battery).insert(JointPosition(Vec::new()));
        assert_eq!(
            sample(&f, 0.0, Duration::ZERO),
            Err(SampleError::JointPositionSize {
                binding: Binding::MassShifterJoint,
                size: 0
            })
        );
    }

    #[test]
    fn unbound_or_bare_entities_are_reported() {
        let mut f = fixture();
        f.bindings.elevator_joint = None;
        assert_eq!(
            sample(&f, 0.0, Duration::ZERO),
            Err(SampleError::MissingEntity(Binding::ElevatorJoint))
        );

        let mut f = fixture();
        let prop = f.bindings.propeller_link.unwrap();
        f.world.entity_mut(prop).remove::<WorldAngularVelocity>();
        let err = sample(&f, 0.0, Duration::ZERO).unwrap_err();
        assert_eq!(
            err,
            SampleError::MissingComponent {
                binding: Binding::PropellerLink,
                component: "WorldAngularVelocity"
            }
        );
        assert_eq!(
            err.to_string(),
            "Propeller link has no WorldAngularVelocity component"
        );
    }
}
