// tethys_sim/src/simulation/plugins/actuators/thruster.rs

use bevy_ecs::prelude::{Entity, World};
use nalgebra::{UnitQuaternion, Vector3};
use std::sync::Arc;

use tethys_core::config::ThrusterConfig;
use tethys_core::messages::Double;
use tethys_core::sync::AtomicF64;
use tethys_core::transport::names::joint_topic;

use crate::simulation::core::clock::UpdateInfo;
use crate::simulation::core::components::{ExternalWrench, WorldPose};
use crate::simulation::core::model::{ensure_component, ModelHandle};
use crate::simulation::core::simulation_setup::SimTransport;
use crate::simulation::core::system::{SimSystem, SystemPlugin};

/// Applies the last commanded thrust along the link's body x axis.
pub struct Thruster {
    config: ThrusterConfig,
    link: Option<Entity>,
    force: Arc<AtomicF64>,
}

impl Thruster {
    pub fn new(config: ThrusterConfig) -> Self {
        Self {
            config,
            link: None,
            force: Arc::new(AtomicF64::default()),
        }
    }

    pub fn link(&self) -> Option<Entity> {
        self.link
    }

    /// Last commanded thrust in newtons.
    pub fn force(&self) -> f64 {
        self.force.load()
    }

    pub fn topic(&self) -> Option<String> {
        joint_topic(&self.config.namespace, &self.config.channel())
    }
}

impl SimSystem for Thruster {
    fn configure(&mut self, entity: Entity, world: &mut World) {
        let model = ModelHandle(entity);
        if model.joint_by_name(world, &self.config.joint_name).is_none() {
            tracing::warn!(
                "Thruster joint [{}] not found under model {:?}",
                self.config.joint_name,
                entity
            );
        }
        self.link = model.link_by_name(world, &self.config.link_name);
        let Some(link) = self.link else {
            tracing::error!(
                "Thruster link [{}] not found under model {:?}",
                self.config.link_name,
                entity
            );
            return;
        };
        if let Err(e) = ensure_component::<WorldPose>(world, link) {
            tracing::error!("{}", e);
        }

        let Some(topic) = self.topic() else {
            tracing::error!(
                "Thruster [{}] has no valid command topic",
                self.config.joint_name
            );
            return;
        };
        let Some(node) = world.get_resource::<SimTransport>().map(SimTransport::node) else {
            tracing::error!("No transport available for thruster [{}]", self.config.joint_name);
            return;
        };
        let force = Arc::clone(&self.force);
        match node.subscribe(&topic, move |msg: &Double| force.store(msg.data)) {
            Ok(()) => tracing::debug!("Thruster listening on [{}]", topic),
            Err(e) => tracing::error!("Error subscribing to topic [{}]: {}", topic, e),
        }
    }

    fn pre_update(&mut self, info: &UpdateInfo, world: &mut World) {
        if info.paused {
            return;
        }
        let Some(link) = self.link else { return };
        let Ok(mut entity) = world.get_entity_mut(link) else {
            return;
        };
        let rotation = entity
            .get::<WorldPose>()
            .map(|pose| pose.0.rotation)
            .unwrap_or_else(UnitQuaternion::identity);
        let force = rotation * Vector3::new(self.force.load(), 0.0, 0.0);
        entity.insert(ExternalWrench {
            force,
            torque: Vector3::zeros(),
        });
    }
}

pub fn thruster(model: Entity, config: ThrusterConfig) -> SystemPlugin<Thruster> {
    SystemPlugin::new(model, Thruster::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::core::components::{Joint, Link, Model, ParentModel};
    use crate::simulation::core::simulation_setup::SimulationCorePlugin;
    use approx::assert_relative_eq;
    use bevy_app::App;
    use nalgebra::{Isometry3, Translation3, UnitQuaternion};
    use std::f64::consts::FRAC_PI_2;
    use std::time::Duration;
    use tethys_core::transport::{Node, TopicBus};

    #[test]
    fn thrust_follows_link_heading() {
        let bus = Arc::new(TopicBus::new());
        let mut app = App::new();
        app.add_plugins(SimulationCorePlugin::new(
            Duration::from_millis(10),
            Arc::clone(&bus),
        ));
        let world = app.world_mut();
        let model = world.spawn(Model { name: "tethys".into() }).id();
        let yawed = Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_euler_angles(0.0, 0.0, FRAC_PI_2),
        );
        let link = world
            .spawn((
                Link { name: "propeller".into() },
                ParentModel(model),
                WorldPose(yawed),
            ))
            .id();
        world.spawn((Joint { name: "propeller_joint".into() }, ParentModel(model)));

        app.add_plugins(thruster(
            model,
            ThrusterConfig::new("tethys", "propeller_joint", "propeller"),
        ));
        app.update();

        Node::new(Arc::clone(&bus))
            .advertise::<Double>("/model/tethys/joint/propeller_joint/cmd_pos")
            .unwrap()
            .publish(Double::new(-50.0));
        app.update();

        let wrench = app.world().get::<ExternalWrench>(link).unwrap();
        assert_relative_eq!(wrench.force.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(wrench.force.y, -50.0, epsilon = 1e-9);
        assert_relative_eq!(wrench.force.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn missing_link_applies_nothing() {
        let bus = Arc::new(TopicBus::new());
        let mut app = App::new();
        app.add_plugins(SimulationCorePlugin::new(
            Duration::from_millis(10),
            Arc::clone(&bus),
        ));
        let model = app.world_mut().spawn(Model { name: "tethys".into() }).id();
        app.add_plugins(thruster(
            model,
            ThrusterConfig::new("tethys", "propeller_joint", "propeller"),
        ));
        app.update();

        let mut query = app.world_mut().query::<&ExternalWrench>();
        assert_eq!(query.iter(app.world()).count(), 0);
    }
}
