// tethys_sim/src/simulation/plugins/actuators/joint_position.rs

use bevy_ecs::prelude::{Entity, World};
use std::sync::Arc;

use tethys_core::config::JointPositionConfig;
use tethys_core::messages::Double;
use tethys_core::sync::AtomicF64;
use tethys_core::transport::names::joint_topic;

use crate::simulation::core::clock::UpdateInfo;
use crate::simulation::core::components::{JointPosition, JointPositionTarget};
use crate::simulation::core::model::{ensure_component, ModelHandle};
use crate::simulation::core::simulation_setup::SimTransport;
use crate::simulation::core::system::{SimSystem, SystemPlugin};

/// Drives one joint towards the last position received on its command topic.
pub struct JointPositionController {
    config: JointPositionConfig,
    joint: Option<Entity>,
    target: Arc<AtomicF64>,
}

impl JointPositionController {
    pub fn new(config: JointPositionConfig) -> Self {
        Self {
            config,
            joint: None,
            target: Arc::new(AtomicF64::default()),
        }
    }

    pub fn joint(&self) -> Option<Entity> {
        self.joint
    }

    pub fn target(&self) -> f64 {
        self.target.load()
    }

    pub fn topic(&self) -> Option<String> {
        joint_topic(&self.config.namespace, &self.config.channel())
    }
}

impl SimSystem for JointPositionController {
    fn configure(&mut self, entity: Entity, world: &mut World) {
        self.joint = ModelHandle(entity).joint_by_name(world, &self.config.joint_name);
        let Some(joint) = self.joint else {
            tracing::error!(
                "Joint [{}] not found under model {:?}",
                self.config.joint_name,
                entity
            );
            return;
        };
        if let Err(e) = ensure_component::<JointPosition>(world, joint) {
            tracing::error!("{}", e);
        }

        let Some(topic) = self.topic() else {
            tracing::error!(
                "Joint [{}] has no valid command topic",
                self.config.joint_name
            );
            return;
        };
        let Some(node) = world.get_resource::<SimTransport>().map(SimTransport::node) else {
            tracing::error!("No transport available for joint [{}]", self.config.joint_name);
            return;
        };
        let target = Arc::clone(&self.target);
        match node.subscribe(&topic, move |msg: &Double| target.store(msg.data)) {
            Ok(()) => tracing::debug!("Joint [{}] listening on [{}]", self.config.joint_name, topic),
            Err(e) => tracing::error!("Error subscribing to topic [{}]: {}", topic, e),
        }
    }

    fn pre_update(&mut self, info: &UpdateInfo, world: &mut World) {
        if info.paused {
            return;
        }
        let Some(joint) = self.joint else { return };
        if let Ok(mut entity) = world.get_entity_mut(joint) {
            entity.insert(JointPositionTarget(self.target.load()));
        }
    }
}

pub fn joint_position_controller(
    model: Entity,
    config: JointPositionConfig,
) -> SystemPlugin<JointPositionController> {
    SystemPlugin::new(model, JointPositionController::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::core::components::{Joint, Model, ParentModel};
    use crate::simulation::core::simulation_setup::SimulationCorePlugin;
    use crate::simulation::core::system::SystemSlots;
    use bevy_app::App;
    use std::time::Duration;
    use tethys_core::transport::{Node, TopicBus};

    fn app_with_joint(bus: &Arc<TopicBus>) -> (App, Entity, Entity) {
        let mut app = App::new();
        app.add_plugins(SimulationCorePlugin::new(
            Duration::from_millis(10),
            Arc::clone(bus),
        ));
        let model = app.world_mut().spawn(Model { name: "tethys".into() }).id();
        let joint = app
            .world_mut()
            .spawn((Joint { name: "battery_joint".into() }, ParentModel(model)))
            .id();
        (app, model, joint)
    }

    #[test]
    fn command_becomes_joint_target() {
        let bus = Arc::new(TopicBus::new());
        let (mut app, model, joint) = app_with_joint(&bus);
        app.add_plugins(joint_position_controller(
            model,
            JointPositionConfig::new("tethys", "battery_joint"),
        ));
        app.update();

        Node::new(Arc::clone(&bus))
            .advertise::<Double>("/model/tethys/joint/battery_joint/0/cmd_pos")
            .unwrap()
            .publish(Double::new(0.02));
        app.update();

        let world = app.world();
        assert_eq!(world.get::<JointPositionTarget>(joint), Some(&JointPositionTarget(0.02)));
        assert!(world.get::<JointPosition>(joint).is_some());
        let slots = world.resource::<SystemSlots<JointPositionController>>();
        assert_eq!(slots.get(model).unwrap().joint(), Some(joint));
    }

    #[test]
    fn unknown_joint_leaves_world_untouched() {
        let bus = Arc::new(TopicBus::new());
        let (mut app, model, joint) = app_with_joint(&bus);
        app.add_plugins(joint_position_controller(
            model,
            JointPositionConfig::new("tethys", "no_such_joint"),
        ));
        app.update();
        app.update();

        assert!(app.world().get::<JointPositionTarget>(joint).is_none());
        assert!(bus.topic_names().is_empty());
    }
}
