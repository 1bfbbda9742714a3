// tethys_sim/src/simulation/plugins/comm/wiring.rs

//! One-time setup: topic names, transport handles, entity bindings.

use bevy_ecs::prelude::{Component, Entity, World};
use std::fmt;

use tethys_core::config::CommConfig;
use tethys_core::messages::{Double, Empty};
use tethys_core::transport::names::{joint_topic, model_topic};
use tethys_core::transport::{Message, Node, Publisher};

use crate::simulation::core::components::{
    AngularVelocity, JointPosition, WorldAngularVelocity, WorldLinearVelocity, WorldPose,
};
use crate::simulation::core::model::{ensure_component, ModelHandle};

// =========================================================================
// == Topics ==
// =========================================================================

/// Fully resolved actuator topics. `None` marks a channel whose name could
/// not be turned into a valid topic; it stays inert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlTopics {
    pub thruster: Option<String>,
    pub rudder: Option<String>,
    pub elevator: Option<String>,
    pub mass_shifter: Option<String>,
    pub buoyancy_engine_cmd: Option<String>,
    pub buoyancy_engine_state: Option<String>,
    pub drop_weight: Option<String>,
}

impl ControlTopics {
    pub fn from_config(config: &CommConfig) -> Self {
        let ns = config.namespace.as_str();
        Self {
            thruster: joint_topic(ns, &config.thruster_topic),
            rudder: joint_topic(ns, &config.rudder_topic),
            elevator: joint_topic(ns, &config.elevator_topic),
            mass_shifter: joint_topic(ns, &config.mass_shifter_topic),
            buoyancy_engine_cmd: model_topic(ns, &config.buoyancy_engine_cmd_topic),
            buoyancy_engine_state: model_topic(ns, &config.buoyancy_engine_state_topic),
            drop_weight: model_topic(ns, &config.drop_weight_topic),
        }
    }
}

/// Publish handles for every actuator channel. A `None` handle is a no-op.
#[derive(Debug, Clone, Default)]
pub struct ControlPublishers {
    pub thruster: Option<Publisher<Double>>,
    pub rudder: Option<Publisher<Double>>,
    pub elevator: Option<Publisher<Double>>,
    pub mass_shifter: Option<Publisher<Double>>,
    pub buoyancy_engine: Option<Publisher<Double>>,
    pub drop_weight: Option<Publisher<Empty>>,
}

impl ControlPublishers {
    pub fn advertise(node: &Node, topics: &ControlTopics) -> Self {
        Self {
            thruster: advertise_or_log(node, topics.thruster.as_deref(), "thruster"),
            rudder: advertise_or_log(node, topics.rudder.as_deref(), "rudder"),
            elevator: advertise_or_log(node, topics.elevator.as_deref(), "elevator"),
            mass_shifter: advertise_or_log(node, topics.mass_shifter.as_deref(), "mass shifter"),
            buoyancy_engine: advertise_or_log(
                node,
                topics.buoyancy_engine_cmd.as_deref(),
                "buoyancy engine",
            ),
            drop_weight: advertise_or_log(node, topics.drop_weight.as_deref(), "drop weight"),
        }
    }
}

fn advertise_or_log<T: Message>(
    node: &Node,
    topic: Option<&str>,
    channel: &str,
) -> Option<Publisher<T>> {
    let Some(topic) = topic else {
        tracing::error!("No valid topic for the {} channel; it will stay idle", channel);
        return None;
    };
    match node.advertise::<T>(topic) {
        Ok(publisher) => Some(publisher),
        Err(e) => {
            tracing::error!("Error advertising topic [{}]: {}", topic, e);
            None
        }
    }
}

// =========================================================================
// == Entities ==
// =========================================================================

/// The model parts the bridge reads each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    ModelLink,
    PropellerLink,
    RudderJoint,
    ElevatorJoint,
    MassShifterJoint,
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Binding::ModelLink => "Model link",
            Binding::PropellerLink => "Propeller link",
            Binding::RudderJoint => "Rudder joint",
            Binding::ElevatorJoint => "Elevator joint",
            Binding::MassShifterJoint => "Mass shifter joint",
        };
        f.write_str(name)
    }
}

/// Resolved entity ids. The host owns the entities; these are only handles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityBindings {
    pub model_link: Option<Entity>,
    pub propeller_link: Option<Entity>,
    pub rudder_joint: Option<Entity>,
    pub elevator_joint: Option<Entity>,
    pub mass_shifter_joint: Option<Entity>,
}

impl EntityBindings {
    pub fn get(&self, binding: Binding) -> Option<Entity> {
        match binding {
            Binding::ModelLink => self.model_link,
            Binding::PropellerLink => self.propeller_link,
            Binding::RudderJoint => self.rudder_joint,
            Binding::ElevatorJoint => self.elevator_joint,
            Binding::MassShifterJoint => self.mass_shifter_joint,
        }
    }

    /// Looks up the configured links and joints under `model`.
    pub fn resolve(model: Entity, config: &CommConfig, world: &mut World) -> Self {
        let model = ModelHandle(model);
        let bindings = Self {
            model_link: model.link_by_name(world, &config.model_link),
            propeller_link: model.link_by_name(world, &config.propeller_link),
            rudder_joint: model.joint_by_name(world, &config.rudder_joint),
            elevator_joint: model.joint_by_name(world, &config.elevator_joint),
            mass_shifter_joint: model.joint_by_name(world, &config.mass_shifter_joint),
        };

        let names = [
            (Binding::ModelLink, &config.model_link),
            (Binding::PropellerLink, &config.propeller_link),
            (Binding::RudderJoint, &config.rudder_joint),
            (Binding::ElevatorJoint, &config.elevator_joint),
            (Binding::MassShifterJoint, &config.mass_shifter_joint),
        ];
        for (binding, name) in names {
            if bindings.get(binding).is_none() {
                tracing::error!("{} [{}] not found in model {:?}", binding, name, model.entity());
            }
        }
        bindings
    }

    /// Creates the components the state sampler reads, where missing.
    pub fn ensure_state_components(&self, world: &mut World) {
        if let Some(link) = self.propeller_link {
            ensure_or_log::<AngularVelocity>(world, link);
            ensure_or_log::<WorldAngularVelocity>(world, link);
        }
        if let Some(link) = self.model_link {
            ensure_or_log::<WorldPose>(world, link);
            ensure_or_log::<WorldLinearVelocity>(world, link);
        }
        for joint in [self.rudder_joint, self.elevator_joint, self.mass_shifter_joint]
            .into_iter()
            .flatten()
        {
            ensure_or_log::<JointPosition>(world, joint);
        }
    }
}

fn ensure_or_log<C: Component + Default>(world: &mut World, entity: Entity) {
    if let Err(e) = ensure_component::<C>(world, entity) {
        tracing::error!("Unable to add {}: {}", std::any::type_name::<C>(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_topics_follow_tethys_layout() {
        let topics = ControlTopics::from_config(&CommConfig::default());
        assert_eq!(
            topics.thruster.as_deref(),
            Some("/model/tethys/joint/propeller_joint/cmd_pos")
        );
        assert_eq!(
            topics.rudder.as_deref(),
            Some("/model/tethys/joint/vertical_fins_joint/0/cmd_pos")
        );
        assert_eq!(
            topics.elevator.as_deref(),
            Some("/model/tethys/joint/horizontal_fins_joint/0/cmd_pos")
        );
        assert_eq!(
            topics.mass_shifter.as_deref(),
            Some("/model/tethys/joint/battery_joint/0/cmd_pos")
        );
        assert_eq!(
            topics.buoyancy_engine_cmd.as_deref(),
            Some("/model/tethys/buoyancy_engine")
        );
        assert_eq!(
            topics.buoyancy_engine_state.as_deref(),
            Some("/model/tethys/buoyancy_engine/current_volume")
        );
        assert_eq!(topics.drop_weight.as_deref(), Some("/model/tethys/drop_weight"));
    }

    #[test]
    fn namespace_and_channel_overrides_apply() {
        let config = CommConfig {
            namespace: "daphne".into(),
            rudder_topic: "rudder cmd".into(),
            ..Default::default()
        };
        let topics = ControlTopics::from_config(&config);
        assert_eq!(topics.rudder.as_deref(), Some("/model/daphne/joint/rudder_cmd"));
        assert_eq!(topics.drop_weight.as_deref(), Some("/model/daphne/drop_weight"));
    }

    #[test]
    fn empty_namespace_collapses_separator() {
        let config = CommConfig {
            namespace: String::new(),
            ..Default::default()
        };
        // "/model//joint/..." collapses, so the names stay usable.
        let topics = ControlTopics::from_config(&config);
        assert_eq!(
            topics.thruster.as_deref(),
            Some("/model/joint/propeller_joint/cmd_pos")
        );
    }
}
