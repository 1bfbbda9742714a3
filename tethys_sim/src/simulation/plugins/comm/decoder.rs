// tethys_sim/src/simulation/plugins/comm/decoder.rs

use std::sync::Arc;

use tethys_core::messages::{Double, Empty, LrauvCommand};
use tethys_core::thrust::propeller_thrust;
use tethys_core::transport::{Message, Publisher};

use super::wiring::ControlPublishers;
use super::BridgeStats;

/// Turns one vehicle command into per-actuator setpoints.
#[derive(Debug, Clone)]
pub struct CommandDecoder {
    publishers: ControlPublishers,
    stats: Arc<BridgeStats>,
}

impl CommandDecoder {
    pub fn new(publishers: ControlPublishers, stats: Arc<BridgeStats>) -> Self {
        Self { publishers, stats }
    }

    pub fn handle(&self, msg: &LrauvCommand) {
        tracing::debug!(
            "Received command: propOmegaAction={} rudderAngleAction={} elevatorAngleAction={} \
             massPositionAction={} buoyancyAction={} density={} dt={} time={}",
            msg.prop_omega_action,
            msg.rudder_angle_action,
            msg.elevator_angle_action,
            msg.mass_position_action,
            msg.buoyancy_action,
            msg.density,
            msg.dt,
            msg.time
        );

        publish(&self.publishers.rudder, Double::new(msg.rudder_angle_action));
        publish(&self.publishers.elevator, Double::new(msg.elevator_angle_action));
        publish(
            &self.publishers.thruster,
            Double::new(propeller_thrust(msg.prop_omega_action)),
        );
        publish(&self.publishers.mass_shifter, Double::new(msg.mass_position_action));
        publish(&self.publishers.buoyancy_engine, Double::new(msg.buoyancy_action));

        if msg.drop_weight_state != 0 {
            publish(&self.publishers.drop_weight, Empty);
        }

        self.stats.record_command();
    }
}

fn publish<T: Message>(publisher: &Option<Publisher<T>>, msg: T) {
    if let Some(publisher) = publisher {
        publisher.publish(msg);
    }
}
