// tethys_sim/src/simulation/plugins/comm/mod.rs

//! Vehicle command-and-telemetry bridge.
//!
//! Commands arriving on the command topic are split into per-actuator
//! setpoints. After every physics step the vehicle's kinematic state is
//! sampled from the ECS world and published as one `LrauvState`.

pub mod buoyancy;
pub mod decoder;
pub mod sampler;
pub mod wiring;

use bevy_ecs::prelude::{Entity, World};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tethys_core::config::CommConfig;
use tethys_core::messages::{Double, LrauvCommand, LrauvState};
use tethys_core::transport::{Node, Publisher};

use crate::simulation::core::clock::UpdateInfo;
use crate::simulation::core::simulation_setup::{SimTransport, WorldSphericalCoordinates};
use crate::simulation::core::system::{SimSystem, SystemPlugin};

use buoyancy::BuoyancyTracker;
use decoder::CommandDecoder;
use sampler::{sample_state, SampleContext, SampleError};
use wiring::{ControlPublishers, ControlTopics, EntityBindings};

/// Minimum simulated time between two state summaries in the log.
const STATE_LOG_PERIOD: Duration = Duration::from_secs(1);

// =========================================================================
// == Counters ==
// =========================================================================

/// Running totals, shared with the transport callbacks.
#[derive(Debug, Default)]
pub struct BridgeStats {
    commands_handled: AtomicU64,
    states_published: AtomicU64,
    snapshots_rejected: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStatsSnapshot {
    pub commands_handled: u64,
    pub states_published: u64,
    pub snapshots_rejected: u64,
}

impl BridgeStats {
    pub fn record_command(&self) {
        self.commands_handled.fetch_add(1, Ordering::Relaxed);
    }

    fn record_state(&self) {
        self.states_published.fetch_add(1, Ordering::Relaxed);
    }

    fn record_rejection(&self) {
        self.snapshots_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> BridgeStatsSnapshot {
        BridgeStatsSnapshot {
            commands_handled: self.commands_handled.load(Ordering::Relaxed),
            states_published: self.states_published.load(Ordering::Relaxed),
            snapshots_rejected: self.snapshots_rejected.load(Ordering::Relaxed),
        }
    }
}

// =========================================================================
// == Bridge ==
// =========================================================================

pub struct CommBridge {
    config: CommConfig,
    topics: ControlTopics,
    bindings: EntityBindings,
    buoyancy: BuoyancyTracker,
    state_pub: Option<Publisher<LrauvState>>,
    stats: Arc<BridgeStats>,
    prev_pub_print_time: Duration,
}

impl CommBridge {
    pub fn new(config: CommConfig) -> Self {
        let topics = ControlTopics::from_config(&config);
        Self {
            config,
            topics,
            bindings: EntityBindings::default(),
            buoyancy: BuoyancyTracker::default(),
            state_pub: None,
            stats: Arc::new(BridgeStats::default()),
            prev_pub_print_time: Duration::ZERO,
        }
    }

    pub fn config(&self) -> &CommConfig {
        &self.config
    }

    pub fn topics(&self) -> &ControlTopics {
        &self.topics
    }

    pub fn bindings(&self) -> &EntityBindings {
        &self.bindings
    }

    pub fn stats(&self) -> BridgeStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn buoyancy_volume(&self) -> f64 {
        self.buoyancy.volume()
    }

    /// Reads this tick's snapshot without publishing it.
    pub fn sample(&self, info: &UpdateInfo, world: &World) -> Result<LrauvState, SampleError> {
        let spherical = world
            .get_resource::<WorldSphericalCoordinates>()
            .map(|sc| sc.0)
            .unwrap_or_default();
        let ctx = SampleContext {
            bindings: &self.bindings,
            spherical: &spherical,
            buoyancy_volume: self.buoyancy.volume(),
        };
        sample_state(&ctx, info, world)
    }

    fn open_transport(&mut self, node: &Node) {
        let decoder = CommandDecoder::new(
            ControlPublishers::advertise(node, &self.topics),
            Arc::clone(&self.stats),
        );
        if let Err(e) = node.subscribe(&self.config.command_topic, move |msg: &LrauvCommand| {
            decoder.handle(msg)
        }) {
            tracing::error!(
                "Error subscribing to topic [{}]: {}",
                self.config.command_topic,
                e
            );
        }

        self.state_pub = match node.advertise::<LrauvState>(&self.config.state_topic) {
            Ok(publisher) => Some(publisher),
            Err(e) => {
                tracing::error!("Error advertising topic [{}]: {}", self.config.state_topic, e);
                None
            }
        };

        match self.topics.buoyancy_engine_state.as_deref() {
            Some(topic) => {
                let tracker = self.buoyancy.clone();
                if let Err(e) = node.subscribe(topic, move |msg: &Double| tracker.on_state(msg)) {
                    tracing::error!("Error subscribing to topic [{}]: {}", topic, e);
                }
            }
            None => tracing::error!(
                "Buoyancy state topic [{}] is not a valid topic name",
                self.config.buoyancy_engine_state_topic
            ),
        }
    }

    fn log_state(&mut self, info: &UpdateInfo, state: &LrauvState) {
        if info.sim_time.saturating_sub(self.prev_pub_print_time) <= STATE_LOG_PERIOD {
            return;
        }
        tracing::debug!(
            "Published state to {} at time: {}.{:09} propOmega: {} speed: {} elevator angle: {} \
             rudder angle: {} mass shifter (m): {}",
            self.config.state_topic,
            state.header.stamp.sec,
            state.header.stamp.nsec,
            state.prop_omega,
            state.speed,
            state.elevator_angle,
            state.rudder_angle,
            state.mass_position
        );
        self.prev_pub_print_time = info.sim_time;
    }
}

impl SimSystem for CommBridge {
    fn configure(&mut self, entity: Entity, world: &mut World) {
        match world.get_resource::<SimTransport>() {
            Some(transport) => {
                let node = transport.node();
                self.open_transport(&node);
            }
            None => tracing::error!("No transport available; the comm bridge will stay silent"),
        }

        self.bindings = EntityBindings::resolve(entity, &self.config, world);
        self.bindings.ensure_state_components(world);

        tracing::info!(
            "Comm bridge configured for namespace [{}]: command [{}], state [{}]",
            self.config.namespace,
            self.config.command_topic,
            self.config.state_topic
        );
    }

    fn post_update(&mut self, info: &UpdateInfo, world: &World) {
        match self.sample(info, world) {
            Ok(state) => {
                if let Some(publisher) = &self.state_pub {
                    publisher.publish(state.clone());
                    self.stats.record_state();
                }
                self.log_state(info, &state);
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.stats.record_rejection();
            }
        }
    }
}

/// Builds a bridge for `model` ready to be added to an `App`.
pub fn comm_bridge(model: Entity, config: CommConfig) -> SystemPlugin<CommBridge> {
    SystemPlugin::new(model, CommBridge::new(config))
}
