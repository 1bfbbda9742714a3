// tethys_core/src/prelude.rs

// --- Message types (the "nouns" on the wire) ---
pub use crate::messages::{Double, Empty, Header, LrauvCommand, LrauvState, Time};

// --- Plugin configuration ---
pub use crate::config::{CommConfig, JointPositionConfig, ThrusterConfig};

// --- Transport ---
pub use crate::error::TransportError;
pub use crate::transport::names::{joint_topic, model_topic};
pub use crate::transport::{Message, Node, Publisher, TopicBus};

// --- Models and services ---
pub use crate::spherical::SphericalCoordinates;
pub use crate::sync::AtomicF64;
pub use crate::thrust::{propeller_omega, propeller_thrust};
