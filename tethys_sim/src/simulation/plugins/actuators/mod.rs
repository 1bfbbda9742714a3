// tethys_sim/src/simulation/plugins/actuators/mod.rs

//! Actuators that turn setpoint topics into component writes before physics runs.

pub mod joint_position;
pub mod thruster;

pub use joint_position::JointPositionController;
pub use thruster::Thruster;
