// tethys_sim/src/simulation/plugins/mod.rs

pub mod actuators;
pub mod comm;
pub mod vehicles;
pub mod world;
