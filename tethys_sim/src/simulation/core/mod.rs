// tethys_sim/src/simulation/core/mod.rs

pub mod clock;
pub mod components;
pub mod model;
pub mod simulation_setup;
pub mod system;
