// tethys_sim/src/simulation/plugins/vehicles/mod.rs

pub mod auv;
