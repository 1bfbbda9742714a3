// tethys_core/src/lib.rs

// This file defines the public modules of the library. Nothing in here knows
// about the ECS host; `tethys_sim` is the adapter crate.
pub mod config;
pub mod error;
pub mod messages;
pub mod prelude;
pub mod spherical;
pub mod sync;
pub mod thrust;
pub mod transport;
