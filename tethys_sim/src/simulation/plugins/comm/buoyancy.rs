// tethys_sim/src/simulation/plugins/comm/buoyancy.rs

use std::sync::Arc;

use tethys_core::messages::Double;
use tethys_core::sync::AtomicF64;

/// Latest bladder volume reported by the buoyancy engine.
///
/// Written from the transport callback, read from the tick. Clones share the
/// same cell.
#[derive(Debug, Clone, Default)]
pub struct BuoyancyTracker {
    volume: Arc<AtomicF64>,
}

impl BuoyancyTracker {
    pub fn on_state(&self, msg: &Double) {
        self.volume.store(msg.data);
    }

    pub fn volume(&self) -> f64 {
        self.volume.load()
    }
}
