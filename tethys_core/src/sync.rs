// tethys_core/src/sync.rs

use std::sync::atomic::{AtomicU64, Ordering};

/// A lock-free `f64` cell with latest-value-wins semantics.
///
/// Writers and readers may live on different threads (a transport callback and
/// the simulation tick). The value is stored as its bit pattern so a read can
/// never observe half of a write.
#[derive(Debug, Default)]
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    pub fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    pub fn store(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn default_is_zero() {
        assert_eq!(AtomicF64::default().load(), 0.0);
    }

    #[test]
    fn last_store_wins() {
        let cell = AtomicF64::new(1.5);
        cell.store(0.25);
        cell.store(-3.0);
        assert_eq!(cell.load(), -3.0);
    }

    #[test]
    fn concurrent_writers_never_tear() {
        let cell = Arc::new(AtomicF64::new(0.0));
        let candidates = [1.0e-300, -7.25, 123456.789];

        let writers: Vec<_> = candidates
            .iter()
            .map(|&value| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    for _ in 0..10_000 {
                        cell.store(value);
                    }
                })
            })
            .collect();

        for _ in 0..10_000 {
            let seen = cell.load();
            assert!(seen == 0.0 || candidates.contains(&seen));
        }
        for writer in writers {
            writer.join().unwrap();
        }
    }
}
