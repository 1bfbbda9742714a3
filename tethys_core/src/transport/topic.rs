// tethys_core/src/transport/topic.rs

use downcast_rs::{impl_downcast, DowncastSync};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use super::Message;

// --- Trait for Type-Erased Topics ---
/// Lets topics of different message types live in one registry.
pub trait AnyTopic: DowncastSync {
    fn message_count(&self) -> usize;
    fn subscriber_count(&self) -> usize;
}
impl_downcast!(sync AnyTopic);

pub type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A message as recorded in a topic's history.
#[derive(Clone, Debug)]
pub struct StampedMessage<T> {
    pub id: u64,
    pub message: T,
}

/// A single named channel: bounded history plus the subscriber callbacks.
pub struct Topic<T: Message> {
    name: String,
    history: Mutex<VecDeque<StampedMessage<T>>>,
    subscribers: RwLock<Vec<Callback<T>>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl<T: Message> Topic<T> {
    pub fn new(name: &str, capacity: usize) -> Self {
        Self {
            name: name.to_string(),
            history: Mutex::new(VecDeque::with_capacity(capacity)),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
            capacity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records `message` and hands it to every subscriber on the calling
    /// thread. Returns the id assigned to the message.
    pub fn publish(&self, message: T) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        // Snapshot the callbacks so a subscriber may subscribe or publish
        // from inside its own callback.
        let subscribers: Vec<Callback<T>> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            if self.capacity > 0 {
                if history.len() >= self.capacity {
                    history.pop_front();
                }
                history.push_back(StampedMessage {
                    id,
                    message: message.clone(),
                });
            }
        }

        for callback in &subscribers {
            callback(&message);
        }
        id
    }

    pub fn subscribe(&self, callback: Callback<T>) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(callback);
    }

    /// Copies of the retained messages, oldest first.
    pub fn history(&self) -> Vec<T> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|stamped| stamped.message.clone())
            .collect()
    }

    pub fn latest(&self) -> Option<StampedMessage<T>> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }

    /// Total number of messages ever published, including evicted ones.
    pub fn published(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }
}

impl<T: Message> AnyTopic for Topic<T> {
    fn message_count(&self) -> usize {
        self.published() as usize
    }

    fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
