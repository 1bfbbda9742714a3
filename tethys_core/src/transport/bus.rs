// tethys_core/src/transport/bus.rs

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::names::fully_qualified;
use super::topic::{AnyTopic, Topic};
use super::Message;
use crate::error::TransportError;

pub const DEFAULT_HISTORY: usize = 256;

/// Everything the bus knows about one topic.
struct TopicInfo {
    topic: Arc<dyn AnyTopic>,
    type_id: TypeId,
    type_name: &'static str,
}

/// The process-wide topic registry. Share it with `Arc`; every `Node` built
/// from the same bus talks to the same topics.
pub struct TopicBus {
    topics: RwLock<HashMap<String, TopicInfo>>,
    history: usize,
}

impl Default for TopicBus {
    fn default() -> Self {
        Self::with_history(DEFAULT_HISTORY)
    }
}

impl TopicBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// `history` is the number of messages each topic retains for inspection.
    pub fn with_history(history: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            history,
        }
    }

    /// Returns the topic called `name`, creating it on first use.
    pub fn topic<T: Message>(&self, name: &str) -> Result<Arc<Topic<T>>, TransportError> {
        let name = fully_qualified(name)?;

        if let Some(existing) = self.lookup::<T>(&name)? {
            return Ok(existing);
        }

        let mut topics = self.topics.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have created it between the two locks.
        if let Some(info) = topics.get(&name) {
            return Self::downcast::<T>(&name, info);
        }
        let topic = Arc::new(Topic::<T>::new(&name, self.history));
        topics.insert(
            name,
            TopicInfo {
                topic: topic.clone(),
                type_id: TypeId::of::<T>(),
                type_name: type_name::<T>(),
            },
        );
        Ok(topic)
    }

    /// Copies of the retained messages on `name`. Unknown or mistyped topics
    /// read as empty.
    pub fn messages<T: Message>(&self, name: &str) -> Vec<T> {
        fully_qualified(name)
            .ok()
            .and_then(|name| self.lookup::<T>(&name).ok().flatten())
            .map(|topic| topic.history())
            .unwrap_or_default()
    }

    /// Total number of messages published on `name` so far.
    pub fn message_count(&self, name: &str) -> usize {
        let Ok(name) = fully_qualified(name) else {
            return 0;
        };
        self.topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&name)
            .map(|info| info.topic.message_count())
            .unwrap_or(0)
    }

    pub fn subscriber_count(&self, name: &str) -> usize {
        let Ok(name) = fully_qualified(name) else {
            return 0;
        };
        self.topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&name)
            .map(|info| info.topic.subscriber_count())
            .unwrap_or(0)
    }

    pub fn topic_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    fn lookup<T: Message>(&self, name: &str) -> Result<Option<Arc<Topic<T>>>, TransportError> {
        let topics = self.topics.read().unwrap_or_else(PoisonError::into_inner);
        topics
            .get(name)
            .map(|info| Self::downcast::<T>(name, info))
            .transpose()
    }

    fn downcast<T: Message>(name: &str, info: &TopicInfo) -> Result<Arc<Topic<T>>, TransportError> {
        if info.type_id != TypeId::of::<T>() {
            return Err(TransportError::TypeMismatch {
                topic: name.to_string(),
                existing: info.type_name,
                requested: type_name::<T>(),
            });
        }
        info.topic
            .clone()
            .downcast_arc::<Topic<T>>()
            .map_err(|_| TransportError::TypeMismatch {
                topic: name.to_string(),
                existing: info.type_name,
                requested: type_name::<T>(),
            })
    }
}
