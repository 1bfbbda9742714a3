// tethys_core/src/transport/node.rs

use std::sync::Arc;

use super::bus::TopicBus;
use super::topic::Topic;
use super::Message;
use crate::error::TransportError;

/// A plugin's handle on the bus. Cheap to clone.
#[derive(Clone)]
pub struct Node {
    bus: Arc<TopicBus>,
}

impl Node {
    pub fn new(bus: Arc<TopicBus>) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &Arc<TopicBus> {
        &self.bus
    }

    /// Opens a publish handle on `topic`.
    pub fn advertise<T: Message>(&self, topic: &str) -> Result<Publisher<T>, TransportError> {
        let topic = self.bus.topic::<T>(topic)?;
        tracing::debug!("Advertised [{}]", topic.name());
        Ok(Publisher { topic })
    }

    /// Registers `callback` for every future message on `topic`. The callback
    /// runs on whichever thread publishes.
    pub fn subscribe<T, F>(&self, topic: &str, callback: F) -> Result<(), TransportError>
    where
        T: Message,
        F: Fn(&T) + Send + Sync + 'static,
    {
        let topic = self.bus.topic::<T>(topic)?;
        topic.subscribe(Arc::new(callback));
        tracing::debug!("Subscribed to [{}]", topic.name());
        Ok(())
    }
}

/// A typed publish handle. Cloning shares the underlying topic.
pub struct Publisher<T: Message> {
    topic: Arc<Topic<T>>,
}

impl<T: Message> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            topic: Arc::clone(&self.topic),
        }
    }
}

impl<T: Message> Publisher<T> {
    pub fn topic(&self) -> &str {
        self.topic.name()
    }

    /// Fire-and-forget send.
    pub fn publish(&self, message: T) {
        self.topic.publish(message);
    }
}

impl<T: Message> std::fmt::Debug for Publisher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher").field("topic", &self.topic()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::thread;

    #[test]
    fn subscriber_receives_what_publisher_sends() {
        let node = Node::new(Arc::new(TopicBus::new()));
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        node.subscribe("/cmd", move |value: &f64| sink.lock().unwrap().push(*value))
            .unwrap();

        let publisher = node.advertise::<f64>("cmd").unwrap();
        assert_eq!(publisher.topic(), "/cmd");
        publisher.publish(1.0);
        publisher.clone().publish(2.0);

        assert_eq!(*received.lock().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn publishing_from_another_thread_runs_callback_there() {
        let node = Node::new(Arc::new(TopicBus::new()));
        let main_thread = thread::current().id();
        let seen_on = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen_on);
        node.subscribe("/ping", move |_: &u32| {
            *sink.lock().unwrap() = Some(thread::current().id());
        })
        .unwrap();

        let publisher = node.advertise::<u32>("/ping").unwrap();
        thread::spawn(move || publisher.publish(1)).join().unwrap();

        let seen = seen_on.lock().unwrap().unwrap();
        assert_ne!(seen, main_thread);
    }

    #[test]
    fn nodes_on_one_bus_share_topics() {
        let bus = Arc::new(TopicBus::new());
        let a = Node::new(Arc::clone(&bus));
        let b = Node::new(Arc::clone(&bus));
        a.advertise::<i64>("/shared").unwrap().publish(9);
        assert_eq!(b.bus().messages::<i64>("/shared"), vec![9]);
    }
}
