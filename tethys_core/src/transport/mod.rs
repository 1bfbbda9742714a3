// tethys_core/src/transport/mod.rs

//! In-process publish/subscribe. Delivery is synchronous on the publishing
//! thread; there is no acknowledgement and no retry.

pub mod bus;
pub mod names;
pub mod node;
pub mod topic;

pub use bus::TopicBus;
pub use node::{Node, Publisher};
pub use topic::{StampedMessage, Topic};

/// Anything that can travel over a topic.
pub trait Message: Clone + Send + Sync + 'static {}
impl<T: Clone + Send + Sync + 'static> Message for T {}
