// tethys_core/src/error.rs

use thiserror::Error;

/// Failures raised while opening publish/subscribe handles on a `TopicBus`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("invalid topic name [{0}]")]
    InvalidTopic(String),

    #[error("topic [{topic}] carries `{existing}`, cannot open it as `{requested}`")]
    TypeMismatch {
        topic: String,
        existing: &'static str,
        requested: &'static str,
    },
}
