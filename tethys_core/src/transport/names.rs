// tethys_core/src/transport/names.rs

use crate::error::TransportError;

/// Turns an arbitrary string into a usable topic name, or `None` when nothing
/// usable is left.
pub fn as_valid_topic(raw: &str) -> Option<String> {
    let cleaned = raw.trim().replace(":=", "").replace('@', "");
    let mut topic = String::with_capacity(cleaned.len());
    for c in cleaned.chars() {
        let c = if c.is_whitespace() { '_' } else { c };
        if c == '/' && topic.ends_with('/') {
            continue;
        }
        topic.push(c);
    }
    while topic.len() > 1 && topic.ends_with('/') {
        topic.pop();
    }
    is_valid_topic(&topic).then_some(topic)
}

/// Strict check used when opening a handle. Names are never rewritten here.
pub fn is_valid_topic(name: &str) -> bool {
    !name.is_empty()
        && name != "/"
        && !name.contains("//")
        && !name.contains('@')
        && !name.contains(":=")
        && !name.chars().any(char::is_whitespace)
        && !(name.len() > 1 && name.ends_with('/'))
}

/// Validates `name` and anchors it at the root: `a/b` becomes `/a/b`.
pub fn fully_qualified(name: &str) -> Result<String, TransportError> {
    if !is_valid_topic(name) {
        return Err(TransportError::InvalidTopic(name.to_string()));
    }
    if name.starts_with('/') {
        Ok(name.to_string())
    } else {
        Ok(format!("/{name}"))
    }
}

/// `/model/<namespace>/joint/<channel>`
pub fn joint_topic(namespace: &str, channel: &str) -> Option<String> {
    as_valid_topic(&format!("/model/{namespace}/joint/{channel}"))
}

/// `/model/<namespace>/<channel>`
pub fn model_topic(namespace: &str, channel: &str) -> Option<String> {
    as_valid_topic(&format!("/model/{namespace}/{channel}"))
}
