use drill_schema::{Channel, Millis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapEvent {
    /// Clock time (ms) when the tap was received.
    pub timestamp_ms: Millis,
    pub channel: Channel,
}

impl TapEvent {
    pub fn new(timestamp_ms: Millis, channel: Channel) -> Self {
        Self {
            timestamp_ms,
            channel,
        }
    }
}

/// Default keyboard layout: `z` is the left pad, `x` the right one.
pub fn key_to_channel(key: &str) -> Option<Channel> {
    match key.trim().to_ascii_lowercase().as_str() {
        "z" | "l" | "left" => Some(Channel::Left),
        "x" | "r" | "right" => Some(Channel::Right),
        _ => None,
    }
}
