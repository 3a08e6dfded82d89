use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::cache::Result;

/// A message as seen by bus subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    pub topic: String,
    pub key: String,
    pub payload: Vec<u8>,
}

/// Fire-and-forget publish channel for domain events.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publishes `payload` on `topic`. No delivery confirmation is awaited.
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<()>;

    /// Subscribes to every message published on `topic` from now on.
    async fn subscribe(&self, topic: &str) -> Result<broadcast::Receiver<BusMessage>>;
}

/// Frames a key and payload into one wire message (`{key}\n{payload}`).
pub fn encode_frame(key: &str, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(key.len() + 1 + payload.len());
    frame.extend_from_slice(key.as_bytes());
    frame.push(b'\n');
    frame.extend_from_slice(payload);
    frame
}

/// Splits a frame produced by [`encode_frame`]. Returns `None` when the frame has no key.
pub fn decode_frame(frame: &[u8]) -> Option<(String, Vec<u8>)> {
    let split = frame.iter().position(|b| *b == b'\n')?;
    let key = std::str::from_utf8(&frame[..split]).ok()?;
    Some((key.to_string(), frame[split + 1..].to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_keeps_newlines_in_payload() {
        let frame = encode_frame("42", b"{\"a\":\n1}");
        assert_eq!(
            decode_frame(&frame),
            Some(("42".to_string(), b"{\"a\":\n1}".to_vec()))
        );
    }

    #[test]
    fn test_decode_frame_without_separator() {
        assert_eq!(decode_frame(b"no separator"), None);
    }
}
