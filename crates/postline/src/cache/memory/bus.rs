//! In-memory event bus using tokio broadcast channels, one per topic.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use postline_core::cache::Result;
use postline_core::events::{BusMessage, EventBus};

/// Channel capacity per topic.
const CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct MemoryEventBus {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<BusMessage>>>>,
}

impl MemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    async fn get_or_create_channel(&self, topic: &str) -> broadcast::Sender<BusMessage> {
        {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(topic) {
                return sender.clone();
            }
        }

        let mut channels = self.channels.write().await;
        channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<()> {
        let sender = self.get_or_create_channel(topic).await;

        // No receivers is not an error: nobody listens to this topic yet.
        let _ = sender.send(BusMessage {
            topic: topic.to_string(),
            key: key.to_string(),
            payload: payload.to_vec(),
        });

        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<broadcast::Receiver<BusMessage>> {
        let sender = self.get_or_create_channel(topic).await;
        Ok(sender.subscribe())
    }
}
