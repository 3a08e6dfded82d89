//! Redis pub/sub event bus.
//!
//! Each topic maps to the channel `events:{topic}`. Messages are framed as
//! `{key}\n{payload}`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use redis::AsyncCommands;
use tokio::sync::{broadcast, RwLock};

use postline_core::cache::{event_channel, CacheError, Result};
use postline_core::events::{decode_frame, encode_frame, BusMessage, EventBus};

use super::error::map_redis_error;

type Subscriptions = Arc<RwLock<HashMap<String, broadcast::Sender<BusMessage>>>>;

pub struct RedisEventBus {
    client: redis::Client,
    conn: redis::aio::ConnectionManager,
    subscriptions: Subscriptions,
}

impl RedisEventBus {
    /// Connects to Redis.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client.clone())
            .await
            .map_err(map_redis_error)?;

        Ok(Self {
            client,
            conn,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
        })
    }
}

#[async_trait]
impl EventBus for RedisEventBus {
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(event_channel(topic), encode_frame(key, payload))
            .await
            .map_err(|e| CacheError::PublishFailed(e.to_string()))?;
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<broadcast::Receiver<BusMessage>> {
        {
            let subscriptions = self.subscriptions.read().await;
            if let Some(sender) = subscriptions.get(topic) {
                return Ok(sender.subscribe());
            }
        }

        let (tx, rx) = broadcast::channel(100);
        {
            let mut subscriptions = self.subscriptions.write().await;
            if let Some(sender) = subscriptions.get(topic) {
                return Ok(sender.subscribe());
            }
            subscriptions.insert(topic.to_string(), tx.clone());
        }

        let client = self.client.clone();
        let topic = topic.to_string();
        let subscriptions = Arc::clone(&self.subscriptions);

        tokio::spawn(async move {
            if let Err(err) = run_subscription_loop(client, &topic, tx).await {
                tracing::error!(topic = %topic, error = %err, "Redis subscription failed");
            }
            subscriptions.write().await.remove(&topic);
        });

        Ok(rx)
    }
}

/// Forwards messages from the Redis channel of `topic` to the broadcast channel
/// until the last receiver is dropped.
async fn run_subscription_loop(
    client: redis::Client,
    topic: &str,
    tx: broadcast::Sender<BusMessage>,
) -> Result<()> {
    let mut pubsub = client.get_async_pubsub().await.map_err(map_redis_error)?;
    pubsub
        .subscribe(event_channel(topic))
        .await
        .map_err(map_redis_error)?;

    let mut stream = pubsub.on_message();

    while let Some(msg) = stream.next().await {
        let frame: Vec<u8> = msg.get_payload().map_err(map_redis_error)?;

        match decode_frame(&frame) {
            Some((key, payload)) => {
                // Ignore send errors (no receivers left).
                let _ = tx.send(BusMessage {
                    topic: topic.to_string(),
                    key,
                    payload,
                });
            }
            None => {
                tracing::warn!(topic = %topic, "Dropping unframed event message");
            }
        }

        if tx.receiver_count() == 0 {
            break;
        }
    }

    tracing::info!(topic = %topic, "Redis subscription stream ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use uuid::Uuid;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    /// Skip test if Redis not available.
    async fn get_test_bus() -> Option<RedisEventBus> {
        RedisEventBus::new(&redis_url()).await.ok()
    }

    #[tokio::test]
    async fn test_redis_publish_and_subscribe() {
        let Some(bus) = get_test_bus().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let topic = format!("test.{}", Uuid::new_v4());
        let mut receiver = bus.subscribe(&topic).await.unwrap();

        // Give the subscription loop time to attach.
        tokio::time::sleep(Duration::from_millis(100)).await;
        bus.publish(&topic, "42", b"{\"postId\":42}").await.unwrap();

        let message = tokio::time::timeout(Duration::from_secs(2), receiver.recv())
            .await
            .expect("timed out waiting for message")
            .unwrap();
        assert_eq!(message.key, "42");
        assert_eq!(message.payload, b"{\"postId\":42}".to_vec());
    }

    #[tokio::test]
    async fn test_redis_publish_without_subscribers() {
        let Some(bus) = get_test_bus().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        assert!(bus.publish("test.nobody", "1", b"{}").await.is_ok());
    }
}
