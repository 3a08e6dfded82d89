//! Post and comment services.
//!
//! Services own the write paths and the cache-aside read paths. The primary
//! store is authoritative; cache and event-bus failures are logged and never
//! reach the caller.

mod comment;
mod error;
mod post;

pub use comment::CommentService;
pub use error::{Result, ServiceError};
pub use post::PostService;

use postline_core::events::{DomainEvent, EventBus};

#[cfg(all(test, feature = "memory"))]
pub(crate) mod testing;

/// Publishes `event` under its topic and key. Failures are logged only.
async fn publish(events: &dyn EventBus, event: DomainEvent) {
    let payload = match event.to_bytes() {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(topic = event.topic(), error = %err, "Failed to encode event");
            return;
        }
    };

    if let Err(err) = events.publish(event.topic(), &event.key(), &payload).await {
        tracing::warn!(topic = event.topic(), key = %event.key(), error = %err, "Failed to publish event");
    }
}
