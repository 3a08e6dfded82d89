//! Domain events published after successful writes.

mod topics;
mod traits;
mod types;

pub use topics::{
    ALL_TOPICS, COMMENT_CREATED, COMMENT_DELETED, COMMENT_UPDATED, POST_CREATED, POST_DELETED,
};
pub use traits::{decode_frame, encode_frame, BusMessage, EventBus};
pub use types::DomainEvent;
