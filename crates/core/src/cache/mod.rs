mod error;
mod keys;
mod range;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{
    comment_list_key, event_channel, post_key, user_token_key, RECENT_POSTS_KEY,
    RECENT_POST_LIST_KEY,
};
pub use range::normalize_range;
pub use serialization::{
    decode_recent_member, deserialize_comments, deserialize_post, encode_recent_member,
    recent_member_id, serialize_comments, serialize_post, SerializationError,
};
pub use traits::{Cache, FullCache, ListCache, SortedSetCache};
