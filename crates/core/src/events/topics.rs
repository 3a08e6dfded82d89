pub const POST_CREATED: &str = "post.created";
pub const POST_DELETED: &str = "post.deleted";
pub const COMMENT_CREATED: &str = "comment.created";
pub const COMMENT_UPDATED: &str = "comment.updated";
pub const COMMENT_DELETED: &str = "comment.deleted";

pub const ALL_TOPICS: [&str; 5] = [
    POST_CREATED,
    POST_DELETED,
    COMMENT_CREATED,
    COMMENT_UPDATED,
    COMMENT_DELETED,
];
