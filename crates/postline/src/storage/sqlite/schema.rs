//! SQLite schema definitions and SQL query constants.

/// Creates all tables and indexes.
///
/// Comments carry no foreign key to posts: deleting a post leaves its
/// comments in place.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    owner_id INTEGER NOT NULL,
    owner_name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id INTEGER NOT NULL,
    owner_id INTEGER NOT NULL,
    owner_name TEXT NOT NULL,
    content TEXT NOT NULL,
    secret_hash TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_posts_created ON posts(created_at DESC, id DESC);
CREATE INDEX IF NOT EXISTS idx_comments_post_created ON comments(post_id, created_at DESC);
"#;

// Post queries
pub const INSERT_POST: &str = r#"
INSERT INTO posts (title, content, owner_id, owner_name, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_POST_BY_ID: &str = r#"
SELECT id, title, content, owner_id, owner_name, created_at, updated_at
FROM posts
WHERE id = ?1
"#;

pub const POST_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?1)";

pub const DELETE_POST: &str = "DELETE FROM posts WHERE id = ?1";

pub const SELECT_POSTS_NEWEST_FIRST: &str = r#"
SELECT id, title, content, owner_id, owner_name, created_at, updated_at
FROM posts
ORDER BY created_at DESC, id DESC
LIMIT ?1 OFFSET ?2
"#;

pub const COUNT_POSTS: &str = "SELECT COUNT(*) FROM posts";

// Comment queries
pub const INSERT_COMMENT: &str = r#"
INSERT INTO comments (post_id, owner_id, owner_name, content, secret_hash, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_COMMENT_BY_ID: &str = r#"
SELECT id, post_id, owner_id, owner_name, content, secret_hash, created_at, updated_at
FROM comments
WHERE id = ?1
"#;

pub const UPDATE_COMMENT_CONTENT: &str = r#"
UPDATE comments
SET content = ?2, updated_at = ?3
WHERE id = ?1
"#;

pub const DELETE_COMMENT: &str = "DELETE FROM comments WHERE id = ?1";

pub const SELECT_COMMENTS_BY_POST: &str = r#"
SELECT id, post_id, owner_id, owner_name, content, secret_hash, created_at, updated_at
FROM comments
WHERE post_id = ?1
ORDER BY created_at DESC, id DESC
"#;
