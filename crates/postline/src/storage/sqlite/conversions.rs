//! SQLite row conversion functions.
//!
//! Timestamps are stored as RFC 3339 text with a fixed microsecond precision
//! and `Z` suffix, so lexical order matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;

use postline_core::comment::Comment;
use postline_core::post::Post;

/// Convert a SQLite row to a Post.
///
/// Expected columns: id, title, content, owner_id, owner_name, created_at, updated_at
pub fn row_to_post(row: &Row) -> rusqlite::Result<Post> {
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        owner_id: row.get(3)?,
        owner_name: row.get(4)?,
        created_at: parse_datetime(5, &created_at)?,
        updated_at: parse_datetime(6, &updated_at)?,
    })
}

/// Convert a SQLite row to a Comment.
///
/// Expected columns: id, post_id, owner_id, owner_name, content, secret_hash, created_at, updated_at
pub fn row_to_comment(row: &Row) -> rusqlite::Result<Comment> {
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        owner_id: row.get(2)?,
        owner_name: row.get(3)?,
        content: row.get(4)?,
        secret_hash: row.get(5)?,
        created_at: parse_datetime(6, &created_at)?,
        updated_at: parse_datetime(7, &updated_at)?,
    })
}

fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

/// Format a DateTime for SQLite storage.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time truncated to the stored precision, so returned values equal re-read ones.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::parse_from_rfc3339(&format_datetime(&now))
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now)
}
