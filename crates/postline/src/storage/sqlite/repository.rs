//! SQLite repository implementation.
//!
//! Implements the repository traits from `postline_core::storage` using SQLite.

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use postline_core::comment::{Comment, NewComment};
use postline_core::post::{NewPost, Post};
use postline_core::storage::{CommentRepository, PostRepository, RepositoryError, Result};

use super::conversions::{format_datetime, now, row_to_comment, row_to_post};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository for posts and comments.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (or creates) a file-based database and ensures the schema exists.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a repository backed by an in-memory database.
    ///
    /// Data is lost when the connection is dropped.
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl PostRepository for SqliteRepository {
    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let created_at = now();
        let timestamp = format_datetime(&created_at);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_POST,
                    rusqlite::params![
                        post.title,
                        post.content,
                        post.owner_id,
                        post.owner_name,
                        timestamp,
                        timestamp
                    ],
                )
                .map_err(wrap_err)?;

                let id = conn.last_insert_rowid();
                Ok(post.into_post(id, created_at))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Post", "new"))
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_POST_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([id], row_to_post) {
                    Ok(post) => Ok(Some(post)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Post", id.to_string()))
    }

    async fn post_exists(&self, id: i64) -> Result<bool> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::POST_EXISTS, [id], |row| row.get(0))
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Post", id.to_string()))
    }

    async fn delete_post(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_POST, [id]).map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Post", id.to_string()))
    }

    async fn list_posts_newest_first(&self, page: u32, size: u32) -> Result<(Vec<Post>, u64)> {
        let limit = i64::from(size);
        let offset = i64::from(page) * i64::from(size);

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let total: i64 = tx
                    .query_row(schema::COUNT_POSTS, [], |row| row.get(0))
                    .map_err(wrap_err)?;

                let posts = {
                    let mut stmt = tx
                        .prepare(schema::SELECT_POSTS_NEWEST_FIRST)
                        .map_err(wrap_err)?;
                    let rows = stmt
                        .query_map([limit, offset], row_to_post)
                        .map_err(wrap_err)?;

                    let mut posts = Vec::new();
                    for row_result in rows {
                        posts.push(row_result.map_err(wrap_err)?);
                    }
                    posts
                };

                tx.commit().map_err(wrap_err)?;
                Ok((posts, total.max(0) as u64))
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn count_posts(&self) -> Result<u64> {
        self.conn
            .call(|conn| {
                let total: i64 = conn
                    .query_row(schema::COUNT_POSTS, [], |row| row.get(0))
                    .map_err(wrap_err)?;
                Ok(total.max(0) as u64)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl CommentRepository for SqliteRepository {
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        let created_at = now();
        let timestamp = format_datetime(&created_at);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_COMMENT,
                    rusqlite::params![
                        comment.post_id,
                        comment.owner_id,
                        comment.owner_name,
                        comment.content,
                        comment.secret_hash,
                        timestamp,
                        timestamp
                    ],
                )
                .map_err(wrap_err)?;

                let id = conn.last_insert_rowid();
                Ok(comment.into_comment(id, created_at))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Comment", "new"))
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_COMMENT_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([id], row_to_comment) {
                    Ok(comment) => Ok(Some(comment)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Comment", id.to_string()))
    }

    async fn update_comment_content(&self, id: i64, content: &str) -> Result<Comment> {
        let content = content.to_string();
        let updated_at = format_datetime(&now());

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_COMMENT_CONTENT,
                        rusqlite::params![id, content, updated_at],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }

                conn.query_row(schema::SELECT_COMMENT_BY_ID, [id], row_to_comment)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Comment", id.to_string()))
    }

    async fn delete_comment(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_COMMENT, [id]).map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Comment", id.to_string()))
    }

    async fn list_comments_by_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_COMMENTS_BY_POST)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([post_id], row_to_comment)
                    .map_err(wrap_err)?;

                let mut comments = Vec::new();
                for row_result in rows {
                    comments.push(row_result.map_err(wrap_err)?);
                }
                Ok(comments)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}
