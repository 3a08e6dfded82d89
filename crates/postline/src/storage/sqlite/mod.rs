//! SQLite storage backend.
//!
//! Uses `rusqlite` for the queries and `tokio-rusqlite` to run them on a
//! dedicated thread. The schema is created when the repository is opened.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
