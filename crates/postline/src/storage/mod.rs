//! Primary-store backends.
//!
//! Implementations of the repository traits in `postline_core::storage`,
//! selected at compile time:
//!
//! - `inmemory` (default): process-local maps, data is lost on restart
//! - `sqlite`: SQLite via `rusqlite` and `tokio-rusqlite`
//!
//! The two features are mutually exclusive.

#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!(
    "Features 'sqlite' and 'inmemory' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p postline --no-default-features --features sqlite,memory"
);

// The in-memory backend also backs unit tests of the higher layers.
#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "inmemory", test))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
