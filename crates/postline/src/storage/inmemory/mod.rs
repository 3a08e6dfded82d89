//! In-memory storage backend.
//!
//! Posts and comments live in `BTreeMap`s behind `Arc<RwLock<_>>`. Ids come
//! from atomic sequences and timestamps from the system clock, the same
//! things a relational store would assign.

mod repository;

pub use repository::InMemoryRepository;
