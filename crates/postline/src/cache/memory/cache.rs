//! In-memory cache implementation.
//!
//! Plain values live in an LRU store with lazily expired TTLs. Sorted sets
//! and lists live in a separate keyspace and behave like their Redis
//! counterparts, including `WRONGTYPE` errors when a key is reused across
//! structures.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use postline_core::cache::{
    normalize_range, Cache, CacheError, ListCache, Result, SortedSetCache,
};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// Members ordered by `(score, member)`, the order Redis uses.
#[derive(Debug, Default)]
struct SortedSet {
    scores: HashMap<String, i64>,
    ordered: BTreeSet<(i64, String)>,
}

impl SortedSet {
    fn insert(&mut self, member: &str, score: i64) {
        if let Some(previous) = self.scores.insert(member.to_string(), score) {
            self.ordered.remove(&(previous, member.to_string()));
        }
        self.ordered.insert((score, member.to_string()));
    }

    fn remove(&mut self, member: &str) -> bool {
        match self.scores.remove(member) {
            Some(score) => self.ordered.remove(&(score, member.to_string())),
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.ordered.len()
    }
}

#[derive(Debug)]
enum Structure {
    SortedSet(SortedSet),
    List(VecDeque<String>),
}

/// In-memory cache with LRU eviction for values.
///
/// Cloning is cheap; clones share the same storage.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    values: Arc<RwLock<LruCache<String, CacheEntry>>>,
    structures: Arc<RwLock<HashMap<String, Structure>>>,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_entries` plain values.
    pub fn new(max_entries: NonZeroUsize) -> Self {
        Self {
            values: Arc::new(RwLock::new(LruCache::new(max_entries))),
            structures: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn wrong_type(key: &str) -> CacheError {
    CacheError::WrongType {
        key: key.to_string(),
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut values = self.values.write().await;

        let expired = match values.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            values.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut values = self.values.write().await;
        values.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.values.write().await.pop(key);
        self.structures.write().await.remove(key);
        Ok(())
    }
}

#[async_trait]
impl SortedSetCache for MemoryCache {
    async fn zadd(&self, key: &str, member: &str, score: i64) -> Result<()> {
        let mut structures = self.structures.write().await;
        let structure = structures
            .entry(key.to_string())
            .or_insert_with(|| Structure::SortedSet(SortedSet::default()));

        match structure {
            Structure::SortedSet(set) => {
                set.insert(member, score);
                Ok(())
            }
            Structure::List(_) => Err(wrong_type(key)),
        }
    }

    async fn zrevrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let structures = self.structures.read().await;
        let set = match structures.get(key) {
            Some(Structure::SortedSet(set)) => set,
            Some(Structure::List(_)) => return Err(wrong_type(key)),
            None => return Ok(Vec::new()),
        };

        let Some((start, stop)) = normalize_range(set.len(), start, stop) else {
            return Ok(Vec::new());
        };

        Ok(set
            .ordered
            .iter()
            .rev()
            .skip(start)
            .take(stop - start + 1)
            .map(|(_, member)| member.clone())
            .collect())
    }

    async fn zrange_all(&self, key: &str) -> Result<Vec<String>> {
        let structures = self.structures.read().await;
        match structures.get(key) {
            Some(Structure::SortedSet(set)) => {
                Ok(set.ordered.iter().map(|(_, m)| m.clone()).collect())
            }
            Some(Structure::List(_)) => Err(wrong_type(key)),
            None => Ok(Vec::new()),
        }
    }

    async fn zrem_range_by_score(&self, key: &str, min: i64, max: i64) -> Result<u64> {
        let mut structures = self.structures.write().await;
        let set = match structures.get_mut(key) {
            Some(Structure::SortedSet(set)) => set,
            Some(Structure::List(_)) => return Err(wrong_type(key)),
            None => return Ok(0),
        };

        let doomed: Vec<String> = set
            .ordered
            .iter()
            .skip_while(|(score, _)| *score < min)
            .take_while(|(score, _)| *score <= max)
            .map(|(_, member)| member.clone())
            .collect();

        for member in &doomed {
            set.remove(member);
        }
        if set.len() == 0 {
            structures.remove(key);
        }
        Ok(doomed.len() as u64)
    }

    async fn zrem(&self, key: &str, member: &str) -> Result<bool> {
        let mut structures = self.structures.write().await;
        let set = match structures.get_mut(key) {
            Some(Structure::SortedSet(set)) => set,
            Some(Structure::List(_)) => return Err(wrong_type(key)),
            None => return Ok(false),
        };

        let removed = set.remove(member);
        if set.len() == 0 {
            structures.remove(key);
        }
        Ok(removed)
    }
}

#[async_trait]
impl ListCache for MemoryCache {
    async fn lpush(&self, key: &str, value: &str) -> Result<u64> {
        let mut structures = self.structures.write().await;
        let structure = structures
            .entry(key.to_string())
            .or_insert_with(|| Structure::List(VecDeque::new()));

        match structure {
            Structure::List(list) => {
                list.push_front(value.to_string());
                Ok(list.len() as u64)
            }
            Structure::SortedSet(_) => Err(wrong_type(key)),
        }
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let structures = self.structures.read().await;
        let list = match structures.get(key) {
            Some(Structure::List(list)) => list,
            Some(Structure::SortedSet(_)) => return Err(wrong_type(key)),
            None => return Ok(Vec::new()),
        };

        Ok(match normalize_range(list.len(), start, stop) {
            Some((start, stop)) => list.range(start..=stop).cloned().collect(),
            None => Vec::new(),
        })
    }

    async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<()> {
        let mut structures = self.structures.write().await;
        let list = match structures.get_mut(key) {
            Some(Structure::List(list)) => list,
            Some(Structure::SortedSet(_)) => return Err(wrong_type(key)),
            None => return Ok(()),
        };

        match normalize_range(list.len(), start, stop) {
            Some((start, stop)) => {
                list.truncate(stop + 1);
                list.drain(..start);
            }
            None => {
                structures.remove(key);
            }
        }
        Ok(())
    }

    async fn lrem(&self, key: &str, value: &str) -> Result<bool> {
        let mut structures = self.structures.write().await;
        let list = match structures.get_mut(key) {
            Some(Structure::List(list)) => list,
            Some(Structure::SortedSet(_)) => return Err(wrong_type(key)),
            None => return Ok(false),
        };

        let Some(index) = list.iter().position(|item| item == value) else {
            return Ok(false);
        };
        list.remove(index);
        if list.is_empty() {
            structures.remove(key);
        }
        Ok(true)
    }
}
