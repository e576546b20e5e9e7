//! Key-value repositories for generation records and suite results

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::trace;

/// A keyed repository. Implementations must tolerate concurrent readers and writers.
#[async_trait]
pub trait Store<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    async fn insert(&self, id: String, value: V);

    async fn get(&self, id: &str) -> Option<V>;

    async fn remove(&self, id: &str) -> Option<V>;

    /// Number of live entries
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

struct Entry<V> {
    value: V,
    inserted: Instant,
}

/// Process-local store with optional time-to-live.
///
/// Expired entries are invisible to readers and dropped on the next write.
pub struct InMemoryStore<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    ttl: Option<Duration>,
}

impl<V> InMemoryStore<V> {
    #[must_use]
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_live(&self, entry: &Entry<V>, now: Instant) -> bool {
        self.ttl
            .is_none_or(|ttl| now.duration_since(entry.inserted) < ttl)
    }
}

impl<V> Default for InMemoryStore<V> {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl<V> Store<V> for InMemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn insert(&self, id: String, value: V) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        if self.ttl.is_some() {
            let before = entries.len();
            entries.retain(|_, entry| self.is_live(entry, now));
            let evicted = before - entries.len();
            if evicted > 0 {
                trace!(target: "apiprobe::store", evicted, "Evicted expired entries");
            }
        }
        entries.insert(
            id,
            Entry {
                value,
                inserted: now,
            },
        );
    }

    async fn get(&self, id: &str) -> Option<V> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(id)
            .filter(|entry| self.is_live(entry, now))
            .map(|entry| entry.value.clone())
    }

    async fn remove(&self, id: &str) -> Option<V> {
        let now = Instant::now();
        self.entries
            .write()
            .await
            .remove(id)
            .filter(|entry| self.is_live(entry, now))
            .map(|entry| entry.value)
    }

    async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| self.is_live(entry, now))
            .count()
    }
}
