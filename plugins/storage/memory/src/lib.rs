use std::collections::{BTreeMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;

use chaincode_api::{KeyValue, StateAccessor, StateError, StateFactory, StateIterator};

// ═══════════════════════════════════════════════════════════════
//  MemoryStateConfig
// ═══════════════════════════════════════════════════════════════

/// Seed entries for `storage = "memory"`. Values are stored as UTF-8.
#[derive(Debug, Default, serde::Deserialize)]
pub struct MemoryStateConfig {
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

// ═══════════════════════════════════════════════════════════════
//  MemoryState
// ═══════════════════════════════════════════════════════════════

/// Ordered in-memory ledger state. Lost on restart.
#[derive(Clone, Default)]
pub struct MemoryState {
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    open_iterators: Arc<AtomicUsize>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: BTreeMap<String, Vec<u8>>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
            open_iterators: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of iterators opened and not yet closed.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Copy of every entry, for backends that persist the map.
    pub async fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.entries.read().await.clone()
    }

    async fn do_range(&self, start_key: &str, end_key: &str) -> MemoryIterator {
        let buf = self.entries.read().await;
        let items: VecDeque<KeyValue> = if start_key < end_key {
            buf.range(start_key.to_string()..end_key.to_string())
                .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
                .collect()
        } else {
            VecDeque::new()
        };
        self.open_iterators.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(start = %start_key, end = %end_key, entries = items.len(), "range scan opened");
        MemoryIterator {
            items,
            open_iterators: self.open_iterators.clone(),
        }
    }
}

impl StateAccessor for MemoryState {
    fn get(&self, key: &str) -> Pin<Box<dyn Future<Output = Result<Option<Vec<u8>>, StateError>> + Send + '_>> {
        let key = key.to_string();
        Box::pin(async move {
            let buf = self.entries.read().await;
            Ok(buf.get(&key).cloned())
        })
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Pin<Box<dyn Future<Output = Result<(), StateError>> + Send + '_>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut buf = self.entries.write().await;
            buf.insert(key, value);
            Ok(())
        })
    }

    fn range_scan(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Box<dyn StateIterator>, StateError>> + Send + '_>> {
        let start_key = start_key.to_string();
        let end_key = end_key.to_string();
        Box::pin(async move {
            let iter = self.do_range(&start_key, &end_key).await;
            Ok(Box::new(iter) as Box<dyn StateIterator>)
        })
    }
}

// ═══════════════════════════════════════════════════════════════
//  MemoryIterator
// ═══════════════════════════════════════════════════════════════

/// Snapshot of a key range taken when the scan was opened.
pub struct MemoryIterator {
    items: VecDeque<KeyValue>,
    open_iterators: Arc<AtomicUsize>,
}

impl StateIterator for MemoryIterator {
    fn next(&mut self) -> Pin<Box<dyn Future<Output = Result<Option<KeyValue>, StateError>> + Send + '_>> {
        Box::pin(async { Ok(self.items.pop_front()) })
    }

    fn close(self: Box<Self>) -> Pin<Box<dyn Future<Output = Result<(), StateError>> + Send>> {
        Box::pin(async move {
            self.open_iterators.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

// ═══════════════════════════════════════════════════════════════
//  MemoryStateFactory
// ═══════════════════════════════════════════════════════════════

pub struct MemoryStateFactory;

impl StateFactory for MemoryStateFactory {
    fn create(&self, config_json: &str) -> Result<Arc<dyn StateAccessor>, StateError> {
        let config: MemoryStateConfig = if config_json == "{}" {
            MemoryStateConfig::default()
        } else {
            serde_json::from_str(config_json)
                .map_err(|e| StateError::config(format!("memory state config: {e}")))?
        };
        let entries = config
            .entries
            .into_iter()
            .map(|(k, v)| (k, v.into_bytes()))
            .collect();
        Ok(Arc::new(MemoryState::from_entries(entries)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(state: &MemoryState, start: &str, end: &str) -> Vec<String> {
        let mut iter = state.range_scan(start, end).await.unwrap();
        let mut keys = Vec::new();
        while let Some(kv) = iter.next().await.unwrap() {
            keys.push(kv.key);
        }
        iter.close().await.unwrap();
        keys
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let state = MemoryState::new();
        assert_eq!(state.get("IMG0").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_overwrites() {
        let state = MemoryState::new();
        state.put("k", b"one".to_vec()).await.unwrap();
        state.put("k", b"two".to_vec()).await.unwrap();
        assert_eq!(state.get("k").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(state.len().await, 1);
    }

    #[tokio::test]
    async fn range_is_half_open_and_ordered() {
        let state = MemoryState::new();
        for key in ["IMG2", "IMG0", "IMG999", "IMG1", "ZZZ", "A"] {
            state.put(key, b"v".to_vec()).await.unwrap();
        }
        let keys = collect(&state, "IMG0", "IMG999").await;
        assert_eq!(keys, vec!["IMG0", "IMG1", "IMG2"]);
        assert_eq!(state.open_iterators(), 0);
    }

    #[tokio::test]
    async fn inverted_range_is_empty() {
        let state = MemoryState::new();
        state.put("b", b"v".to_vec()).await.unwrap();
        assert!(collect(&state, "z", "a").await.is_empty());
    }

    #[tokio::test]
    async fn open_iterators_tracks_close() {
        let state = MemoryState::new();
        let iter = state.range_scan("a", "z").await.unwrap();
        assert_eq!(state.open_iterators(), 1);
        iter.close().await.unwrap();
        assert_eq!(state.open_iterators(), 0);
    }

    #[tokio::test]
    async fn factory_seeds_entries() {
        let state = MemoryStateFactory
            .create(r#"{"entries":{"IMG7":"raw"}}"#)
            .unwrap();
        assert_eq!(state.get("IMG7").await.unwrap(), Some(b"raw".to_vec()));
        assert!(MemoryStateFactory.create("not json").is_err());
    }
}
