use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::StateError;

// ════════════════════════════════════════════════════════════════
//  KeyValue
// ════════════════════════════════════════════════════════════════

/// One entry yielded by a range scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self { key: key.into(), value }
    }
}

// ════════════════════════════════════════════════════════════════
//  State Accessor Traits
// ════════════════════════════════════════════════════════════════

/// Ordered cursor over a key range, ascending by key.
///
/// Must be closed exactly once via `close()`. Backends release
/// host-side capacity on close, so dropping without closing leaks.
pub trait StateIterator: Send {
    /// Next entry, or `None` once the range is exhausted.
    fn next(&mut self) -> Pin<Box<dyn Future<Output = Result<Option<KeyValue>, StateError>> + Send + '_>>;

    /// Release the iterator.
    fn close(self: Box<Self>) -> Pin<Box<dyn Future<Output = Result<(), StateError>> + Send>>;
}

/// Capability object the contract uses to reach the ledger.
///
/// The contract never knows which backend sits behind it: a real
/// ledger host, the in-memory map or the file snapshot.
pub trait StateAccessor: Send + Sync {
    /// Point read. `None` when the key has never been written.
    fn get(&self, key: &str) -> Pin<Box<dyn Future<Output = Result<Option<Vec<u8>>, StateError>> + Send + '_>>;

    /// Point write, unconditionally replacing any existing value.
    fn put(&self, key: &str, value: Vec<u8>) -> Pin<Box<dyn Future<Output = Result<(), StateError>> + Send + '_>>;

    /// Open an iterator over `[start_key, end_key)` in lexicographic order.
    #[allow(clippy::type_complexity)]
    fn range_scan(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Box<dyn StateIterator>, StateError>> + Send + '_>>;
}

/// Factory that builds a `StateAccessor` from a JSON config string.
///
/// Implemented by every state backend so the server can resolve one
/// by name without knowing its concrete type.
pub trait StateFactory: Send + Sync {
    fn create(&self, config_json: &str) -> Result<Arc<dyn StateAccessor>, StateError>;
}
