use std::collections::BTreeMap;
use std::future::Future;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use base64::Engine;
use tokio::sync::Mutex;

use chaincode_api::{StateAccessor, StateError, StateIterator};
use storage_memory::MemoryState;

use super::config::DiskEntry;

// ════════════════════════════════════════════════════════════════
//  FileState
// ════════════════════════════════════════════════════════════════

/// Ledger state kept in memory and rewritten to a JSONL snapshot on
/// every put. Reads and scans never touch the disk.
#[derive(Clone)]
pub struct FileState {
    state: MemoryState,
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileState {
    /// Load the snapshot at `path`, or start empty if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StateError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            load_snapshot(&path)?
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "opened file state");
        Ok(Self {
            state: MemoryState::from_entries(entries),
            path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Number of iterators opened and not yet closed.
    pub fn open_iterators(&self) -> usize {
        self.state.open_iterators()
    }

    async fn do_put(&self, key: String, value: Vec<u8>) -> Result<(), StateError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.state.snapshot().await;
        entries.insert(key.clone(), value.clone());
        write_snapshot(&self.path, &entries).map_err(|e| e.for_key(key.as_str()))?;
        self.state.put(&key, value).await
    }
}

// ════════════════════════════════════════════════════════════════
//  StateAccessor impl
// ════════════════════════════════════════════════════════════════

impl StateAccessor for FileState {
    fn get(&self, key: &str) -> Pin<Box<dyn Future<Output = Result<Option<Vec<u8>>, StateError>> + Send + '_>> {
        self.state.get(key)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Pin<Box<dyn Future<Output = Result<(), StateError>> + Send + '_>> {
        let key = key.to_string();
        Box::pin(async move { self.do_put(key, value).await })
    }

    fn range_scan(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Box<dyn StateIterator>, StateError>> + Send + '_>> {
        self.state.range_scan(start_key, end_key)
    }
}

// ════════════════════════════════════════════════════════════════
//  Helpers
// ════════════════════════════════════════════════════════════════

fn load_snapshot(path: &Path) -> Result<BTreeMap<String, Vec<u8>>, StateError> {
    let f = std::fs::File::open(path)
        .map_err(|e| StateError::io(format!("open {}: {e}", path.display())))?;
    let reader = std::io::BufReader::new(f);

    let mut entries = BTreeMap::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| StateError::io(format!("read line: {e}")))?;
        if line.is_empty() {
            continue;
        }
        let entry: DiskEntry = serde_json::from_str(&line)
            .map_err(|e| StateError::format_err(format!("{}:{}: {e}", path.display(), n + 1)))?;
        let value = base64::engine::general_purpose::STANDARD
            .decode(entry.value.as_bytes())
            .map_err(|e| StateError::format_err(format!("{}:{}: base64: {e}", path.display(), n + 1)))?;
        entries.insert(entry.key, value);
    }
    Ok(entries)
}

/// Write the whole map to a sibling temp file, then rename over `path`.
fn write_snapshot(path: &Path, entries: &BTreeMap<String, Vec<u8>>) -> Result<(), StateError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| StateError::io(format!("mkdir: {e}")))?;
        }
    }

    let tmp = temp_path(path);
    {
        let f = std::fs::File::create(&tmp)
            .map_err(|e| StateError::io(format!("create {}: {e}", tmp.display())))?;
        let mut w = std::io::BufWriter::new(f);
        for (key, value) in entries {
            let line = serde_json::to_string(&DiskEntry {
                key: key.clone(),
                value: base64::engine::general_purpose::STANDARD.encode(value),
            })
            .map_err(|e| StateError::format_err(format!("encode {key}: {e}")))?;
            writeln!(w, "{line}").map_err(|e| StateError::io(format!("write: {e}")))?;
        }
        w.flush().map_err(|e| StateError::io(format!("flush: {e}")))?;
    }
    std::fs::rename(&tmp, path)
        .map_err(|e| StateError::io(format!("rename {}: {e}", tmp.display())))
}

/// `ledger.jsonl` -> `ledger.jsonl.tmp`. Appending keeps the temp file
/// distinct from `path` whatever its extension.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_to_file_name() {
        assert_eq!(temp_path(Path::new("data/ledger.jsonl")), PathBuf::from("data/ledger.jsonl.tmp"));
        assert_eq!(temp_path(Path::new("data/ledger.tmp")), PathBuf::from("data/ledger.tmp.tmp"));
    }
}
