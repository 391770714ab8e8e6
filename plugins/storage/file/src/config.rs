// ════════════════════════════════════════════════════════════════
//  Configuration
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, serde::Deserialize)]
pub struct FileStateConfig {
    /// Snapshot file. Parent directories are created on first write.
    pub path: String,
}

// ════════════════════════════════════════════════════════════════
//  On-disk format
// ════════════════════════════════════════════════════════════════

/// One line of the snapshot: a ledger key and its base64 value.
#[derive(serde::Serialize, serde::Deserialize)]
pub(crate) struct DiskEntry {
    pub key: String,
    pub value: String,
}
