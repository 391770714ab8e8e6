use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════
//  Keys
// ════════════════════════════════════════════════════════════════

/// Discriminator written into every image record.
pub const IMAGE_DOC_TYPE: &str = "img";

/// Prefix of sequentially generated image keys (`IMG0`, `IMG1`, ...).
pub const IMAGE_KEY_PREFIX: &str = "IMG";

/// Inclusive lower bound of the image key namespace.
pub const IMAGE_RANGE_START: &str = "IMG0";

/// Exclusive upper bound of the image key namespace.
pub const IMAGE_RANGE_END: &str = "IMG999";

/// Sequential key for the `index`-th image.
pub fn image_key(index: usize) -> String {
    format!("{IMAGE_KEY_PREFIX}{index}")
}

// ════════════════════════════════════════════════════════════════
//  ImageRecord
// ════════════════════════════════════════════════════════════════

/// Image asset stored as the ledger value. The record id is the
/// ledger key and never travels inside the value.
///
/// Field names on the wire are fixed by data already on the ledger.
/// Fields this type does not know are kept in `extra` and written back
/// unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(rename = "docType")]
    pub doc_type: String,
    #[serde(rename = "imageName")]
    pub image_name: String,
    #[serde(rename = "imageSize")]
    pub image_size: String,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ImageRecord {
    /// New record with the image discriminator set.
    pub fn new(
        image_name: impl Into<String>,
        image_size: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            doc_type: IMAGE_DOC_TYPE.to_string(),
            image_name: image_name.into(),
            image_size: image_size.into(),
            owner: owner.into(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

// ════════════════════════════════════════════════════════════════
//  Range query results
// ════════════════════════════════════════════════════════════════

/// Value half of a range query row: the decoded record, or the raw
/// stored text when it does not parse as one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordEntry {
    Decoded(ImageRecord),
    Raw(String),
}

impl RecordEntry {
    /// Decode `bytes`, degrading to a lossy UTF-8 string instead of failing.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match ImageRecord::from_bytes(bytes) {
            Ok(record) => RecordEntry::Decoded(record),
            Err(_) => RecordEntry::Raw(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, RecordEntry::Decoded(_))
    }
}

/// One `{"Key": ..., "Record": ...}` row of `queryAllImgs`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: RecordEntry,
}
