use std::future::Future;
use std::pin::Pin;

use chaincode_api::{
    image_key, ImageRecord, QueryResult, RecordEntry, StateAccessor, StateIterator,
    IMAGE_RANGE_END, IMAGE_RANGE_START,
};

use crate::error::ContractError;

pub const OP_INIT_LEDGER: &str = "initLedger";
pub const OP_UPLOAD_IMAGE: &str = "UploadImage";
pub const OP_QUERY_IMAGE: &str = "queryImage";
pub const OP_QUERY_ALL_IMAGES: &str = "queryAllImgs";
pub const OP_TRANSFER_IMAGE: &str = "transferImage";

/// Future returned by every handler: the response payload or an error.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>, ContractError>> + Send + 'a>>;

/// Handler signature. The accessor is the only context a handler gets.
pub type Handler = for<'a> fn(&'a dyn StateAccessor, &'a [String]) -> HandlerFuture<'a>;

/// Records written by `initLedger`, in key order.
pub fn seed_images() -> Vec<ImageRecord> {
    vec![
        ImageRecord::new("Typhoid", " 1 MB", "Tomoko"),
        ImageRecord::new("Pnemonia", " 1 MB", "Jin"),
        ImageRecord::new("Anemia", " 1 MB", "Max"),
    ]
}

// ═══════════════════════════════════════════════════════════════
//  initLedger
// ═══════════════════════════════════════════════════════════════

/// Write the seed records under `IMG0..IMG{n-1}`. Arguments are ignored.
pub fn init_ledger<'a>(state: &'a dyn StateAccessor, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        if !args.is_empty() {
            tracing::debug!(ignored = args.len(), "initLedger takes no arguments");
        }
        for (i, record) in seed_images().into_iter().enumerate() {
            let key = image_key(i);
            state.put(&key, record.to_bytes()?).await?;
            tracing::info!(key = %key, name = %record.image_name, owner = %record.owner, "seeded image");
        }
        Ok(Vec::new())
    })
}

// ═══════════════════════════════════════════════════════════════
//  UploadImage: key, name, size, owner
// ═══════════════════════════════════════════════════════════════

pub fn upload_image<'a>(state: &'a dyn StateAccessor, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        ContractError::check_arity(args, 4)?;
        let key = &args[0];
        let record = ImageRecord::new(args[1].as_str(), args[2].as_str(), args[3].as_str());
        state.put(key, record.to_bytes()?).await?;
        tracing::info!(key = %key, owner = %record.owner, "uploaded image");
        Ok(Vec::new())
    })
}

// ═══════════════════════════════════════════════════════════════
//  queryImage: key
// ═══════════════════════════════════════════════════════════════

/// Stored bytes at the key, returned without re-encoding.
pub fn query_image<'a>(state: &'a dyn StateAccessor, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        ContractError::check_arity(args, 1)?;
        read_existing(state, &args[0]).await
    })
}

// ═══════════════════════════════════════════════════════════════
//  queryAllImgs
// ═══════════════════════════════════════════════════════════════

/// Every entry in `[IMG0, IMG999)` as a JSON array of `{Key, Record}`.
pub fn query_all_images<'a>(state: &'a dyn StateAccessor, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let mut iter = state.range_scan(IMAGE_RANGE_START, IMAGE_RANGE_END).await?;

        // Close on both paths before looking at the scan result.
        let scanned = collect_results(iter.as_mut()).await;
        let closed = iter.close().await;
        let results = scanned?;
        closed?;

        let raw = results.iter().filter(|r| !r.record.is_decoded()).count();
        if raw > 0 {
            tracing::warn!(raw, "queryAllImgs returned undecodable values as raw text");
        }
        tracing::debug!(count = results.len(), "queryAllImgs");
        Ok(serde_json::to_vec(&results)?)
    })
}

async fn collect_results(iter: &mut dyn StateIterator) -> Result<Vec<QueryResult>, ContractError> {
    let mut results = Vec::new();
    while let Some(kv) = iter.next().await? {
        if kv.value.is_empty() {
            continue;
        }
        results.push(QueryResult {
            record: RecordEntry::from_bytes(&kv.value),
            key: kv.key,
        });
    }
    Ok(results)
}

// ═══════════════════════════════════════════════════════════════
//  transferImage: key, new owner, new name
// ═══════════════════════════════════════════════════════════════

/// Read-modify-write of `Owner` and `imageName`. Concurrent transfers
/// on one key are serialized by the host, not here.
pub fn transfer_image<'a>(state: &'a dyn StateAccessor, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        ContractError::check_arity(args, 3)?;
        let key = &args[0];
        let bytes = read_existing(state, key).await?;
        let mut record = ImageRecord::from_bytes(&bytes).map_err(|e| ContractError::Decode {
            key: key.clone(),
            detail: e.to_string(),
        })?;

        let previous = std::mem::replace(&mut record.owner, args[1].clone());
        record.image_name = args[2].clone();
        state.put(key, record.to_bytes()?).await?;

        tracing::info!(key = %key, from = %previous, to = %record.owner, "transferred image");
        Ok(Vec::new())
    })
}

async fn read_existing(state: &dyn StateAccessor, key: &str) -> Result<Vec<u8>, ContractError> {
    match state.get(key).await? {
        Some(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => Err(ContractError::NotFound(key.to_string())),
    }
}
