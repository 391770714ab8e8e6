use chaincode_api::{ErrorKind, StateAccessor, StateFactory};
use storage_file::{FileState, FileStateFactory};

#[tokio::test]
async fn writes_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("ledger.jsonl");

    let state = FileState::open(&path).unwrap();
    state.put("IMG0", b"{\"a\":1}".to_vec()).await.unwrap();
    state.put("IMG1", vec![0xff, 0x00, 0x10]).await.unwrap();
    state.put("IMG0", b"second".to_vec()).await.unwrap();
    drop(state);

    let reopened = FileState::open(&path).unwrap();
    assert_eq!(reopened.get("IMG0").await.unwrap(), Some(b"second".to_vec()));
    assert_eq!(reopened.get("IMG1").await.unwrap(), Some(vec![0xff, 0x00, 0x10]));
}

#[tokio::test]
async fn missing_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let state = FileState::open(dir.path().join("absent.jsonl")).unwrap();
    assert_eq!(state.get("IMG0").await.unwrap(), None);
}

#[tokio::test]
async fn range_scan_reads_from_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.jsonl");
    let state = FileState::open(&path).unwrap();
    for i in [2, 0, 1] {
        state.put(&format!("IMG{i}"), b"v".to_vec()).await.unwrap();
    }

    let mut iter = state.range_scan("IMG0", "IMG999").await.unwrap();
    let mut keys = Vec::new();
    while let Some(kv) = iter.next().await.unwrap() {
        keys.push(kv.key);
    }
    iter.close().await.unwrap();

    assert_eq!(keys, vec!["IMG0", "IMG1", "IMG2"]);
    assert_eq!(state.open_iterators(), 0);
}

#[test]
fn corrupt_snapshot_is_a_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.jsonl");
    std::fs::write(&path, "not json\n").unwrap();

    let err = FileState::open(&path).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn factory_requires_path() {
    let err = FileStateFactory.create("{}").err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Config);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.jsonl");
    let cfg = serde_json::json!({ "path": path.to_string_lossy() }).to_string();
    assert!(FileStateFactory.create(&cfg).is_ok());
}

#[tokio::test]
async fn tmp_extension_path_is_still_replaced_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.tmp");

    let state = FileState::open(&path).unwrap();
    state.put("IMG0", b"first".to_vec()).await.unwrap();
    state.put("IMG1", b"second".to_vec()).await.unwrap();
    drop(state);

    assert!(!dir.path().join("ledger.tmp.tmp").exists());
    let reopened = FileState::open(&path).unwrap();
    assert_eq!(reopened.get("IMG0").await.unwrap(), Some(b"first".to_vec()));
    assert_eq!(reopened.get("IMG1").await.unwrap(), Some(b"second".to_vec()));
}

#[tokio::test]
async fn failed_write_names_the_key_and_keeps_memory_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.jsonl");
    let state = FileState::open(&path).unwrap();

    // a directory in place of the snapshot makes the final rename fail
    std::fs::create_dir(&path).unwrap();
    let err = state.put("IMG7", b"v".to_vec()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.key(), Some("IMG7"));
    assert!(err.to_string().starts_with("state io error at IMG7: rename"));
    assert_eq!(state.get("IMG7").await.unwrap(), None);
}
