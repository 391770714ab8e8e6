mod config;
mod storage;

use std::sync::Arc;

use chaincode_api::{StateAccessor, StateError, StateFactory};

pub use config::FileStateConfig;
pub use storage::FileState;

// ════════════════════════════════════════════════════════════════
//  FileStateFactory
// ════════════════════════════════════════════════════════════════

pub struct FileStateFactory;

impl StateFactory for FileStateFactory {
    fn create(&self, config_json: &str) -> Result<Arc<dyn StateAccessor>, StateError> {
        let cfg: FileStateConfig = serde_json::from_str(config_json)
            .map_err(|e| StateError::config(format!("file state config: {e}")))?;
        Ok(Arc::new(FileState::open(&cfg.path)?))
    }
}
