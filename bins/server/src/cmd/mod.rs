pub mod invoke;
pub mod serve;

use std::sync::Arc;

use chaincode_api::{StateAccessor, StateFactory};
use storage_file::FileStateFactory;
use storage_memory::MemoryStateFactory;

use crate::config::StateConfig;
use crate::error::ServerError;

/// Resolve the configured backend by name and open it.
pub(crate) fn open_state(cfg: &StateConfig) -> Result<Arc<dyn StateAccessor>, ServerError> {
    let factory: &dyn StateFactory = match cfg.backend.as_str() {
        "memory" => &MemoryStateFactory,
        "file" => &FileStateFactory,
        other => return Err(ServerError::UnknownBackend(other.to_string())),
    };
    let state = factory.create(&cfg.config_json()?)?;
    tracing::info!(backend = %cfg.backend, "opened state");
    Ok(state)
}
