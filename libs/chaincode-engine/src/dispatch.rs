use std::collections::HashMap;

use chaincode_api::{Invocation, Response, StateAccessor};

use crate::error::ContractError;
use crate::handlers::{self, Handler};

// ═══════════════════════════════════════════════════════════════
//  Dispatcher
// ═══════════════════════════════════════════════════════════════

/// Fixed table from operation name to handler.
///
/// Built once and never mutated, so one instance can serve any number
/// of concurrent invocations. The accessor is passed per call.
pub struct Dispatcher {
    handlers: HashMap<&'static str, Handler>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        let mut table: HashMap<&'static str, Handler> = HashMap::new();
        table.insert(handlers::OP_INIT_LEDGER, handlers::init_ledger);
        table.insert(handlers::OP_UPLOAD_IMAGE, handlers::upload_image);
        table.insert(handlers::OP_QUERY_IMAGE, handlers::query_image);
        table.insert(handlers::OP_QUERY_ALL_IMAGES, handlers::query_all_images);
        table.insert(handlers::OP_TRANSFER_IMAGE, handlers::transfer_image);
        Self { handlers: table }
    }

    /// Registered operation names, sorted.
    pub fn operations(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn resolve(&self, function: &str) -> Result<Handler, ContractError> {
        self.handlers
            .get(function)
            .copied()
            .ok_or_else(|| ContractError::UnknownOperation(function.to_string()))
    }

    /// Run the handler named by `invocation` and wrap its outcome.
    pub async fn invoke(&self, state: &dyn StateAccessor, invocation: &Invocation) -> Response {
        match self.execute(state, invocation).await {
            Ok(payload) => Response::success(payload),
            Err(e) => {
                tracing::warn!(function = %invocation.function, error = %e, "invocation failed");
                Response::error(e.to_string())
            }
        }
    }

    /// Like `invoke`, but keeps the typed error.
    pub async fn execute(&self, state: &dyn StateAccessor, invocation: &Invocation) -> Result<Vec<u8>, ContractError> {
        let handler = self.resolve(&invocation.function)?;
        tracing::debug!(function = %invocation.function, args = invocation.args.len(), "invoke");
        handler(state, &invocation.args).await
    }

    /// Instantiate hook, called once when the contract is installed.
    /// Seeds the ledger when `seed` is set.
    pub async fn init(&self, state: &dyn StateAccessor, seed: bool) -> Response {
        tracing::info!(seed, "chaincode instantiated");
        if !seed {
            return Response::success(Vec::new());
        }
        self.invoke(state, &Invocation::new(handlers::OP_INIT_LEDGER, Vec::<String>::new()))
            .await
    }
}
