use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use chaincode_api::Response;
use chaincode_api_server::AppState;
use chaincode_engine::Dispatcher;

use super::open_state;
use crate::config::{ServeArgs, ServerConfig};
use crate::error::ServerError;

pub async fn run(args: ServeArgs) -> Result<(), ServerError> {
    tracing::info!("imgledger-server starting");

    // --- Load config ---
    let config = ServerConfig::load(&args.config)?;
    tracing::info!(config = %args.config, "loaded config");

    // --- State + contract ---
    let state = open_state(&config.state)?;
    let dispatcher = Arc::new(Dispatcher::new());

    if let Response::Error { message } = dispatcher.init(state.as_ref(), config.seed_on_init).await {
        return Err(ServerError::Init(message));
    }
    tracing::info!(operations = ?dispatcher.operations(), "contract ready");

    // --- API server ---
    let token = CancellationToken::new();
    let app = AppState { dispatcher, state };
    let api_port = config.api_port;
    let api_token = token.clone();
    let mut api_handle = tokio::spawn(async move {
        chaincode_api_server::run(api_port, app, api_token).await
    });

    // --- Wait for Ctrl+C or an early server exit ---
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("shutting down...");
        }
        res = &mut api_handle => {
            return match res {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(ServerError::Api(e)),
                Err(e) => Err(ServerError::Api(e.to_string())),
            };
        }
    }

    token.cancel();

    // Drain in-flight requests, then give up on them
    match tokio::time::timeout(Duration::from_secs(5), &mut api_handle).await {
        Ok(Ok(Err(e))) => tracing::error!(error = %e, "api server error"),
        Ok(_) => {}
        Err(_) => {
            tracing::warn!("api server did not stop in time, aborting");
            api_handle.abort();
        }
    }

    tracing::info!("shutdown complete");
    Ok(())
}
