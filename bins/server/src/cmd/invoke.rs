use std::io::Write;

use chaincode_api::{Invocation, Response};
use chaincode_engine::Dispatcher;

use super::open_state;
use crate::config::{InvokeArgs, ServerConfig};
use crate::error::ServerError;

/// One-shot invocation: payload goes to stdout, failures become errors.
pub async fn run(args: InvokeArgs) -> Result<(), ServerError> {
    let config = ServerConfig::load(&args.config)?;
    if config.state.backend == "memory" {
        tracing::warn!("memory state is discarded when this command exits");
    }
    let state = open_state(&config.state)?;
    let dispatcher = Dispatcher::new();

    let invocation = Invocation::new(args.function, args.args);
    match dispatcher.invoke(state.as_ref(), &invocation).await {
        Response::Success { payload } => {
            let mut out = std::io::stdout().lock();
            out.write_all(&payload)?;
            if !payload.is_empty() {
                writeln!(out)?;
            }
            Ok(())
        }
        Response::Error { message } => Err(ServerError::Invoke(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chaincode_api::{ImageRecord, StateAccessor};
    use storage_file::FileState;

    fn args(config: &str, function: &str, rest: &[&str]) -> InvokeArgs {
        InvokeArgs {
            config: config.to_string(),
            function: function.to_string(),
            args: rest.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn file_backend_keeps_state_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("ledger.jsonl");
        let config = dir.path().join("config.toml");
        std::fs::write(
            &config,
            format!("[state]\nbackend = \"file\"\n\n[state.config]\npath = {:?}\n", ledger.to_string_lossy()),
        )
        .unwrap();
        let config = config.to_string_lossy().to_string();

        run(args(&config, "initLedger", &[])).await.unwrap();
        assert!(ledger.exists());

        run(args(&config, "transferImage", &["IMG1", "Ann", "Scan"])).await.unwrap();
        run(args(&config, "queryImage", &["IMG1"])).await.unwrap();

        let state = FileState::open(&ledger).unwrap();
        let bytes = state.get("IMG1").await.unwrap().unwrap();
        let record = ImageRecord::from_bytes(&bytes).unwrap();
        assert_eq!(record.owner, "Ann");
        assert_eq!(record.image_name, "Scan");
        assert_eq!(record.image_size, " 1 MB");

        let err = run(args(&config, "queryImage", &["IMG9"])).await.unwrap_err();
        assert!(matches!(err, ServerError::Invoke(ref m) if m == "IMG9 does not exist"));
    }
}
