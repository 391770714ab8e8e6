use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use crate::error::ServerError;

#[derive(Parser)]
#[command(name = "imgledger-server", about = "Image record contract host")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the invoke API over HTTP
    Serve(ServeArgs),
    /// Run one operation against the configured state and print the payload
    Invoke(InvokeArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Path to the TOML config file
    #[arg(long, default_value = "config.toml", env = "CONFIG_PATH")]
    pub config: String,
}

#[derive(Args, Clone, Debug)]
pub struct InvokeArgs {
    /// Path to the TOML config file
    #[arg(long, default_value = "config.toml", env = "CONFIG_PATH")]
    pub config: String,

    /// Operation name, e.g. `queryImage`
    pub function: String,

    /// Operation arguments, in order
    pub args: Vec<String>,
}

// ---- TOML Config ----

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Run `initLedger` from the instantiate hook on startup.
    #[serde(default)]
    pub seed_on_init: bool,
    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Debug, Deserialize)]
pub struct StateConfig {
    /// `memory` or `file`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Backend-specific settings, handed to the backend as JSON.
    #[serde(default)]
    pub config: Option<toml::Value>,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            config: None,
        }
    }
}

fn default_api_port() -> u16 {
    9300
}

fn default_backend() -> String {
    "memory".to_string()
}

impl ServerConfig {
    pub fn load(path: &str) -> Result<Self, ServerError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config { context: "read", detail: format!("'{path}': {e}") })?;
        Self::parse(&content)
            .map_err(|e| ServerError::Config { context: "parse", detail: format!("'{path}': {e}") })
    }

    pub fn parse(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

impl StateConfig {
    /// Backend settings as a JSON string, `{}` when absent.
    pub fn config_json(&self) -> Result<String, ServerError> {
        match &self.config {
            Some(v) => serde_json::to_string(v)
                .map_err(|e| ServerError::Config { context: "state", detail: e.to_string() }),
            None => Ok("{}".to_string()),
        }
    }
}
