#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("config ({context}): {detail}")]
    Config { context: &'static str, detail: String },

    #[error("unknown state backend '{0}'")]
    UnknownBackend(String),

    #[error("state: {0}")]
    State(#[from] chaincode_api::StateError),

    #[error("init: {0}")]
    Init(String),

    #[error("{0}")]
    Invoke(String),

    #[error("api: {0}")]
    Api(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
