use chaincode_api::StateError;

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("incorrect number of arguments: expecting {expected}, got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("{0} does not exist")]
    NotFound(String),

    #[error("{key} is not a valid image record: {detail}")]
    Decode { key: String, detail: String },

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("state: {0}")]
    State(#[from] StateError),
}

impl ContractError {
    /// Reject `args` unless it holds exactly `expected` elements.
    pub fn check_arity(args: &[String], expected: usize) -> Result<(), ContractError> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(ContractError::Arity { expected, actual: args.len() })
        }
    }
}
