use serde::{Deserialize, Serialize};

/// Status code of a successful invocation, as reported to the host.
pub const STATUS_OK: u16 = 200;

/// Status code of a failed invocation.
pub const STATUS_ERROR: u16 = 500;

/// A named operation plus its ordered string arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(function: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result envelope handed back to the host. There is no other shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Success { payload: Vec<u8> },
    Error { message: String },
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Response::Success { payload }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error { message: message.into() }
    }

    pub fn status(&self) -> u16 {
        match self {
            Response::Success { .. } => STATUS_OK,
            Response::Error { .. } => STATUS_ERROR,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    /// Payload bytes; empty for an error.
    pub fn payload(&self) -> &[u8] {
        match self {
            Response::Success { payload } => payload,
            Response::Error { .. } => &[],
        }
    }

    /// Error message; `None` for a success.
    pub fn message(&self) -> Option<&str> {
        match self {
            Response::Success { .. } => None,
            Response::Error { message } => Some(message),
        }
    }
}
