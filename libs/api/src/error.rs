/// What went wrong inside a state backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backing file or device failed.
    Io,
    /// A persisted snapshot could not be decoded.
    Format,
    /// Backend settings were missing or malformed.
    Config,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Io => f.write_str("io"),
            ErrorKind::Format => f.write_str("format"),
            ErrorKind::Config => f.write_str("config"),
        }
    }
}

/// Failure reported by a `StateAccessor`, optionally tied to the ledger
/// key whose read or write triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateError {
    kind: ErrorKind,
    message: String,
    key: Option<String>,
}

impl StateError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Io, message: msg.into(), key: None }
    }

    pub fn format_err(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Format, message: msg.into(), key: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Config, message: msg.into(), key: None }
    }

    /// Attach the ledger key being accessed when the backend failed.
    pub fn for_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.key {
            Some(key) => write!(f, "state {} error at {key}: {}", self.kind, self.message),
            None => write!(f, "state {} error: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for StateError {}
