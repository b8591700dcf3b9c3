//! Error types and handlers for registry operations

pub mod handlers;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Malformed image reference
    #[error("parsing failed: {0}")]
    Parse(String),

    /// Registry answered with a status other than the expected one
    #[error("{operation} failed, got status {status}: {body}")]
    Registry {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// Connection, DNS, TLS or timeout failures
    #[error("{0}")]
    Transport(String),

    /// Malformed JSON in a registry or credential helper response
    #[error("decoding response failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// Stored credentials could not be read
    #[error("{0}")]
    Credential(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<RegistryError>,
    },
}

impl RegistryError {
    /// Wrap this error with a description of what was being attempted.
    pub fn context(self, context: impl Into<String>) -> Self {
        RegistryError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// HTTP status of the underlying registry error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RegistryError::Registry { status, .. } => Some(*status),
            RegistryError::Context { source, .. } => source.status(),
            _ => None,
        }
    }
}

impl From<url::ParseError> for RegistryError {
    fn from(err: url::ParseError) -> Self {
        RegistryError::Parse(err.to_string())
    }
}

/// Attach context to the error side of a [`Result`].
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}
