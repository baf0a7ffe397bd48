use thiserror::Error;

/// Unified error type for release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Command failed (exit code {code}): {command}\n{stderr}")]
    Command {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Patch error: {0}")]
    Patch(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Assertion failed: expected '{expected}', got '{actual}'")]
    Assertion { expected: String, actual: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in the release tool
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }

    /// Create a patch error with context
    pub fn patch(msg: impl Into<String>) -> Self {
        ReleaseError::Patch(msg.into())
    }

    /// Create a precondition error with context
    pub fn precondition(msg: impl Into<String>) -> Self {
        ReleaseError::Precondition(msg.into())
    }

    /// Create an assertion error from the expected and observed values
    pub fn assertion(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        ReleaseError::Assertion {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
