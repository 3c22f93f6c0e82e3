//! Error types for Filegate Core

use thiserror::Error;

/// Main error type for gateway operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Sandbox error: {0}")]
    Sandbox(#[from] SandboxError),

    #[error("Removal error: {0}")]
    Removal(#[from] RemovalError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Request validation errors
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("{0} must be specified")]
    MissingField(&'static str),

    #[error("At least one pattern must be specified")]
    NoPatterns,

    #[error("Content must not be empty")]
    EmptyContent,

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    BadPattern { pattern: String, reason: String },
}

/// Sandbox/filesystem errors
#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Path outside sandbox: {0}")]
    PathOutsideSandbox(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Filename cannot contain path separators or '..': {0}")]
    InvalidFilename(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}

/// Errors from the two-tier removal of a single file
#[derive(Error, Debug)]
pub enum RemovalError {
    #[error("Failed to spawn removal tool '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Removal tool exited with {status}: {output}")]
    ToolFailed { status: String, output: String },

    #[error("Removal tool timed out after {0:?}")]
    TimedOut(std::time::Duration),

    #[error("Removal cancelled")]
    Cancelled,

    #[error("Failed to delete {path}: {reason}")]
    FallbackFailed { path: String, reason: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
