//! Error types for stage parsing and context metadata.

use thiserror::Error;

/// Errors raised when a stage or usage string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("unrecognized stage '{0}' (expected one of dev, test, prod, sandbox, orga)")]
    Unrecognized(String),

    #[error(
        "unknown usage '{0}' (expected one of POC, EPHEMERAL, PRODUCTION, MANAGEMENT, DEVELOPMENT)"
    )]
    UnknownUsage(String),
}

/// Errors raised while building context metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("metadata key '{0}' shadows a context variable")]
    ReservedKey(String),
}
