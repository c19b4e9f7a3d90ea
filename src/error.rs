//! Error types for directive parsing and template multiplication

use std::fmt;

use thiserror::Error;

/// Which side of the merge a colliding resource name came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// A copy produced by replication landed on an existing name
    Replicated,
    /// A resource copied through unchanged landed on an existing name
    PassThrough,
}

impl fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionKind::Replicated => f.write_str("conflicts with existing resources"),
            CollisionKind::PassThrough => f.write_str("already exists, duplication"),
        }
    }
}

/// Errors that can occur while multiplying a template
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MultiplyError {
    /// Malformed or inconsistent `MultiplyKey` / `Multiply` / `Placeholder` parameters
    #[error("invalid directive: {message}")]
    InvalidDirective { message: String },

    /// A resource name already exists in the template being built
    #[error("{name} {kind}")]
    NameCollision { name: String, kind: CollisionKind },

    /// Anything else that went wrong while handling a request
    #[error("unexpected fault: {message}")]
    UnexpectedFault { message: String },
}

impl MultiplyError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidDirective {
            message: message.into(),
        }
    }

    pub fn collision(name: impl Into<String>, kind: CollisionKind) -> Self {
        Self::NameCollision {
            name: name.into(),
            kind,
        }
    }

    pub fn fault(message: impl Into<String>) -> Self {
        Self::UnexpectedFault {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for MultiplyError {
    fn from(err: serde_json::Error) -> Self {
        Self::fault(err.to_string())
    }
}

/// Errors that can occur when loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}
