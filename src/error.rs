//! Error types for Arel.

use crate::transpiler::Dialect;
use thiserror::Error;

/// The main error type for building and rendering statements.
#[derive(Debug, Error)]
pub enum ArelError {
    /// A raw SQL join target was empty.
    #[error("Empty join: a raw SQL join target cannot be empty")]
    EmptyJoin,

    /// Malformed call shape (empty lock clause, `on` without a join, ...).
    #[error("Argument error: {0}")]
    Argument(String),

    /// The dialect has no rendering for this node.
    #[error("Unsupported node: {dialect:?} cannot visit {node}")]
    UnsupportedNode { node: &'static str, dialect: Dialect },

    /// Two incompatible type registrations for the same adapter.
    #[error("Type conflict: '{name}' is already registered for {adapter}")]
    TypeConflict { name: String, adapter: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArelError {
    /// Create an argument error.
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }

    /// Create an unsupported-node error.
    pub fn unsupported(node: &'static str, dialect: Dialect) -> Self {
        Self::UnsupportedNode { node, dialect }
    }
}

/// Result type alias for Arel operations.
pub type ArelResult<T> = Result<T, ArelError>;
