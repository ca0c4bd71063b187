//! Structured error types for tunegraph-core.
//!
//! Store adapters report `StoreError`. The engine folds those together with
//! its business outcomes into `EngineError`, which never escapes a public
//! operation: it is turned into a `QueryOutcome` at the boundary.

use thiserror::Error;

/// Neo4j status code reported when an identical constraint is already installed.
pub const EQUIVALENT_SCHEMA_RULE_CODE: &str = "Neo.ClientError.Schema.EquivalentSchemaRuleAlreadyExists";

/// Message fragment older Neo4j servers emit for the same condition.
pub const EQUIVALENT_CONSTRAINT_MESSAGE: &str = "An equivalent constraint already exists";

/// Failure raised by a graph store adapter
#[derive(Error, Debug)]
pub enum StoreError {
    /// The server rejected a statement with a status code
    #[error("{code}: {message}")]
    Neo4j { code: String, message: String },

    /// Connection, protocol or driver failure without a server status code
    #[error("store connection error: {0}")]
    Connection(String),

    /// A result row did not carry the expected column
    #[error("malformed result: missing or invalid column '{column}'")]
    MalformedResult { column: &'static str },

    /// The store handle was closed at shutdown
    #[error("graph store is closed")]
    Closed,

    /// Driver configuration was rejected before connecting
    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// Create a server-side error
    pub fn neo4j(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Neo4j {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a connection error
    pub fn connection(reason: impl Into<String>) -> Self {
        Self::Connection(reason.into())
    }

    /// True when the store says an equivalent constraint already exists.
    ///
    /// Checks the status code first. The message fragment is a fallback for
    /// servers that report the condition without a specific code.
    pub fn is_equivalent_constraint(&self) -> bool {
        match self {
            Self::Neo4j { code, message } => {
                code == EQUIVALENT_SCHEMA_RULE_CODE
                    || message.contains(EQUIVALENT_CONSTRAINT_MESSAGE)
            }
            Self::Connection(message) => message.contains(EQUIVALENT_CONSTRAINT_MESSAGE),
            _ => false,
        }
    }
}

impl From<neo4rs::Error> for StoreError {
    fn from(err: neo4rs::Error) -> Self {
        match err {
            neo4rs::Error::Neo4j(e) => Self::neo4j(e.code(), e.message()),
            other => Self::Connection(other.to_string()),
        }
    }
}

/// Outcome taxonomy used inside the relationship engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// A referenced node is absent
    #[error("{0}")]
    NotFound(&'static str),

    /// The edge is already in the requested state
    #[error("{0}")]
    Conflict(&'static str),

    /// The store failed for reasons unrelated to business rules
    #[error("Error: {0}")]
    Store(#[from] StoreError),
}
