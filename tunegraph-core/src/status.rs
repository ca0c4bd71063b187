//! Uniform operation results
//!
//! Every relationship operation answers with a [`QueryOutcome`]. Callers
//! branch on [`StatusKind`]; the message is for humans.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Outcome kind of a relationship operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    Ok,
    NotFound,
    Conflict,
    GenericError,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::GenericError => "GENERIC_ERROR",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result value handed back by every relationship operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub kind: StatusKind,
    pub message: String,
}

impl QueryOutcome {
    pub fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Ok, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Conflict, message)
    }

    pub fn generic_error(message: impl Into<String>) -> Self {
        Self::new(StatusKind::GenericError, message)
    }

    pub fn is_ok(&self) -> bool {
        self.kind == StatusKind::Ok
    }
}

impl From<EngineError> for QueryOutcome {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound(msg) => Self::not_found(msg),
            EngineError::Conflict(msg) => Self::conflict(msg),
            store @ EngineError::Store(_) => Self::generic_error(store.to_string()),
        }
    }
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
