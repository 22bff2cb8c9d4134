//! Error types for the ISMS engine

use std::fmt;
use thiserror::Error;

/// Kind of record an id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Annex-A control
    Control,
    /// Audit record
    Audit,
    /// Directive record
    Directive,
    /// Policy document
    Document,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Control => write!(f, "control"),
            Self::Audit => write!(f, "audit"),
            Self::Directive => write!(f, "directive"),
            Self::Document => write!(f, "document"),
        }
    }
}

/// ISMS error type
#[derive(Error, Debug)]
pub enum IsmsError {
    /// Referenced id does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: i64 },

    /// Status outside the five-level scale
    #[error("invalid status: {0:?}")]
    InvalidStatus(String),

    /// Malformed control code
    #[error("invalid control code: {0:?}")]
    InvalidCode(String),

    /// Category outside the closed set
    #[error("invalid category: {0:?}")]
    InvalidCategory(String),

    /// Control code already present in the store
    #[error("duplicate control code: {0}")]
    DuplicateCode(String),

    /// A probe could not read one signal
    #[error("signal unavailable: {signal}: {reason}")]
    SignalUnavailable { signal: &'static str, reason: String },

    /// Value outside its allowed range
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// Backing store failure
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Serialization failure
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IsmsError {
    /// Shorthand for a missing record
    pub fn not_found(kind: RecordKind, id: i64) -> Self {
        Self::NotFound { kind, id }
    }

    /// True for any `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for the ISMS engine
pub type IsmsResult<T> = Result<T, IsmsError>;
