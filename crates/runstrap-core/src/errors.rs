//! Structured error types shared across runstrap crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`RunError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, keys, identifiers).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint, usually the underlying OS or library error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for a bootstrap run.
///
/// Every variant is fatal to the run. The only recoverable failure, the
/// commit lookup, never surfaces as a `RunError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum RunError {
    /// Configuration file could not be read, parsed, or lacks required keys.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Filesystem failures: run directory creation, file hashing, writes.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization failures for metadata or the config snapshot.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Database open, pragma, schema, or close failures.
    #[error("database error: {0}")]
    Database(ErrorInfo),
}

impl RunError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            RunError::Config(info)
            | RunError::Io(info)
            | RunError::Serde(info)
            | RunError::Database(info) => info,
        }
    }

    /// Shorthand for the stable code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}
