use std::fmt;

use thiserror::Error;

/// Classification of a store failure, decided by the store implementation
/// that saw the raw transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Row-level access policies reference each other cyclically.
    PolicyRecursion,
    Unauthorized,
    NotFound,
    Transient,
    Timeout,
    /// The store understood the request and refused it (constraint, bad filter).
    Rejected,
    Decode,
}

impl StoreErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreErrorKind::PolicyRecursion => "policy recursion",
            StoreErrorKind::Unauthorized => "unauthorized",
            StoreErrorKind::NotFound => "not found",
            StoreErrorKind::Transient => "transient failure",
            StoreErrorKind::Timeout => "timed out",
            StoreErrorKind::Rejected => "rejected",
            StoreErrorKind::Decode => "undecodable response",
        }
    }
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn policy_recursion(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::PolicyRecursion, message)
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Transient, message)
    }

    /// Failures caused by backend access-policy configuration rather than
    /// by the request or the network.
    pub fn is_policy_failure(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::PolicyRecursion | StoreErrorKind::Unauthorized
        )
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::new(StoreErrorKind::Decode, e.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            StoreErrorKind::Timeout
        } else if e.is_decode() {
            StoreErrorKind::Decode
        } else {
            StoreErrorKind::Transient
        };
        StoreError::new(kind, e.to_string())
    }
}
