use praxis_core::error::CoreError;
use praxis_core::models::instance::InstanceStatus;
use praxis_store::error::{StoreError, StoreErrorKind};
use thiserror::Error;
use uuid::Uuid;

/// The stable set of failures the engine reports. Store errors are
/// classified into these at the engine boundary and never escape raw.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("template catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Backend access policies are misconfigured (e.g. recursive policies).
    #[error("backend configuration error: {0}")]
    Configuration(String),

    #[error("fetch failed: {0}")]
    FetchFailed(String),

    #[error("template not found: {0}")]
    TemplateNotFound(Uuid),

    #[error("assessment instance not found: {0}")]
    NotFound(Uuid),

    #[error("assignment failed: {0}")]
    AssignmentFailed(String),

    #[error("no clients selected for assignment")]
    EmptyAssignment,

    #[error("cannot move an instance from {from} to {to}")]
    InvalidTransition {
        from: InstanceStatus,
        to: InstanceStatus,
    },
}

impl EngineError {
    /// Classify a failed read or write against the store.
    pub fn from_store(err: StoreError) -> Self {
        match err.kind {
            StoreErrorKind::PolicyRecursion => EngineError::Configuration(err.message),
            _ => EngineError::FetchFailed(err.to_string()),
        }
    }

    /// Machine-readable code for API bodies and telemetry.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::CatalogUnavailable(_) => "catalog_unavailable",
            EngineError::Configuration(_) => "configuration_error",
            EngineError::FetchFailed(_) => "fetch_failed",
            EngineError::TemplateNotFound(_) => "template_not_found",
            EngineError::NotFound(_) => "not_found",
            EngineError::AssignmentFailed(_) => "assignment_failed",
            EngineError::EmptyAssignment => "empty_assignment",
            EngineError::InvalidTransition { .. } => "invalid_transition",
        }
    }

    /// Text suitable for showing to the therapist.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::CatalogUnavailable(_) => {
                "Assessment templates could not be loaded. Please try again.".to_string()
            }
            EngineError::Configuration(_) => {
                "Assessments are unavailable because of a server configuration problem. \
                 Please contact support."
                    .to_string()
            }
            EngineError::FetchFailed(_) => {
                "Assessments could not be loaded. Check your connection and try again.".to_string()
            }
            EngineError::TemplateNotFound(_) => {
                "The selected assessment template is no longer available.".to_string()
            }
            EngineError::NotFound(_) => "This assessment no longer exists.".to_string(),
            EngineError::AssignmentFailed(message) => {
                format!("The assessment could not be assigned: {message}")
            }
            EngineError::EmptyAssignment => "Select at least one client.".to_string(),
            EngineError::InvalidTransition { from, .. } => {
                format!("This assessment is {from} and can no longer be changed that way.")
            }
        }
    }

    /// Whether retrying the same action may succeed. Nothing in the engine
    /// retries on its own; this only drives the UI.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::CatalogUnavailable(_)
                | EngineError::FetchFailed(_)
                | EngineError::AssignmentFailed(_)
        )
    }
}

impl From<CoreError> for EngineError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidTransition { from, to } => EngineError::InvalidTransition { from, to },
            other => EngineError::FetchFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_recursion_becomes_configuration_error() {
        let err = EngineError::from_store(StoreError::policy_recursion("loop in clients policy"));
        assert_eq!(err, EngineError::Configuration("loop in clients policy".to_string()));
        assert!(!err.is_retryable());
        assert!(err.user_message().contains("contact support"));
    }

    #[test]
    fn other_store_failures_are_fetch_failures() {
        for kind in [
            StoreErrorKind::Transient,
            StoreErrorKind::Timeout,
            StoreErrorKind::Unauthorized,
            StoreErrorKind::Decode,
        ] {
            let err = EngineError::from_store(StoreError::new(kind, "boom"));
            assert_eq!(err.code(), "fetch_failed");
            assert!(err.is_retryable());
        }
    }
}
