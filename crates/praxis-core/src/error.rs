use thiserror::Error;

use crate::models::instance::InstanceStatus;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid instance status: {0}")]
    InvalidStatus(String),

    #[error("cannot move an instance from {from} to {to}")]
    InvalidTransition {
        from: InstanceStatus,
        to: InstanceStatus,
    },
}
