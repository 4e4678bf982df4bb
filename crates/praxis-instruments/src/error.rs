use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("invalid interpretation rules: {0}")]
    Validation(#[from] ValidationError),
}
