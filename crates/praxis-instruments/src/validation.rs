use praxis_core::models::scoring::{InterpretationRange, ScoringConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    /// Index of the offending band, if the problem is local to one.
    pub band: Option<usize>,
    pub message: String,
}

/// Check that interpretation bands are well formed, ascending,
/// non-overlapping and cover the whole total-score range without gaps.
pub fn validate_rules(
    label: &str,
    config: &ScoringConfig,
    rules: &[InterpretationRange],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let total = config.total_range;
    let step = total.step.unwrap_or(0.0);

    let (Some(first), Some(last)) = (rules.first(), rules.last()) else {
        errors.push(ValidationError {
            band: None,
            message: format!("{label}: no interpretation bands"),
        });
        return errors;
    };

    for (i, band) in rules.iter().enumerate() {
        if band.min > band.max {
            errors.push(ValidationError {
                band: Some(i),
                message: format!(
                    "{label}: band '{}' has min {} above max {}",
                    band.label, band.min, band.max
                ),
            });
        }
    }

    for (i, pair) in rules.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.min <= prev.max {
            errors.push(ValidationError {
                band: Some(i + 1),
                message: format!(
                    "{label}: band '{}' overlaps '{}'",
                    next.label, prev.label
                ),
            });
        } else if next.min - prev.max > step + 1e-9 {
            errors.push(ValidationError {
                band: Some(i + 1),
                message: format!(
                    "{label}: gap between '{}' and '{}'",
                    prev.label, next.label
                ),
            });
        }
    }

    if (first.min - total.min).abs() > 1e-9 || (last.max - total.max).abs() > 1e-9 {
        errors.push(ValidationError {
            band: None,
            message: format!(
                "{label}: bands cover [{}, {}] but scores range over [{}, {}]",
                first.min, last.max, total.min, total.max
            ),
        });
    }

    errors
}
