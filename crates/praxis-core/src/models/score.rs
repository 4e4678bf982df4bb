use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::instance::Instance;

/// One computed result for an instance. Written by the external scoring
/// process; several may exist per instance over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Score {
    pub id: Uuid,
    pub instance_id: Uuid,
    pub raw_score: Option<f64>,
    pub scaled_score: Option<f64>,
    pub percentile: Option<f64>,
    pub t_score: Option<f64>,
    pub z_score: Option<f64>,
    pub interpretation_category: Option<String>,
    pub interpretation_description: Option<String>,
    pub clinical_significance: Option<String>,
    pub severity_level: Option<String>,
    pub recommendations: Option<String>,
    pub calculated_at: jiff::Timestamp,
}

/// A completed instance paired with its current score, for result listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstanceResult {
    pub instance: Instance,
    pub score: Score,
}

/// The current score among `scores`: the one calculated last.
pub fn latest<'a>(scores: impl IntoIterator<Item = &'a Score>) -> Option<&'a Score> {
    scores.into_iter().max_by_key(|s| s.calculated_at)
}

/// Reduce a score history to the current score per instance.
pub fn latest_by_instance<'a>(
    scores: impl IntoIterator<Item = &'a Score>,
) -> HashMap<Uuid, &'a Score> {
    let mut current: HashMap<Uuid, &Score> = HashMap::new();
    for score in scores {
        current
            .entry(score.instance_id)
            .and_modify(|held| {
                if score.calculated_at > held.calculated_at {
                    *held = score;
                }
            })
            .or_insert(score);
    }
    current
}
