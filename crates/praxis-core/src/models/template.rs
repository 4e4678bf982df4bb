use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::scoring::{self, ClinicalCutoff, InterpretationRange, ScoringConfig};

/// A reusable assessment definition. Maintained by catalog administration;
/// read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub abbreviation: String,
    pub description: Option<String>,
    pub category: String,
    pub version: String,
    pub instructions: Option<String>,
    pub scoring_config: ScoringConfig,
    pub interpretation_rules: Vec<InterpretationRange>,
    #[serde(default)]
    pub clinical_cutoffs: Vec<ClinicalCutoff>,
    pub estimated_duration_minutes: Option<u32>,
    pub is_active: bool,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Template {
    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id,
            name: self.name.clone(),
            abbreviation: self.abbreviation.clone(),
            category: self.category.clone(),
        }
    }

    pub fn interpret(&self, raw_score: f64) -> Option<&InterpretationRange> {
        scoring::interpret(&self.interpretation_rules, raw_score)
    }
}

/// The slice of a template an instance listing is annotated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TemplateSummary {
    pub id: Uuid,
    pub name: String,
    pub abbreviation: String,
    pub category: String,
}
