use praxis_core::models::scoring::{
    ClinicalCutoff, InterpretationRange, ScoreRange, ScoreType, ScoringConfig,
};

use crate::Instrument;

/// PCL-5: PTSD Checklist for DSM-5.
/// 20 items rated 0–4. Total 0–80; 31–33 is the usual provisional cutoff.
pub struct Pcl5;

impl Instrument for Pcl5 {
    fn id(&self) -> &str {
        "pcl5"
    }

    fn name(&self) -> &str {
        "PCL-5 (PTSD Checklist for DSM-5)"
    }

    fn abbreviation(&self) -> &str {
        "PCL-5"
    }

    fn category(&self) -> &str {
        "trauma"
    }

    fn description(&self) -> &str {
        "Self-report measure of the 20 DSM-5 symptoms of PTSD."
    }

    fn instructions(&self) -> &str {
        "In the past month, how much were you bothered by each of the following problems?"
    }

    fn estimated_duration_minutes(&self) -> u32 {
        10
    }

    fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            item_count: 20,
            item_range: ScoreRange {
                min: 0.0,
                max: 4.0,
                step: Some(1.0),
            },
            total_range: ScoreRange {
                min: 0.0,
                max: 80.0,
                step: Some(1.0),
            },
            score_types: vec![ScoreType::Raw],
            reverse_scored_items: vec![],
        }
    }

    fn interpretation_rules(&self) -> &[InterpretationRange] {
        static RULES: std::sync::LazyLock<Vec<InterpretationRange>> =
            std::sync::LazyLock::new(|| {
                vec![
                    InterpretationRange {
                        min: 0.0,
                        max: 32.0,
                        label: "Below provisional threshold".to_string(),
                        description: "Symptoms below the level typically associated with PTSD.".to_string(),
                        severity: None,
                    },
                    InterpretationRange {
                        min: 33.0,
                        max: 80.0,
                        label: "Probable PTSD".to_string(),
                        description: "Follow up with a structured clinical interview.".to_string(),
                        severity: None,
                    },
                ]
            });
        &RULES
    }

    fn clinical_cutoffs(&self) -> Vec<ClinicalCutoff> {
        vec![ClinicalCutoff {
            label: "Provisional PTSD diagnosis".to_string(),
            score: 33.0,
            description: "Lower cutoffs (31–32) suit screening where missed cases are costly.".to_string(),
        }]
    }
}
