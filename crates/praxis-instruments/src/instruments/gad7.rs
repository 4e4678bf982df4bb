use praxis_core::models::scoring::{
    ClinicalCutoff, InterpretationRange, ScoreRange, ScoreType, ScoringConfig, SeverityLevel,
};

use crate::Instrument;

/// GAD-7: Generalized Anxiety Disorder scale.
/// 7 items rated 0–3. Total 0–21.
pub struct Gad7;

impl Instrument for Gad7 {
    fn id(&self) -> &str {
        "gad7"
    }

    fn name(&self) -> &str {
        "GAD-7 (Generalized Anxiety Disorder Scale)"
    }

    fn abbreviation(&self) -> &str {
        "GAD-7"
    }

    fn category(&self) -> &str {
        "anxiety"
    }

    fn description(&self) -> &str {
        "Screens for generalized anxiety disorder and measures symptom severity."
    }

    fn instructions(&self) -> &str {
        "Over the last 2 weeks, how often have you been bothered by the following problems?"
    }

    fn estimated_duration_minutes(&self) -> u32 {
        3
    }

    fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            item_count: 7,
            item_range: ScoreRange {
                min: 0.0,
                max: 3.0,
                step: Some(1.0),
            },
            total_range: ScoreRange {
                min: 0.0,
                max: 21.0,
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
                    band(0.0, 4.0, "Minimal anxiety", SeverityLevel::Minimal),
                    band(5.0, 9.0, "Mild anxiety", SeverityLevel::Mild),
                    band(10.0, 14.0, "Moderate anxiety", SeverityLevel::Moderate),
                    band(15.0, 21.0, "Severe anxiety", SeverityLevel::Severe),
                ]
            });
        &RULES
    }

    fn clinical_cutoffs(&self) -> Vec<ClinicalCutoff> {
        vec![ClinicalCutoff {
            label: "Probable anxiety disorder".to_string(),
            score: 10.0,
            description: "Reasonable cut point for identifying probable GAD.".to_string(),
        }]
    }
}

fn band(min: f64, max: f64, label: &str, severity: SeverityLevel) -> InterpretationRange {
    InterpretationRange {
        min,
        max,
        label: label.to_string(),
        description: format!("Total score {min}–{max}."),
        severity: Some(severity),
    }
}
