use praxis_core::models::scoring::{
    ClinicalCutoff, InterpretationRange, ScoreRange, ScoreType, ScoringConfig, SeverityLevel,
};

use crate::Instrument;

/// PHQ-9: Patient Health Questionnaire, nine-item depression module.
/// Items rated 0–3 over the last two weeks. Total 0–27.
pub struct Phq9;

impl Instrument for Phq9 {
    fn id(&self) -> &str {
        "phq9"
    }

    fn name(&self) -> &str {
        "PHQ-9 (Patient Health Questionnaire)"
    }

    fn abbreviation(&self) -> &str {
        "PHQ-9"
    }

    fn category(&self) -> &str {
        "depression"
    }

    fn description(&self) -> &str {
        "Screens for and measures the severity of depressive symptoms."
    }

    fn instructions(&self) -> &str {
        "Over the last 2 weeks, how often have you been bothered by any of the following problems?"
    }

    fn estimated_duration_minutes(&self) -> u32 {
        5
    }

    fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            item_count: 9,
            item_range: ScoreRange {
                min: 0.0,
                max: 3.0,
                step: Some(1.0),
            },
            total_range: ScoreRange {
                min: 0.0,
                max: 27.0,
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
                    band(0.0, 4.0, "Minimal depression", "Monitor; may not require treatment.", SeverityLevel::Minimal),
                    band(5.0, 9.0, "Mild depression", "Watchful waiting; repeat PHQ-9 at follow-up.", SeverityLevel::Mild),
                    band(10.0, 14.0, "Moderate depression", "Consider counseling, follow-up and/or pharmacotherapy.", SeverityLevel::Moderate),
                    band(15.0, 19.0, "Moderately severe depression", "Active treatment with pharmacotherapy and/or psychotherapy.", SeverityLevel::ModeratelySevere),
                    band(20.0, 27.0, "Severe depression", "Immediate initiation of pharmacotherapy and expedited referral.", SeverityLevel::Severe),
                ]
            });
        &RULES
    }

    fn clinical_cutoffs(&self) -> Vec<ClinicalCutoff> {
        vec![ClinicalCutoff {
            label: "Major depression screen".to_string(),
            score: 10.0,
            description: "Scores of 10 or above warrant further evaluation.".to_string(),
        }]
    }
}

fn band(min: f64, max: f64, label: &str, description: &str, severity: SeverityLevel) -> InterpretationRange {
    InterpretationRange {
        min,
        max,
        label: label.to_string(),
        description: description.to_string(),
        severity: Some(severity),
    }
}
