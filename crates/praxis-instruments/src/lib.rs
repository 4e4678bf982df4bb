//! praxis-instruments
//!
//! Built-in assessment instrument definitions. Pure data, no I/O. Each
//! instrument describes its scoring configuration and interpretation bands
//! and can render itself as a catalog [`Template`].

pub mod error;
pub mod instruments;
pub mod validation;

use praxis_core::models::scoring::{ClinicalCutoff, InterpretationRange, ScoringConfig};
use praxis_core::models::template::Template;
use uuid::Uuid;

use error::InstrumentError;
use validation::ValidationError;

/// Namespace for deriving stable template ids from instrument ids.
const TEMPLATE_NAMESPACE: Uuid = Uuid::from_u128(0x5f0c_94a1_7d3e_4b2a_9c61_0e8f_2d47_b913);

/// Trait implemented by each built-in assessment instrument.
pub trait Instrument: Send + Sync {
    /// Unique identifier for this instrument (e.g., "phq9", "gad7").
    fn id(&self) -> &str;

    /// Display name, also the default title of assigned instances.
    fn name(&self) -> &str;

    /// Short label (e.g., "PHQ-9").
    fn abbreviation(&self) -> &str;

    fn category(&self) -> &str;

    fn version(&self) -> &str {
        "1.0"
    }

    fn description(&self) -> &str;

    /// Instructions shown to the client.
    fn instructions(&self) -> &str;

    fn estimated_duration_minutes(&self) -> u32;

    fn scoring_config(&self) -> ScoringConfig;

    /// Interpretation bands, ordered by score.
    fn interpretation_rules(&self) -> &[InterpretationRange];

    fn clinical_cutoffs(&self) -> Vec<ClinicalCutoff> {
        Vec::new()
    }

    /// Stable template id, identical across processes.
    fn template_id(&self) -> Uuid {
        Uuid::new_v5(&TEMPLATE_NAMESPACE, self.id().as_bytes())
    }

    /// Check the interpretation bands against the scoring configuration.
    fn validate_rules(&self) -> Vec<ValidationError> {
        validation::validate_rules(
            self.abbreviation(),
            &self.scoring_config(),
            self.interpretation_rules(),
        )
    }

    /// Render this instrument as an active catalog template.
    fn to_template(&self, now: jiff::Timestamp) -> Template {
        Template {
            id: self.template_id(),
            name: self.name().to_string(),
            abbreviation: self.abbreviation().to_string(),
            description: Some(self.description().to_string()),
            category: self.category().to_string(),
            version: self.version().to_string(),
            instructions: Some(self.instructions().to_string()),
            scoring_config: self.scoring_config(),
            interpretation_rules: self.interpretation_rules().to_vec(),
            clinical_cutoffs: self.clinical_cutoffs(),
            estimated_duration_minutes: Some(self.estimated_duration_minutes()),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Return all registered instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![
        Box::new(instruments::phq9::Phq9),
        Box::new(instruments::gad7::Gad7),
        Box::new(instruments::pcl5::Pcl5),
    ]
}

/// Look up an instrument by ID.
pub fn get_instrument(id: &str) -> Option<Box<dyn Instrument>> {
    all_instruments().into_iter().find(|i| i.id() == id)
}

/// Templates for every built-in instrument, after checking their rules.
pub fn builtin_templates(now: jiff::Timestamp) -> Result<Vec<Template>, InstrumentError> {
    all_instruments()
        .iter()
        .map(|instrument| {
            if let Some(err) = instrument.validate_rules().into_iter().next() {
                return Err(InstrumentError::Validation(err));
            }
            Ok(instrument.to_template(now))
        })
        .collect()
}
