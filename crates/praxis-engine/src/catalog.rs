use std::sync::RwLock;

use praxis_core::models::template::Template;
use praxis_store::error::StoreErrorKind;
use uuid::Uuid;

use crate::engine::AssessmentEngine;
use crate::error::EngineError;

/// Result of listing the catalog. A degraded listing is still a success:
/// the dashboard renders it and shows the error alongside.
#[derive(Debug, Clone)]
pub struct CatalogListing {
    pub templates: Vec<Template>,
    pub degraded: Option<EngineError>,
}

/// The active templates as of the last successful listing.
#[derive(Default)]
pub struct TemplateCatalog {
    loaded: RwLock<Vec<Template>>,
}

impl TemplateCatalog {
    pub fn loaded(&self) -> Vec<Template> {
        self.loaded.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// An active template from the loaded set.
    pub fn find_active(&self, id: Uuid) -> Option<Template> {
        self.loaded
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .find(|t| t.id == id && t.is_active)
            .cloned()
    }

    fn replace(&self, templates: Vec<Template>) {
        *self.loaded.write().unwrap_or_else(|p| p.into_inner()) = templates;
    }
}

impl AssessmentEngine {
    /// Load active templates, ordered by name.
    ///
    /// Policy failures degrade to an empty listing; any other failure is
    /// `CatalogUnavailable` and leaves the previously loaded set in place.
    pub async fn list_active_templates(&self) -> Result<CatalogListing, EngineError> {
        match self.call("list active templates", self.store.active_templates()).await {
            Ok(mut templates) => {
                templates.retain(|t| t.is_active);
                templates.sort_by(|a, b| a.name.cmp(&b.name));
                tracing::debug!(count = templates.len(), "template catalog loaded");
                self.catalog.replace(templates.clone());
                Ok(CatalogListing {
                    templates,
                    degraded: None,
                })
            }
            Err(e) if e.kind == StoreErrorKind::NotFound => {
                self.catalog.replace(Vec::new());
                Ok(CatalogListing {
                    templates: Vec::new(),
                    degraded: None,
                })
            }
            Err(e) if e.is_policy_failure() => {
                tracing::warn!(error = %e, "template catalog degraded by access policy failure");
                self.catalog.replace(Vec::new());
                Ok(CatalogListing {
                    templates: Vec::new(),
                    degraded: Some(EngineError::Configuration(e.message)),
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "template catalog unavailable");
                Err(EngineError::CatalogUnavailable(e.to_string()))
            }
        }
    }
}
