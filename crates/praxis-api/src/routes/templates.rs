use axum::Json;
use axum::extract::State;
use praxis_core::models::template::Template;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct TemplateListing {
    pub templates: Vec<Template>,
    /// Set when the catalog could only be listed as empty because of a
    /// backend policy problem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

pub async fn list_templates(
    State(state): State<AppState>,
) -> Result<Json<TemplateListing>, ApiError> {
    let listing = state.engine.list_active_templates().await?;
    Ok(Json(TemplateListing {
        templates: listing.templates,
        warning: listing.degraded.map(|e| e.user_message()),
    }))
}
