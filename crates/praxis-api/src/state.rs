use std::sync::Arc;

use praxis_engine::AssessmentEngine;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AssessmentEngine>,
}
