use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use praxis_engine::EngineError;
use serde::Serialize;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    Engine(EngineError),
    NotFound(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    retryable: bool,
}

fn engine_status(e: &EngineError) -> StatusCode {
    match e {
        EngineError::NotFound(_) | EngineError::TemplateNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::EmptyAssignment => StatusCode::BAD_REQUEST,
        EngineError::InvalidTransition { .. } => StatusCode::CONFLICT,
        EngineError::FetchFailed(_) | EngineError::AssignmentFailed(_) => StatusCode::BAD_GATEWAY,
        EngineError::CatalogUnavailable(_) | EngineError::Configuration(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Engine(e) => {
                let status = engine_status(&e);
                if status.is_server_error() {
                    tracing::error!(code = e.code(), "engine error: {e}");
                } else {
                    tracing::debug!(code = e.code(), "request rejected: {e}");
                }
                (
                    status,
                    ErrorBody {
                        error: e.user_message(),
                        code: e.code(),
                        retryable: e.is_retryable(),
                    },
                )
            }
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: msg,
                    code: "not_found",
                    retryable: false,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError::Engine(e)
    }
}
