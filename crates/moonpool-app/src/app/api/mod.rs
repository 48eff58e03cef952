mod app_specific;
mod calendar;

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Response, Router};
use serde::Serialize;

use crate::error::AppError;
use crate::middleware::identity::IdentityMiddleware;
use moonpool_core::error::CoreError;

// Re-export route constants from core
pub use moonpool_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, CALENDAR_ROUTE_COMPONENT, CALENDAR_ROUTE_PREFIX,
};

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            field: None,
        }
    }
}

/// Renders a JSON error body with the given status.
pub fn render_error(res: &mut Response, status: StatusCode, message: impl Into<String>) {
    res.status_code(status);
    res.render(Json(ErrorResponse::new(message)));
}

/// ## Summary
/// Maps an [`AppError`] to its HTTP status and JSON body.
///
/// Validation errors carry the offending field; everything unexpected
/// collapses to a 500 with a generic message so internals never leak.
pub fn render_app_error(res: &mut Response, err: &AppError) {
    match err {
        AppError::CoreError(core) => match core {
            CoreError::ValidationError { field, message } => {
                res.status_code(StatusCode::BAD_REQUEST);
                res.render(Json(ErrorResponse {
                    error: message.clone(),
                    field: Some(field.clone()),
                }));
            }
            CoreError::AuthenticationRequired => {
                render_error(res, StatusCode::UNAUTHORIZED, "Authentication required");
            }
            CoreError::AccessDenied(message) => {
                render_error(res, StatusCode::FORBIDDEN, message.clone());
            }
            CoreError::NotFound(message) => {
                render_error(res, StatusCode::NOT_FOUND, message.clone());
            }
            CoreError::Expired => {
                render_error(res, StatusCode::GONE, "Share link has expired");
            }
            other => {
                tracing::error!(error = %other, "Unexpected core error");
                render_error(
                    res,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                );
            }
        },
        // Calendar parse failures surface the parser's message
        AppError::RfcError(rfc) => {
            render_error(res, StatusCode::BAD_REQUEST, rfc.to_string());
        }
        AppError::DatabaseError(db) => {
            tracing::error!(error = %db, "Database error");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
        }
    }
}

/// ## Summary
/// Constructs the main API router.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .hoop(IdentityMiddleware)
        .push(app_specific::routes())
        .push(calendar::routes())
}
