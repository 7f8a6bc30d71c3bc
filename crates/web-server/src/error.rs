use api_client::ApiError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use store::LookupError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),
    #[error("Backend error: {0}")]
    Backend(#[from] ApiError),
}

/// Status code for a failed currency lookup, shared by the HTML and JSON routes.
pub fn lookup_status(err: &LookupError) -> StatusCode {
    match err {
        LookupError::MissingCurrency => StatusCode::BAD_REQUEST,
        LookupError::NotFound(_) => StatusCode::NOT_FOUND,
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Lookup(lookup_err) => (lookup_status(&lookup_err), lookup_err.to_string()),
            AppError::Backend(api_err) => {
                tracing::error!(error = ?api_err, "Analytics backend error.");
                (
                    StatusCode::BAD_GATEWAY,
                    "The analytics backend request failed".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
