use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tiffin_core::{ErrorCode, ServiceError};

/// Boundary error: a classified [`ServiceError`] rendered as JSON.
#[derive(Debug)]
pub struct AppError(pub ServiceError);

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorCode::Aborted => StatusCode::CONFLICT,
        ErrorCode::Internal | ErrorCode::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let ServiceError { code, message } = self.0;
        if code == ErrorCode::Internal {
            tracing::error!("Internal Server Error: {}", message);
        }

        let body = Json(json!({
            "code": code,
            "error": message,
        }));

        (status_for(code), body).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

/// Undecodable request bodies are the caller's fault.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ServiceError::invalid_argument(rejection.body_text()))
    }
}
