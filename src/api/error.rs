//! Request-level errors and their HTTP rendering.

use http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::response::{IntoResponse, Json};
use crate::store::StoreError;
use crate::validation::{FieldViolation, ValidationError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Post not found")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("router state `{0}` is not configured")]
    MissingState(&'static str),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MissingState(_) | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound,
        }
    }
}

#[derive(Serialize)]
struct Detail<T> {
    detail: T,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> crate::Response {
        let status = self.status_code();
        match self {
            Self::Validation(err) => {
                warn!(error = %err, "rejected input");
                let detail: Vec<FieldViolation> = err.violations().to_vec();
                (status, Json(Detail { detail })).into_response()
            }
            Self::NotFound => (status, Json(Detail { detail: "Post not found" })).into_response(),
            other => {
                error!(error = %other, "request failed");
                (status, Json(Detail { detail: "Internal Server Error" })).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_renders_fastapi_style_detail() {
        let res = ApiError::NotFound.into_response();
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(res.body(), br#"{"detail":"Post not found"}"#);
    }

    #[test]
    fn validation_renders_violation_list() {
        let err = ValidationError::single("title", "length", "too short");
        let res = ApiError::from(err).into_response();
        assert_eq!(res.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["detail"][0]["field"], "title");
        assert_eq!(body["detail"][0]["code"], "length");
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let res = ApiError::MissingState("PostStore").into_response();
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.body(), br#"{"detail":"Internal Server Error"}"#);
    }
}
