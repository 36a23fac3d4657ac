use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::database::StoreError;
use crate::patch::{CodecError, PatchError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("User {0} not found")]
    NotFound(i32),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Malformed patch: {0}")]
    PatchFormat(String),
    #[error("Patch could not be applied: {0}")]
    PatchApplication(#[from] PatchError),
    #[error("Stored user could not be encoded: {0}")]
    Encode(#[source] CodecError),
    #[error("Patched document is not a valid user: {0}")]
    Decode(#[from] CodecError),
    #[error("Database error: {0}")]
    Database(#[from] StoreError),
}

impl AppError {
    /// Patch failures answer with a bare 400 and no body.
    fn is_patch_failure(&self) -> bool {
        matches!(
            self,
            AppError::PatchFormat(_) | AppError::PatchApplication(_) | AppError::Decode(_)
        )
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_)
            | AppError::PatchFormat(_)
            | AppError::PatchApplication(_)
            | AppError::Decode(_) => StatusCode::BAD_REQUEST,
            AppError::Encode(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_patch_failure() {
            return HttpResponse::BadRequest().finish();
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn maps_status_codes() {
        assert_eq!(AppError::NotFound(1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::PatchFormat("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::PatchApplication(PatchError::RemoveRoot).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database(StoreError::Poisoned).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Encode(CodecError::NotAnObject).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Decode(CodecError::NotAnObject).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn encode_failure_has_json_error() {
        let response = AppError::Encode(CodecError::NotAnObject).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().try_into_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
    }

    #[test]
    fn patch_failures_have_empty_body() {
        let response = AppError::PatchApplication(PatchError::TestFailed("/a".into())).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().try_into_bytes().unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn not_found_has_json_error() {
        let response = AppError::NotFound(42).error_response();
        let body = response.into_body().try_into_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "User 42 not found");
    }
}
