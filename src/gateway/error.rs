use crate::error::Error;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Error returned by handlers, rendered as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Map a service error. Client errors keep their message; anything else
    /// is logged and replaced by `fallback`.
    pub fn from_service(err: Error, fallback: &'static str) -> Self {
        match err {
            Error::Validation(msg) => Self::bad_request(msg),
            Error::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            err @ Error::PayloadTooLarge { .. } => {
                Self::new(StatusCode::PAYLOAD_TOO_LARGE, err.to_string())
            }
            err => {
                tracing::error!(error = %err, "{fallback}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, fallback)
            }
        }
    }

    pub fn from_multipart(err: MultipartError, limit: usize) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::from_service(Error::PayloadTooLarge { limit }, "Failed to upload file");
        }
        Self::bad_request(format!("Invalid multipart payload: {}", err.body_text()))
    }
}

/// Undecodable or ill-typed bodies are 400; only a missing JSON content
/// type (415) and body read failures keep axum's status.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::MissingJsonContentType(_) | JsonRejection::BytesRejection(_) => {
                rejection.status()
            }
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        tracing::debug!("Upload without a multipart body: {}", rejection.body_text());
        Self::bad_request("No file provided")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// `.api_context("Failed to ...")` on service results inside handlers.
pub trait ApiResultExt<T> {
    fn api_context(self, fallback: &'static str) -> Result<T, ApiError>;
}

impl<T> ApiResultExt<T> for crate::Result<T> {
    fn api_context(self, fallback: &'static str) -> Result<T, ApiError> {
        self.map_err(|err| ApiError::from_service(err, fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (Error::validation("Goal title is required"), StatusCode::BAD_REQUEST),
            (Error::not_found("Goal not found"), StatusCode::NOT_FOUND),
            (Error::PayloadTooLarge { limit: 10 }, StatusCode::PAYLOAD_TOO_LARGE),
            (Error::Internal("disk on fire".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from_service(err, "Failed").status, status);
        }
    }

    #[test]
    fn server_errors_hide_details() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/secret/path");
        let api = ApiError::from_service(io.into(), "Failed to list files");
        assert_eq!(api.message, "Failed to list files");
    }

    #[test]
    fn client_messages_pass_through() {
        let api = ApiError::from_service(Error::not_found("File not found"), "Failed");
        assert_eq!(api.message, "File not found");
    }
}
