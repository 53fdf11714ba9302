//! HTTP response handling for errors

use super::types::GatewayError;
use crate::utils::error::utils::ErrorUtils;
use actix_web::http::header::{HeaderName, HeaderValue, RETRY_AFTER};
use actix_web::{HttpResponse, ResponseError};

/// Header carrying the error category code
pub const ERROR_TYPE_HEADER: HeaderName = HeaderName::from_static("x-error-type");

impl ResponseError for GatewayError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        ErrorUtils::describe(self, false).status
    }

    fn error_response(&self) -> HttpResponse {
        // Errors rendered outside the pipeline carry no request context, so
        // they always get the sanitized message.
        let described = ErrorUtils::describe(self, true);

        let error_response = ErrorResponse::new(described.category.code(), described.message, None);

        let mut builder = HttpResponse::build(described.status);
        builder.insert_header((
            ERROR_TYPE_HEADER,
            HeaderValue::from_static(described.category.code()),
        ));
        if let Some(secs) = described.retry_after_secs {
            builder.insert_header((RETRY_AFTER, secs.to_string()));
        }
        builder.json(error_response)
    }
}

/// Standard error response format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: String, request_id: Option<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
                request_id,
            },
        }
    }
}
