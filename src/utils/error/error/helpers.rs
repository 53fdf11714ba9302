//! Helper functions for creating specific error types

use super::types::GatewayError;

/// Helper functions for creating specific errors
impl GatewayError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn database<S: Into<String>>(message: S) -> Self {
        Self::Database(message.into())
    }

    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn upstream_timeout<S: Into<String>>(message: S) -> Self {
        Self::UpstreamTimeout(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn runtime<S: Into<String>>(message: S) -> Self {
        Self::Runtime(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn external<S: Into<String>>(message: S) -> Self {
        Self::External(message.into())
    }

    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Build the error for an upstream HTTP status.
    ///
    /// 4xx statuses become [`GatewayError::Client`], 504 becomes an upstream
    /// timeout and any other status an [`GatewayError::Upstream`] failure.
    pub fn from_status<S: Into<String>>(status: u16, message: S) -> Self {
        let message = message.into();
        match status {
            400..=499 => Self::Client { status, message },
            504 => Self::UpstreamTimeout(format!("504 {}", message)),
            _ => Self::Upstream { status, message },
        }
    }

    /// Whether the error was raised by an upstream 4xx response
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Client { .. })
    }
}
