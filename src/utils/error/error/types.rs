//! Error types for the resilience layer

use thiserror::Error;

/// Result type alias for the resilience layer
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the resilience layer
///
/// Handlers surface their outbound failures through these variants so the
/// retry executor, the circuit breakers and the pipeline's error translation
/// can interpret them.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Data-access client errors
    #[error("Database error: {0}")]
    Database(String),

    /// Connection-level failures (reset, refused, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Operation exceeded its deadline
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// An upstream dependency timed out (504 from a gateway)
    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    /// Upstream responded with a 4xx status; never retried
    #[error("Client error: {status} {message}")]
    Client { status: u16, message: String },

    /// Upstream responded with a 5xx status
    #[error("Server error: {status} {message}")]
    Upstream { status: u16, message: String },

    /// Circuit breaker rejected the call without attempting it
    #[error("Circuit breaker '{0}' is open")]
    CircuitOpen(String),

    /// Rate limiting errors
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Request rejected by the security screen
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request body exceeds the configured limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Validation errors reported by handlers
    #[error("Validation error: {0}")]
    Validation(String),

    /// Cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Programming-level failures
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),

    /// External service errors that carry no structured status
    #[error("External service error: {0}")]
    External(String),
}
