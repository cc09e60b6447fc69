use thiserror::Error;

/// Coarse classification of an [`ExchangeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid credentials and settings
    Configuration,
    /// Caller-supplied parameter rejected before any I/O
    Validation,
    /// Connection, timeout or non-success HTTP status
    Transport,
    /// Well-formed response signalling a business failure
    Exchange,
    /// Malformed or unexpected frame or payload
    Protocol,
    /// Rejected signature or handshake
    Authentication,
}

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Invalid parameters: {0}")]
    ValidationError(String),

    #[error("Network error on {endpoint} (params: {params}): {message}")]
    NetworkError {
        endpoint: String,
        params: String,
        message: String,
    },

    #[error("Request to {endpoint} timed out (params: {params})")]
    Timeout { endpoint: String, params: String },

    #[error("HTTP {status} from {endpoint}: {body}")]
    HttpError {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("API error: {code} - {message}")]
    ApiError { code: String, message: String },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ExchangeError {
    /// Transport failure without request parameters, used by the WebSocket layer.
    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkError {
            endpoint: endpoint.into(),
            params: String::new(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigurationError(_) | Self::ConfigError(_) => ErrorKind::Configuration,
            Self::ValidationError(_) => ErrorKind::Validation,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::HttpError { .. } => {
                ErrorKind::Transport
            }
            Self::ApiError { .. } => ErrorKind::Exchange,
            Self::AuthError(_) => ErrorKind::Authentication,
            Self::ProtocolError(_)
            | Self::DeserializationError(_)
            | Self::SerializationError(_) => ErrorKind::Protocol,
        }
    }

    /// Whether a caller may reasonably retry the same request.
    ///
    /// The crate never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkError { .. } | Self::Timeout { .. } => true,
            Self::HttpError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Authentication)
            || matches!(self, Self::HttpError { status: 401 | 403, .. })
    }
}
