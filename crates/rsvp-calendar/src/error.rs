//! Errors raised by calendar response operations.

use rsvp_core::{AppError, AuthError, ConfigError, NetworkError};
use thiserror::Error;

/// Failure surfaced by the item service that performs the remote create.
///
/// The response core never inspects these; they are handed back unchanged
/// inside [`ResponseError::RemoteOperationFailed`].
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// The service processed the request and rejected it.
    #[error("{code}: {message}")]
    Fault { code: String, message: String },
}

impl ServiceError {
    /// Whether this error should trigger a token refresh.
    pub fn should_refresh_token(&self) -> bool {
        matches!(self, Self::Auth(AuthError::TokenExpired))
    }

    /// Whether the caller may safely repeat the whole disposition call.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited(_) => true,
            Self::Network(NetworkError::ConnectionFailed(_)) => true,
            Self::Network(NetworkError::ServerError { status, .. }) => *status == 503,
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ResponseError {
    /// A caller-supplied argument was rejected before any remote call.
    #[error("Invalid argument `{param}`: {message}")]
    InvalidArgument {
        param: &'static str,
        message: String,
    },

    /// The reference item cannot produce the requested response.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Remote operation failed: {0}")]
    RemoteOperationFailed(#[from] ServiceError),
}

impl ResponseError {
    pub fn invalid_argument(param: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            param,
            message: message.into(),
        }
    }

    /// Name of the rejected parameter, for argument errors.
    pub fn param(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { param, .. } => Some(*param),
            _ => None,
        }
    }

    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidArgument { param, .. } => {
                format!("The value for {} is not valid.", param)
            }
            Self::InvalidOperation(msg) => format!("This response isn't possible: {}", msg),
            Self::RemoteOperationFailed(ServiceError::Network(e)) => e.user_message().to_string(),
            Self::RemoteOperationFailed(ServiceError::Auth(e)) => e.user_message().to_string(),
            Self::RemoteOperationFailed(ServiceError::Config(e)) => e.user_message().to_string(),
            Self::RemoteOperationFailed(ServiceError::RateLimited(secs)) => {
                format!("Too many requests. Please wait {} seconds.", secs)
            }
            Self::RemoteOperationFailed(ServiceError::ItemNotFound(_)) => {
                "The meeting no longer exists.".to_string()
            }
            Self::RemoteOperationFailed(ServiceError::Fault { message, .. }) => {
                format!("The server rejected the response: {}", message)
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RemoteOperationFailed(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Network(e) => AppError::Network(e),
            ServiceError::Auth(e) => AppError::Auth(e),
            ServiceError::Config(e) => AppError::Config(e),
            other => AppError::Response(other.to_string()),
        }
    }
}

impl From<ResponseError> for AppError {
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::RemoteOperationFailed(e) => e.into(),
            other => AppError::Response(other.to_string()),
        }
    }
}
