//! Authorization endpoint error types.
//!
//! This module defines the errors raised by the provider collaborator and by
//! the endpoint itself. Domain errors are always turned into an RFC 6749
//! error response; everything else is treated as an unexpected fault and
//! reported as `server_error`.

use std::fmt;

use crate::oauth::authorize::AuthorizationErrorCode;

/// Errors that can occur while processing an authorization request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The redirect URI is missing, ambiguous, or not registered for the client.
    #[error("Invalid redirect URI: {message}")]
    InvalidRedirectUri {
        /// Description of why the redirect URI was rejected.
        message: String,
    },

    /// The requested scope is not allowed for the client.
    #[error("Invalid scope: {message}")]
    InvalidScope {
        /// Description of why the scope was rejected.
        message: String,
    },

    /// The provider refused the authorization request with a protocol error.
    #[error("Authorization refused: {error}")]
    Authorize {
        /// RFC 6749 error code to report to the client.
        error: AuthorizationErrorCode,
        /// Human-readable description (optional).
        description: Option<String>,
    },

    /// The request body could not be read.
    #[error("Failed to read request body: {message}")]
    BodyRead {
        /// Description of the transport failure.
        message: String,
    },

    /// The provider failed to load or store data.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `InvalidRedirectUri` error.
    #[must_use]
    pub fn invalid_redirect_uri(message: impl Into<String>) -> Self {
        Self::InvalidRedirectUri {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidScope` error.
    #[must_use]
    pub fn invalid_scope(message: impl Into<String>) -> Self {
        Self::InvalidScope {
            message: message.into(),
        }
    }

    /// Creates a new `Authorize` error with a description.
    #[must_use]
    pub fn authorize(error: AuthorizationErrorCode, description: impl Into<String>) -> Self {
        Self::Authorize {
            error,
            description: Some(description.into()),
        }
    }

    /// Creates a new `BodyRead` error.
    #[must_use]
    pub fn body_read(message: impl Into<String>) -> Self {
        Self::BodyRead {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if the error belongs to the authorization protocol and
    /// has a well-defined error response.
    ///
    /// Anything else is a fault that the endpoint reports as `server_error`.
    #[must_use]
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRedirectUri { .. } | Self::InvalidScope { .. } | Self::Authorize { .. }
        )
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRedirectUri { .. } => ErrorCategory::Validation,
            Self::InvalidScope { .. } | Self::Authorize { .. } => ErrorCategory::Authorization,
            Self::BodyRead { .. } | Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the OAuth 2.0 error code for this error.
    #[must_use]
    pub fn oauth_error_code(&self) -> AuthorizationErrorCode {
        match self {
            Self::InvalidRedirectUri { .. } => AuthorizationErrorCode::InvalidRequest,
            Self::InvalidScope { .. } => AuthorizationErrorCode::InvalidScope,
            Self::Authorize { error, .. } => *error,
            Self::BodyRead { .. } | Self::Storage { .. } | Self::Internal { .. } => {
                AuthorizationErrorCode::ServerError
            }
        }
    }

    /// Returns the description that may be shown to the client.
    ///
    /// Faults never expose their internal message.
    #[must_use]
    pub fn public_description(&self) -> Option<String> {
        match self {
            Self::InvalidRedirectUri { message } | Self::InvalidScope { message } => {
                Some(message.clone())
            }
            Self::Authorize { description, .. } => description.clone(),
            Self::BodyRead { .. } | Self::Storage { .. } | Self::Internal { .. } => None,
        }
    }
}

/// Categories of endpoint errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Request or redirect URI validation errors.
    Validation,
    /// Scope and consent related errors.
    Authorization,
    /// Provider storage and request transport errors.
    Infrastructure,
    /// Internal server errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Authorization => write!(f, "authorization"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::invalid_redirect_uri("not registered");
        assert_eq!(err.to_string(), "Invalid redirect URI: not registered");

        let err = AuthError::authorize(AuthorizationErrorCode::AccessDenied, "user said no");
        assert_eq!(err.to_string(), "Authorization refused: access_denied");

        let err = AuthError::storage("connection reset");
        assert_eq!(err.to_string(), "Storage error: connection reset");
    }

    #[test]
    fn test_domain_errors() {
        assert!(AuthError::invalid_redirect_uri("x").is_domain_error());
        assert!(AuthError::invalid_scope("x").is_domain_error());
        assert!(AuthError::Authorize {
                error: AuthorizationErrorCode::AccessDenied,
                description: None,
            }
            .is_domain_error());

        assert!(!AuthError::body_read("x").is_domain_error());
        assert!(!AuthError::storage("x").is_domain_error());
        assert!(!AuthError::internal("x").is_domain_error());
    }

    #[test]
    fn test_oauth_error_code() {
        assert_eq!(
            AuthError::invalid_redirect_uri("x").oauth_error_code(),
            AuthorizationErrorCode::InvalidRequest
        );
        assert_eq!(
            AuthError::invalid_scope("x").oauth_error_code(),
            AuthorizationErrorCode::InvalidScope
        );
        assert_eq!(
            AuthError::Authorize {
                error: AuthorizationErrorCode::TemporarilyUnavailable,
                description: None,
            }
            .oauth_error_code(),
            AuthorizationErrorCode::TemporarilyUnavailable
        );
        assert_eq!(
            AuthError::storage("db down").oauth_error_code(),
            AuthorizationErrorCode::ServerError
        );
    }

    #[test]
    fn test_faults_hide_their_message() {
        assert_eq!(AuthError::internal("stack trace here").public_description(), None);
        assert_eq!(
            AuthError::invalid_scope("Client was not registered with scope admin")
                .public_description()
                .as_deref(),
            Some("Client was not registered with scope admin")
        );
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::invalid_redirect_uri("x").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            AuthError::invalid_scope("x").category(),
            ErrorCategory::Authorization
        );
        assert_eq!(
            AuthError::storage("x").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(ErrorCategory::Internal.to_string(), "internal");
    }

    #[test]
    fn test_body_read_is_infrastructure_fault() {
        let err = AuthError::body_read("length limit exceeded");

        assert_eq!(err.category(), ErrorCategory::Infrastructure);
        assert_eq!(err.oauth_error_code(), AuthorizationErrorCode::ServerError);
        assert_eq!(err.public_description(), None);
        assert_eq!(
            err.to_string(),
            "Failed to read request body: length limit exceeded"
        );
    }
}
