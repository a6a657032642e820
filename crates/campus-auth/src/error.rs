//! Typed failures of the token codec and the authentication flows.

use campus_core::error::{AppError, ErrorKind};
use thiserror::Error;

/// Why a token failed verification.
///
/// Every variant means the same thing to a caller: the token is not
/// valid. The cause exists for logging and must not drive security
/// decisions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not a well-formed token, or a required claim is missing.
    #[error("malformed token")]
    Malformed,
    /// The signature does not match the contents.
    #[error("invalid token signature")]
    BadSignature,
    /// The token is past its expiry.
    #[error("token has expired")]
    Expired,
    /// The token was signed with an algorithm other than HS256.
    #[error("unsupported signing algorithm")]
    UnsupportedAlgorithm,
    /// The `iss` claim does not name this service.
    #[error("unexpected token issuer")]
    WrongIssuer,
    /// The signing secret was missing or malformed at startup.
    #[error("signing key unavailable")]
    SigningKeyUnavailable,
    /// Signing failed while issuing.
    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Failure of an authentication, refresh or credential operation.
///
/// `InvalidCredentials` and `Unauthorized` are deliberately coarse: they
/// never reveal whether a login exists, which check failed, or why a
/// token was rejected.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown login or wrong secret.
    #[error("invalid login or password")]
    InvalidCredentials,
    /// Too many failed attempts; the lock has not yet expired.
    #[error("account is temporarily locked")]
    AccountLocked {
        /// Time until the lock lapses, when the store could report it.
        retry_after_ms: Option<u64>,
    },
    /// The principal has been deactivated.
    #[error("account is inactive")]
    AccountInactive,
    /// Bad, expired, revoked or superseded token.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
    /// A new credential failed the password policy.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The security store or directory is unreachable. The only retryable failure.
    #[error("authentication temporarily unavailable")]
    Unavailable(#[source] AppError),
    /// Any other infrastructure failure.
    #[error("internal authentication error")]
    Internal(#[source] AppError),
}

impl AuthError {
    /// Whether the caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind {
            ErrorKind::ServiceUnavailable => Self::Unavailable(err),
            ErrorKind::Validation => Self::Validation(err.message),
            _ => Self::Internal(err),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::Unauthorized(_) => {
                AppError::authentication(err.to_string())
            }
            AuthError::AccountInactive => AppError::authentication(err.to_string()),
            AuthError::AccountLocked { .. } => AppError::locked(err.to_string()),
            AuthError::Validation(message) => AppError::validation(message),
            AuthError::Unavailable(inner) | AuthError::Internal(inner) => inner,
        }
    }
}
