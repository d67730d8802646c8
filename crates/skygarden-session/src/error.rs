//! Error types for the session layer.

use skygarden_protocol::ProtocolError;
use skygarden_storage::StorageError;

/// Why an authenticator turned a request down.
///
/// The `Display` text of every variant is the exact message shown under
/// the auth form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Login with a malformed email or short password. Login deliberately
    /// doesn't say which of the two was wrong.
    #[error("Invalid email or password. Password must be at least {min} characters.")]
    InvalidCredentials { min: usize },

    /// Registration with an email lacking `@`.
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// Registration with a password shorter than `min` characters.
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    /// Registration whose confirmation differs from the password.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// The identity provider is throttling us.
    #[error("Too many requests. Please try again later.")]
    RateLimited,

    /// The identity provider refused with its own message.
    #[error("{0}")]
    Rejected(String),
}

impl AuthError {
    /// `true` for form-level problems the user can fix by editing input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::InvalidEmail
                | Self::PasswordTooShort { .. }
                | Self::PasswordMismatch
        )
    }
}

/// Errors from [`SessionStore`](crate::SessionStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The authenticator rejected the request.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Reading or writing the persisted identity failed.
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),

    /// The identity couldn't be encoded, or the stored copy is unreadable.
    #[error("session encoding failed: {0}")]
    Codec(#[from] ProtocolError),

    /// The operation needs a signed-in user and there isn't one.
    #[error("no user is signed in")]
    NotAuthenticated,
}
