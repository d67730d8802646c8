//! Authentication hook and the demo authenticator.
//!
//! The session store doesn't decide who a user is; an [`Authenticator`]
//! does. The demo ships [`MockAuthenticator`], which accepts any
//! well-formed email with a long-enough password after a short artificial
//! delay, so the UI behaves the same as it would against a networked
//! identity provider. A real provider implements the same trait.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::Rng;
use skygarden_protocol::{Identity, LoginRequest, RegisterRequest, Role, UserId};

use crate::AuthError;

/// Turns auth form submissions into identities.
///
/// `Send + Sync + 'static` because one authenticator is shared by every
/// connection task on the server.
pub trait Authenticator: Send + Sync + 'static {
    /// Signs an existing user in.
    fn login(
        &self,
        req: &LoginRequest,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// Creates an account and signs it in.
    fn register(
        &self,
        req: &RegisterRequest,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// Ends the provider-side session.
    fn logout(&self) -> impl Future<Output = Result<(), AuthError>> + Send;
}

impl<A: Authenticator> Authenticator for Arc<A> {
    async fn login(&self, req: &LoginRequest) -> Result<Identity, AuthError> {
        self.as_ref().login(req).await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<Identity, AuthError> {
        self.as_ref().register(req).await
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.as_ref().logout().await
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// The only email rule the demo enforces.
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@')
}

fn long_enough(password: &str, min: usize) -> bool {
    password.chars().count() >= min
}

/// Login rules: email has `@` and password has at least `min` characters.
/// Both failures share one message.
pub fn validate_login(req: &LoginRequest, min: usize) -> Result<(), AuthError> {
    if !is_valid_email(&req.email) || !long_enough(&req.password, min) {
        return Err(AuthError::InvalidCredentials { min });
    }
    Ok(())
}

/// Registration rules, checked email first, then length.
pub fn validate_register(req: &RegisterRequest, min: usize) -> Result<(), AuthError> {
    if !is_valid_email(&req.email) {
        return Err(AuthError::InvalidEmail);
    }
    if !long_enough(&req.password, min) {
        return Err(AuthError::PasswordTooShort { min });
    }
    Ok(())
}

/// Form-level check that the confirmation repeats the password.
pub fn validate_confirmation(req: &RegisterRequest) -> Result<(), AuthError> {
    if req.password != req.confirm_password {
        return Err(AuthError::PasswordMismatch);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// MockAuthenticator
// ---------------------------------------------------------------------------

/// Tunables for [`MockAuthenticator`].
#[derive(Debug, Clone)]
pub struct MockAuthConfig {
    /// Delay before a login or registration resolves.
    pub login_latency: Duration,
    /// Delay before a logout resolves.
    pub logout_latency: Duration,
    /// Minimum password length, in characters.
    pub min_password_len: usize,
    /// Role given to every new identity.
    pub default_role: Role,
}

impl Default for MockAuthConfig {
    fn default() -> Self {
        Self {
            login_latency: Duration::from_millis(800),
            logout_latency: Duration::from_millis(500),
            min_password_len: 6,
            default_role: Role::Seller,
        }
    }
}

impl MockAuthConfig {
    /// Same rules, no artificial delay. Handy for servers under test.
    pub fn instant() -> Self {
        Self {
            login_latency: Duration::ZERO,
            logout_latency: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Local, non-networked stand-in for an identity provider.
#[derive(Debug, Clone, Default)]
pub struct MockAuthenticator {
    config: MockAuthConfig,
}

impl MockAuthenticator {
    pub fn new(config: MockAuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MockAuthConfig {
        &self.config
    }

    fn mint(&self, email: &str) -> Identity {
        Identity::new(generate_user_id(), email, self.config.default_role)
    }
}

impl Authenticator for MockAuthenticator {
    async fn login(&self, req: &LoginRequest) -> Result<Identity, AuthError> {
        tokio::time::sleep(self.config.login_latency).await;
        validate_login(req, self.config.min_password_len)?;
        Ok(self.mint(&req.email))
    }

    async fn register(&self, req: &RegisterRequest) -> Result<Identity, AuthError> {
        tokio::time::sleep(self.config.login_latency).await;
        validate_register(req, self.config.min_password_len)?;
        Ok(self.mint(&req.email))
    }

    async fn logout(&self) -> Result<(), AuthError> {
        tokio::time::sleep(self.config.logout_latency).await;
        Ok(())
    }
}

/// `mock-<unix millis>-<8 hex chars>`. The random suffix keeps two
/// identities minted in the same millisecond apart.
fn generate_user_id() -> UserId {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let suffix: u32 = rand::rng().random();
    UserId(format!("mock-{millis}-{suffix:08x}"))
}
