//! Core data types: who is signed in, what they may see, and what the
//! auth forms submit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a signed-in user.
///
/// Newtype over `String` so a user id can't be mixed up with an email or
/// a storage key. Serialized as the bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Which dashboard a user gets.
///
/// Serialized lowercase (`"admin"`, `"seller"`, `"buyer"`), which is also
/// the persisted and wire representation. Anything else fails to parse;
/// callers that must tolerate junk (the role router) handle the error
/// instead of panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Seller,
    Buyer,
}

impl Role {
    /// Every role, in the order the demo role switcher lists them.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Seller, Role::Buyer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Seller => "seller",
            Self::Buyer => "buyer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "seller" => Ok(Self::Seller),
            "buyer" => Ok(Self::Buyer),
            other => Err(ProtocolError::UnknownRole(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The signed-in user's profile record.
///
/// This is exactly what the session store persists, so the field names
/// are the durable layout: `{"id", "email", "name", "role"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    /// Display name, derived from the email's local part.
    pub name: String,
    pub role: Role,
}

impl Identity {
    /// Builds an identity, deriving the display name from `email`.
    pub fn new(id: UserId, email: impl Into<String>, role: Role) -> Self {
        let email = email.into();
        let name = display_name_from_email(&email).to_string();
        Self {
            id,
            email,
            name,
            role,
        }
    }

    /// Returns a copy with a different role. Everything else is kept.
    pub fn with_role(&self, role: Role) -> Self {
        Self {
            role,
            ..self.clone()
        }
    }
}

/// The part of an email before the first `@` (the whole string if there
/// is none).
pub fn display_name_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

// ---------------------------------------------------------------------------
// Auth requests
// ---------------------------------------------------------------------------

/// The sign-in form submission.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// The sign-up form submission. The confirmation field is mandatory here,
/// which is what distinguishes it from a [`LoginRequest`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }
}

// Passwords never reach the logs.
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .finish()
    }
}

/// Either auth form, explicitly tagged.
///
/// On the wire: `{"type":"login","email":…,"password":…}` or
/// `{"type":"register",…,"confirm_password":…}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthRequest {
    Login(LoginRequest),
    Register(RegisterRequest),
}

impl AuthRequest {
    pub fn email(&self) -> &str {
        match self {
            Self::Login(req) => &req.email,
            Self::Register(req) => &req.email,
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Sequenced wrapper for every server-to-client message.
///
/// `seq` increases by one per message on a connection, so a client can
/// tell a stale frame from a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub seq: u64,
    pub payload: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str_known_roles() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("seller".parse::<Role>().unwrap(), Role::Seller);
        assert_eq!("buyer".parse::<Role>().unwrap(), Role::Buyer);
    }

    #[test]
    fn test_role_from_str_is_case_sensitive() {
        let result = "Admin".parse::<Role>();
        assert!(matches!(result, Err(ProtocolError::UnknownRole(r)) if r == "Admin"));
    }

    #[test]
    fn test_role_display_matches_as_str() {
        for role in Role::ALL {
            assert_eq!(role.to_string(), role.as_str());
        }
    }

    #[test]
    fn test_display_name_from_email_takes_local_part() {
        assert_eq!(display_name_from_email("jane.doe@shop.io"), "jane.doe");
        assert_eq!(display_name_from_email("@shop.io"), "");
        assert_eq!(display_name_from_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_identity_with_role_keeps_other_fields() {
        let identity = Identity::new(UserId::from("mock-1"), "a@b.com", Role::Seller);

        let admin = identity.with_role(Role::Admin);

        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.id, identity.id);
        assert_eq!(admin.email, identity.email);
        assert_eq!(admin.name, "a");
    }

    #[test]
    fn test_request_debug_redacts_passwords() {
        let req = RegisterRequest::new("a@b.com", "hunter22", "hunter22");

        let printed = format!("{req:?}");

        assert!(printed.contains("a@b.com"));
        assert!(!printed.contains("hunter22"));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_auth_request_is_tagged_on_the_wire() {
        let login: AuthRequest =
            serde_json::from_str(r#"{"type":"login","email":"a@b.com","password":"abcdef"}"#)
                .unwrap();
        assert!(matches!(login, AuthRequest::Login(_)));

        // A register payload without the confirmation is rejected rather
        // than guessed into a login.
        let missing = serde_json::from_str::<AuthRequest>(
            r#"{"type":"register","email":"a@b.com","password":"abcdef"}"#,
        );
        assert!(missing.is_err());
    }
}
