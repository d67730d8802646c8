//! Session management for SkyGarden.
//!
//! This crate owns the signed-in user:
//!
//! 1. **Authentication**: turning a login or registration form into an
//!    [`Identity`](skygarden_protocol::Identity) ([`Authenticator`] trait,
//!    [`MockAuthenticator`] for the demo).
//! 2. **Session state**: the [`SessionStore`] holds at most one identity,
//!    persists it so a reload restores it, and publishes read-only
//!    [`SessionSnapshot`]s to everything downstream.
//!
//! # How it fits in the stack
//!
//! ```text
//! Router (above)    ← reads snapshots, never mutates
//!     ↕
//! Session (this crate)  ← the only writer of the persisted identity
//!     ↕
//! Storage / Protocol (below)
//! ```

mod auth;
mod error;
mod session;
mod store;

pub use auth::{
    Authenticator, MockAuthConfig, MockAuthenticator, is_valid_email, validate_confirmation,
    validate_login, validate_register,
};
pub use error::{AuthError, SessionError};
pub use session::{SessionConfig, SessionPhase, SessionSnapshot};
pub use store::{LOGOUT_FAILED_MESSAGE, SessionStore, UNEXPECTED_ERROR_MESSAGE};
