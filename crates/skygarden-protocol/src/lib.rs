//! Shared data shapes for SkyGarden.
//!
//! This crate defines what travels between the layers and what lands in
//! durable storage:
//!
//! - **Types** ([`Identity`], [`Role`], [`AuthRequest`], [`Envelope`]):
//!   the signed-in user, the three dashboard roles, the two tagged auth
//!   form submissions, and the sequenced wire wrapper.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those values are
//!   turned into text for storage and WebSocket frames.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Storage (text) ← Protocol (Identity, requests) → Session (lifecycle)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    AuthRequest, Envelope, Identity, LoginRequest, RegisterRequest, Role,
    UserId, display_name_from_email,
};
