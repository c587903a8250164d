//! WhatsApp Web session client.
//!
//! Drives a local WhatsApp Web sidecar process over HTTP. The sidecar owns
//! the protocol connection and credential persistence; this crate handles
//! connect/wait-ready at startup and maps the `ChatSession` trait onto the
//! sidecar's endpoints.

pub mod session;
pub mod sidecar;

pub use {
    session::WhatsAppSession,
    sidecar::{DEFAULT_SIDECAR_URL, SessionError, SidecarClient},
};
