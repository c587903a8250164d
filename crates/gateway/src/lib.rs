//! HTTP facade over a live chat session.
//!
//! Four endpoints: a readiness probe and three send operations (text, single
//! media, multi-target media). The session handle is injected at router
//! construction; the facade holds no other state.

pub mod media;
pub mod send;
pub mod server;
pub mod state;

pub use {
    server::{MAX_BODY_BYTES, build_facade_app, start_facade},
    state::FacadeState,
};
