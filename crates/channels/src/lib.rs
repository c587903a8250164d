//! Chat-session client surface.
//!
//! The WhatsApp backend implements the `ChatSession` trait; discovery and the
//! HTTP facade only ever see the trait object, so the transport can be swapped
//! or mocked without touching either.

pub mod group;
pub mod session;

pub use {
    group::{GROUP_SUFFIX, is_group_id},
    session::{ChatSession, Conversation, ConversationKind, SessionHealth},
};
