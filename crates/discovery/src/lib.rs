//! Group discovery and ledger reconciliation.
//!
//! Runs once at startup, before the HTTP facade begins listening: enumerate
//! the session's conversations, keep the groups, diff against the ledger,
//! append only what is new.

pub mod reconcile;

pub use reconcile::{discover_groups, reconcile};
