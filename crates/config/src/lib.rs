//! Configuration schema, discovery, and loading.
//!
//! Config lives in `groupcast.{toml,yaml,yml,json}`, project-local or under
//! `~/.config/groupcast/`. Raw config text goes through `${ENV_VAR}`
//! substitution before parsing, so secrets stay out of the file itself.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, load_config},
    schema::{GatewayConfig, GroupcastConfig, LedgerConfig, WhatsAppConfig},
};
