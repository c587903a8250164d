use std::collections::HashSet;

use {async_trait::async_trait, serde::{Deserialize, Serialize}};

use crate::error::LedgerError;

/// One ledger row: a group's display name and stable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub name: String,
    pub id: String,
}

/// Tabular store of known groups, keyed by group identifier.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Identifiers already present in the ledger.
    async fn load_existing_ids(&self) -> Result<HashSet<String>, LedgerError>;

    /// Append records as new rows, in order, as one batch.
    async fn append_rows(&self, records: &[GroupRecord]) -> Result<(), LedgerError>;
}
