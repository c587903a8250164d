//! The group ledger: a tabular store of known group name/identifier pairs.
//!
//! The storage seam is the `LedgerStore` trait; the production backend is a
//! Google Sheets tab with `Group Name | Group ID` columns. Identifier
//! uniqueness is enforced by the reconciliation pass, not by the store.

pub mod error;
pub mod sheets;
pub mod store;

pub use {
    error::LedgerError,
    sheets::SheetsLedger,
    store::{GroupRecord, LedgerStore},
};
