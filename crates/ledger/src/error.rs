use thiserror::Error;

/// Failures reaching or updating the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Credentials rejected by the spreadsheet backend.
    #[error("ledger authentication rejected (HTTP {status})")]
    Auth { status: u16 },

    /// The configured sheet tab does not exist in the spreadsheet.
    #[error("sheet tab {tab:?} not found")]
    TabNotFound { tab: String },

    /// Any other non-success API response.
    #[error("sheets API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (DNS, TLS, connection).
    #[error("sheets request failed: {0}")]
    Http(#[from] reqwest::Error),
}
