use std::collections::HashSet;

use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tracing::debug,
};

use crate::{
    error::LedgerError,
    store::{GroupRecord, LedgerStore},
};

/// Google Sheets API base URL.
const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Header row occupies row 1; data rows start at 2. Column A is the group
/// name, column B the group identifier.
const DATA_RANGE: &str = "A2:B";

/// Group ledger backed by one tab of a Google spreadsheet.
#[derive(Clone)]
pub struct SheetsLedger {
    client: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    tab: String,
    token: Secret<String>,
}

impl std::fmt::Debug for SheetsLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsLedger")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("tab", &self.tab)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Response shape of `values.get`; `values` is omitted for an empty range.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsLedger {
    /// Create a ledger client for one spreadsheet tab.
    #[must_use]
    pub fn new(spreadsheet_id: impl Into<String>, tab: impl Into<String>, token: Secret<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: API_BASE.into(),
            spreadsheet_id: spreadsheet_id.into(),
            tab: tab.into(),
            token,
        }
    }

    /// Point the client at a different API base (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn values_url(&self, suffix: &str) -> String {
        format!(
            "{}/{}/values/{}!{suffix}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(&self.tab),
        )
    }

    /// Map a non-success response to a typed error.
    async fn api_error(&self, resp: reqwest::Response) -> LedgerError {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        if status == 401 || status == 403 {
            return LedgerError::Auth { status };
        }
        // The API reports a missing tab as a range-parse failure.
        if status == 400 && message.contains("Unable to parse range") {
            return LedgerError::TabNotFound {
                tab: self.tab.clone(),
            };
        }
        LedgerError::Api { status, message }
    }
}

#[async_trait]
impl LedgerStore for SheetsLedger {
    async fn load_existing_ids(&self) -> Result<HashSet<String>, LedgerError> {
        let resp = self
            .client
            .get(self.values_url(DATA_RANGE))
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(self.api_error(resp).await);
        }

        let range: ValueRange = resp.json().await?;
        let ids: HashSet<String> = range
            .values
            .into_iter()
            .filter_map(|row| row.into_iter().nth(1))
            .filter(|id| !id.trim().is_empty())
            .collect();
        debug!(count = ids.len(), tab = %self.tab, "loaded existing ledger ids");
        Ok(ids)
    }

    async fn append_rows(&self, records: &[GroupRecord]) -> Result<(), LedgerError> {
        if records.is_empty() {
            return Ok(());
        }

        let values: Vec<[&str; 2]> = records
            .iter()
            .map(|r| [r.name.as_str(), r.id.as_str()])
            .collect();
        let resp = self
            .client
            .post(self.values_url("A1:append"))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(self.token.expose_secret())
            .json(&serde_json::json!({ "values": values }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(self.api_error(resp).await);
        }

        debug!(appended = records.len(), tab = %self.tab, "appended ledger rows");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {mockito::Matcher, serde_json::json};

    use super::*;

    fn ledger(server: &mockito::Server) -> SheetsLedger {
        SheetsLedger::new("sheet-1", "GroupIDs", Secret::new("tok".into()))
            .with_base_url(server.url())
    }

    #[tokio::test]
    async fn loads_ids_skipping_blank_cells() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sheet-1/values/GroupIDs!A2:B")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "range": "GroupIDs!A2:B",
                    "majorDimension": "ROWS",
                    "values": [
                        ["Ops", "1@g.us"],
                        ["", "  "],
                        ["Sales", "2@g.us"],
                        ["NameOnlyRow"],
                    ],
                })
                .to_string(),
            )
            .create_async()
            .await;

        let ids = ledger(&server).load_existing_ids().await.unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("1@g.us"));
        assert!(ids.contains("2@g.us"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_tab_yields_empty_set() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sheet-1/values/GroupIDs!A2:B")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "range": "GroupIDs!A2:B" }).to_string())
            .create_async()
            .await;

        let ids = ledger(&server).load_existing_ids().await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn appends_one_batch_in_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/sheet-1/values/GroupIDs!A1:append")
            .match_query(Matcher::UrlEncoded("valueInputOption".into(), "RAW".into()))
            .match_body(Matcher::Json(json!({
                "values": [["Ops", "1@g.us"], ["Sales", "2@g.us"]],
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "updates": { "updatedRows": 2 } }).to_string())
            .create_async()
            .await;

        let records = vec![
            GroupRecord {
                name: "Ops".into(),
                id: "1@g.us".into(),
            },
            GroupRecord {
                name: "Sales".into(),
                id: "2@g.us".into(),
            },
        ];
        ledger(&server).append_rows(&records).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_append_is_a_no_op() {
        let server = mockito::Server::new_async().await;
        // No mock registered; any request would fail the test.
        ledger(&server).append_rows(&[]).await.unwrap();
    }

    #[tokio::test]
    async fn rejected_credentials_map_to_auth() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sheet-1/values/GroupIDs!A2:B")
            .with_status(401)
            .with_body(r#"{"error":{"code":401,"message":"Request had invalid authentication credentials."}}"#)
            .create_async()
            .await;

        let err = ledger(&server).load_existing_ids().await.unwrap_err();
        assert!(matches!(err, LedgerError::Auth { status: 401 }));
    }

    #[tokio::test]
    async fn missing_tab_maps_to_tab_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sheet-1/values/GroupIDs!A2:B")
            .with_status(400)
            .with_body(r#"{"error":{"code":400,"message":"Unable to parse range: GroupIDs!A2:B"}}"#)
            .create_async()
            .await;

        let err = ledger(&server).load_existing_ids().await.unwrap_err();
        match err {
            LedgerError::TabNotFound { tab } => assert_eq!(tab, "GroupIDs"),
            other => panic!("expected TabNotFound, got {other:?}"),
        }
    }
}
