use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupcastConfig {
    pub gateway: GatewayConfig,
    pub whatsapp: WhatsAppConfig,
    pub ledger: LedgerConfig,
}

/// HTTP facade listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

/// WhatsApp sidecar connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    /// Base URL of the local WhatsApp Web sidecar.
    pub sidecar_url: String,
    /// Session name the sidecar persists credentials under.
    pub session: String,
    /// How long to wait at startup for the session to authenticate.
    /// Generous by default: first-time logins need a QR scan.
    pub connect_timeout_secs: u64,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            sidecar_url: "http://127.0.0.1:3900".into(),
            session: "whatsapp-bot".into(),
            connect_timeout_secs: 120,
        }
    }
}

/// Google Sheets group ledger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub spreadsheet_id: String,
    /// Sheet tab holding the `Group Name | Group ID` columns.
    pub tab: String,
    /// OAuth bearer token; usually `${GROUPCAST_SHEETS_TOKEN}` in the file.
    pub access_token: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            tab: "GroupIDs".into(),
            access_token: String::new(),
        }
    }
}
