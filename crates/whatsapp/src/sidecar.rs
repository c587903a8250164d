use {serde::Deserialize, thiserror::Error};

/// Default bind of the local sidecar process.
pub const DEFAULT_SIDECAR_URL: &str = "http://127.0.0.1:3900";

/// Failures talking to the sidecar.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Transport-level failure (sidecar unreachable, connection dropped).
    #[error("sidecar request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The sidecar answered with a non-success status.
    #[error("sidecar rejected request (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The session never reached the connected state.
    #[error("session did not reach connected state within {0:?}")]
    ConnectTimeout(std::time::Duration),
}

/// Session status as reported by the sidecar.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStatus {
    pub connected: bool,
    /// Sidecar-specific state label ("qr", "connected", ...).
    pub state: Option<String>,
}

/// One chat entry from the sidecar's chat list.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatEntry {
    pub id: String,
    pub name: Option<String>,
}

/// Error body the sidecar uses for rejected requests.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin HTTP client for the sidecar's REST surface.
#[derive(Debug, Clone)]
pub struct SidecarClient {
    client: reqwest::Client,
    base_url: String,
    session: String,
}

impl SidecarClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            session: session.into(),
        }
    }

    /// Open (or attach to) the named session. Idempotent on the sidecar side.
    pub async fn open_session(&self) -> Result<SessionStatus, SessionError> {
        let resp = self
            .client
            .post(format!("{}/session/open", self.base_url))
            .json(&serde_json::json!({ "session": self.session }))
            .send()
            .await?;
        Self::parse(resp).await
    }

    /// Current session status.
    pub async fn status(&self) -> Result<SessionStatus, SessionError> {
        let resp = self
            .client
            .get(format!("{}/session/status", self.base_url))
            .send()
            .await?;
        Self::parse(resp).await
    }

    /// Full chat list.
    pub async fn chats(&self) -> Result<Vec<ChatEntry>, SessionError> {
        let resp = self
            .client
            .get(format!("{}/chats", self.base_url))
            .send()
            .await?;
        Self::parse(resp).await
    }

    /// One chat's metadata.
    pub async fn chat(&self, id: &str) -> Result<ChatEntry, SessionError> {
        let resp = self
            .client
            .get(format!("{}/chats/{}", self.base_url, urlencoding::encode(id)))
            .send()
            .await?;
        Self::parse(resp).await
    }

    /// Send a text message.
    pub async fn send_text(&self, to: &str, text: &str) -> Result<(), SessionError> {
        let resp = self
            .client
            .post(format!("{}/send/text", self.base_url))
            .json(&serde_json::json!({ "to": to, "text": text }))
            .send()
            .await?;
        Self::check(resp).await
    }

    /// Send a media file, base64-encoded, with filename and caption.
    pub async fn send_media(
        &self,
        to: &str,
        base64: &str,
        filename: &str,
        caption: &str,
    ) -> Result<(), SessionError> {
        let resp = self
            .client
            .post(format!("{}/send/media", self.base_url))
            .json(&serde_json::json!({
                "to": to,
                "base64": base64,
                "filename": filename,
                "caption": caption,
            }))
            .send()
            .await?;
        Self::check(resp).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, SessionError> {
        let resp = Self::ok(resp).await?;
        Ok(resp.json().await?)
    }

    async fn check(resp: reqwest::Response) -> Result<(), SessionError> {
        Self::ok(resp).await.map(|_| ())
    }

    async fn ok(resp: reqwest::Response) -> Result<reqwest::Response, SessionError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .map(|b| b.error)
            .unwrap_or(raw);
        Err(SessionError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
