use std::time::Duration;

use {
    anyhow::Result,
    async_trait::async_trait,
    base64::{Engine as _, engine::general_purpose::STANDARD},
    tokio::time::Instant,
    tracing::info,
};

use groupcast_channels::{ChatSession, Conversation, SessionHealth};
use groupcast_config::WhatsAppConfig;

use crate::sidecar::{SessionError, SidecarClient};

/// How often to re-check session status while waiting for authentication.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// A live WhatsApp Web session, held for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct WhatsAppSession {
    sidecar: SidecarClient,
}

impl WhatsAppSession {
    /// Open the configured session and wait until it is authenticated.
    ///
    /// An unreachable sidecar fails immediately; an unauthenticated session
    /// is polled until it connects or the configured timeout elapses (first
    /// logins need a QR scan, so the default window is generous).
    pub async fn connect(config: &WhatsAppConfig) -> Result<Self, SessionError> {
        let sidecar = SidecarClient::new(&config.sidecar_url, &config.session);
        let timeout = Duration::from_secs(config.connect_timeout_secs);
        let deadline = Instant::now() + timeout;

        let mut status = sidecar.open_session().await?;
        while !status.connected {
            if Instant::now() >= deadline {
                return Err(SessionError::ConnectTimeout(timeout));
            }
            if let Some(state) = &status.state {
                info!(state = %state, "waiting for session to authenticate");
            }
            tokio::time::sleep(POLL_INTERVAL).await;
            status = sidecar.status().await?;
        }

        info!(session = %config.session, "WhatsApp session connected");
        Ok(Self { sidecar })
    }
}

#[async_trait]
impl ChatSession for WhatsAppSession {
    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let chats = self.sidecar.chats().await?;
        Ok(chats
            .into_iter()
            .map(|c| Conversation::from_raw(c.id, c.name))
            .collect())
    }

    async fn conversation_details(&self, id: &str) -> Result<Conversation> {
        let chat = self.sidecar.chat(id).await?;
        Ok(Conversation::from_raw(chat.id, chat.name))
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<()> {
        self.sidecar.send_text(to, text).await?;
        Ok(())
    }

    async fn send_file(&self, to: &str, data: &[u8], filename: &str, caption: &str) -> Result<()> {
        let encoded = STANDARD.encode(data);
        self.sidecar.send_media(to, &encoded, filename, caption).await?;
        Ok(())
    }

    async fn probe(&self) -> SessionHealth {
        match self.sidecar.status().await {
            Ok(status) => SessionHealth {
                connected: status.connected,
                detail: status.state,
            },
            Err(e) => SessionHealth {
                connected: false,
                detail: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {groupcast_channels::ConversationKind, serde_json::json};

    use super::*;

    fn config(server: &mockito::Server, timeout_secs: u64) -> WhatsAppConfig {
        WhatsAppConfig {
            sidecar_url: server.url(),
            session: "test-session".into(),
            connect_timeout_secs: timeout_secs,
        }
    }

    #[tokio::test]
    async fn connects_when_session_already_authenticated() {
        let mut server = mockito::Server::new_async().await;
        let open = server
            .mock("POST", "/session/open")
            .match_body(mockito::Matcher::Json(json!({ "session": "test-session" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "connected": true, "state": "connected" }).to_string())
            .create_async()
            .await;

        WhatsAppSession::connect(&config(&server, 5)).await.unwrap();
        open.assert_async().await;
    }

    #[tokio::test]
    async fn connect_times_out_when_never_authenticated() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/session/open")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "connected": false, "state": "qr" }).to_string())
            .create_async()
            .await;

        let err = WhatsAppSession::connect(&config(&server, 0)).await.unwrap_err();
        assert!(matches!(err, SessionError::ConnectTimeout(_)));
    }

    #[tokio::test]
    async fn unreachable_sidecar_fails_connect() {
        let cfg = WhatsAppConfig {
            sidecar_url: "http://127.0.0.1:1".into(),
            session: "test-session".into(),
            connect_timeout_secs: 5,
        };
        let err = WhatsAppSession::connect(&cfg).await.unwrap_err();
        assert!(matches!(err, SessionError::Http(_)));
    }

    async fn connected_session(server: &mut mockito::Server) -> WhatsAppSession {
        server
            .mock("POST", "/session/open")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "connected": true, "state": "connected" }).to_string())
            .create_async()
            .await;
        WhatsAppSession::connect(&config(server, 5)).await.unwrap()
    }

    #[tokio::test]
    async fn chat_list_maps_to_conversations() {
        let mut server = mockito::Server::new_async().await;
        let session = connected_session(&mut server).await;
        server
            .mock("GET", "/chats")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    { "id": "1@g.us", "name": "Ops" },
                    { "id": "2@c.us", "name": "Alice" },
                    { "id": "3@g.us", "name": null },
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let chats = session.list_conversations().await.unwrap();
        assert_eq!(chats.len(), 3);
        assert_eq!(chats[0].kind, ConversationKind::Group);
        assert_eq!(chats[1].kind, ConversationKind::Other);
        assert_eq!(chats[2].name, None);
    }

    #[tokio::test]
    async fn send_text_posts_to_sidecar() {
        let mut server = mockito::Server::new_async().await;
        let session = connected_session(&mut server).await;
        let send = server
            .mock("POST", "/send/text")
            .match_body(mockito::Matcher::Json(json!({ "to": "1@g.us", "text": "hi" })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        session.send_text("1@g.us", "hi").await.unwrap();
        send.assert_async().await;
    }

    #[tokio::test]
    async fn sidecar_error_body_surfaces_in_message() {
        let mut server = mockito::Server::new_async().await;
        let session = connected_session(&mut server).await;
        server
            .mock("POST", "/send/text")
            .with_status(500)
            .with_body(json!({ "error": "disconnected phone" }).to_string())
            .create_async()
            .await;

        let err = session.send_text("1@g.us", "hi").await.unwrap_err();
        assert!(err.to_string().contains("disconnected phone"));
    }

    #[tokio::test]
    async fn send_file_ships_base64_payload() {
        let mut server = mockito::Server::new_async().await;
        let session = connected_session(&mut server).await;
        let send = server
            .mock("POST", "/send/media")
            .match_body(mockito::Matcher::Json(json!({
                "to": "1@g.us",
                "base64": STANDARD.encode(b"binary-bytes"),
                "filename": "doc.pdf",
                "caption": "the doc",
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        session
            .send_file("1@g.us", b"binary-bytes", "doc.pdf", "the doc")
            .await
            .unwrap();
        send.assert_async().await;
    }

    #[tokio::test]
    async fn probe_reports_unreachable_as_not_connected() {
        let session = WhatsAppSession {
            sidecar: SidecarClient::new("http://127.0.0.1:1", "s"),
        };
        let health = session.probe().await;
        assert!(!health.connected);
        assert!(health.detail.is_some());
    }
}
