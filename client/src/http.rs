//! Remote collection served by `listy-server`.
//!
//! Writes are plain HTTP requests. The standing listener is a WebSocket that
//! receives a full snapshot on connect and after every write; when it drops,
//! an error event is reported and the socket is reopened after
//! [`ClientConfig::reconnect_delay`].

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use listy_engine::{validate_document_id, Fields, QuerySnapshot};
use reqwest::{Response, Url};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header::AUTHORIZATION, HeaderValue};
use tokio_tungstenite::tungstenite::Message;

use crate::config::ClientConfig;
use crate::error::{RemoteError, Result};
use crate::remote::{RemoteCollection, SnapshotReceiver, SnapshotSender};

/// Messages the server pushes to a listener.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ListenMessage {
    Snapshot { snapshot: QuerySnapshot },
    Error { message: String },
    Pong,
}

/// Error body returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// A collection on a Listy document server.
#[derive(Debug, Clone)]
pub struct HttpCollection {
    client: reqwest::Client,
    base_url: Url,
    collection: String,
    auth_token: Option<String>,
    reconnect_delay: Duration,
}

impl HttpCollection {
    /// Client for the collection described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.server_url)
            .map_err(|e| RemoteError::InvalidUrl(format!("{}: {}", config.server_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(config.server_url.clone()));
        }
        validate_document_id(&config.collection)?;

        Ok(Self {
            client: reqwest::Client::builder().build()?,
            base_url,
            collection: config.collection.clone(),
            auth_token: config.auth_token.clone(),
            reconnect_delay: config.reconnect_delay,
        })
    }

    /// Read the whole collection once.
    pub async fn fetch_snapshot(&self) -> Result<QuerySnapshot> {
        let url = self.collection_url(&["documents"])?;
        let response = self.authorized(self.client.get(url)).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    fn collection_url(&self, tail: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["collections", self.collection.as_str()])
            .extend(tail);
        Ok(url)
    }

    fn listen_url(&self) -> Result<Url> {
        let mut url = self.collection_url(&["listen"])?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| RemoteError::InvalidUrl(url.to_string()))?;
        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl RemoteCollection for HttpCollection {
    fn name(&self) -> &str {
        &self.collection
    }

    async fn set_document(&self, id: &str, fields: Fields) -> Result<()> {
        validate_document_id(id)?;
        let url = self.collection_url(&["documents", id])?;

        let response = self
            .authorized(self.client.put(url))
            .json(&fields)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        validate_document_id(id)?;
        let url = self.collection_url(&["documents", id])?;

        let response = self.authorized(self.client.delete(url)).send().await?;
        check_status(response).await?;
        Ok(())
    }

    fn listen(&self) -> SnapshotReceiver {
        let (tx, rx) = mpsc::unbounded_channel();

        match self.listen_url() {
            Ok(url) => {
                tokio::spawn(listen_loop(
                    url,
                    self.auth_token.clone(),
                    self.reconnect_delay,
                    tx,
                ));
            }
            Err(e) => {
                let _ = tx.send(Err(e));
            }
        }

        rx
    }
}

/// Turn a non-2xx response into [`RemoteError::Api`].
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|parsed| parsed.error)
        .unwrap_or(body);

    Err(RemoteError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Keep a listener open until the receiving side goes away.
async fn listen_loop(url: Url, token: Option<String>, delay: Duration, tx: SnapshotSender) {
    loop {
        let error = match listen_once(&url, token.as_deref(), &tx).await {
            Ok(()) => return,
            Err(e) => e,
        };

        tracing::warn!(url = %url, "Listener dropped: {}", error);
        if tx.send(Err(error)).is_err() {
            return;
        }

        tokio::time::sleep(delay).await;
        if tx.is_closed() {
            return;
        }
    }
}

/// Run one listener connection.
///
/// Returns `Ok(())` only when the receiving side has gone away; a closed or
/// failed socket is an error so the caller reconnects.
async fn listen_once(url: &Url, token: Option<&str>, tx: &SnapshotSender) -> Result<()> {
    let mut request = url.as_str().into_client_request()?;
    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| RemoteError::InvalidUrl(format!("bad auth token: {}", e)))?;
        request.headers_mut().insert(AUTHORIZATION, value);
    }

    let (mut socket, _) = tokio_tungstenite::connect_async(request).await?;
    tracing::debug!(url = %url, "Listener connected");

    while let Some(frame) = socket.next().await {
        let event = match frame? {
            Message::Text(text) => match serde_json::from_str::<ListenMessage>(text.as_str())? {
                ListenMessage::Snapshot { snapshot } => Ok(snapshot),
                ListenMessage::Error { message } => Err(RemoteError::Listen(message)),
                ListenMessage::Pong => continue,
            },
            Message::Close(_) => break,
            _ => continue,
        };

        if tx.send(event).is_err() {
            return Ok(());
        }
    }

    Err(RemoteError::Closed)
}
