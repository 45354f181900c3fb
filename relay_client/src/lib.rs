use actix_codec::Framed;
pub use awc::ws;
use awc::{ws::Codec, BoxedSocket};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tracing::{debug, warn};

use crate::message::{ClientMessage, PeerId, ServerMessage, SignalKind};

mod config;
pub mod message;

pub use config::{ClientConfig, ClientConfigBuilder};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("Websocket protocol error")]
    Protocol(#[from] awc::error::WsProtocolError),

    #[error("Frame is not a valid relay message")]
    Codec(#[from] serde_json::Error),
}

/// A peer's signaling connection to the relay.
pub struct RelayClient {
    url: String,
    ws: Framed<BoxedSocket, Codec>,
}

impl std::fmt::Debug for RelayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayClient")
            .field("url", &self.url)
            .finish()
    }
}

impl RelayClient {
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let url = config.url();
        let (res, ws) = awc::Client::new()
            .ws(url.as_str())
            .connect()
            .await
            .map_err(|e| ClientError::Connect {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        debug!(status = %res.status(), %url, "Connected to relay");
        Ok(Self { url, ws })
    }

    pub async fn send(&mut self, msg: &ClientMessage) -> Result<(), ClientError> {
        let text = serde_json::to_string(msg)?;
        self.send_text(text).await
    }

    /// Sends a raw text frame, bypassing message encoding.
    pub async fn send_text(&mut self, text: String) -> Result<(), ClientError> {
        self.send_frame(ws::Message::Text(text.into())).await
    }

    /// Sends any websocket frame as is.
    pub async fn send_frame(&mut self, frame: ws::Message) -> Result<(), ClientError> {
        Ok(self.ws.send(frame).await?)
    }

    pub async fn register(
        &mut self,
        id: impl Into<PeerId>,
        display_name: Option<&str>,
    ) -> Result<(), ClientError> {
        self.send(&ClientMessage::Register {
            id: id.into(),
            display_name: display_name.map(str::to_string),
        })
        .await
    }

    pub async fn signal(
        &mut self,
        kind: SignalKind,
        to: impl Into<PeerId>,
        payload: Value,
    ) -> Result<(), ClientError> {
        self.send(&ClientMessage::signal(kind, to, payload)).await
    }

    pub async fn disconnect(&mut self, id: impl Into<PeerId>) -> Result<(), ClientError> {
        self.send(&ClientMessage::Disconnect { id: id.into() })
            .await
    }

    /// Waits for the next relay message, answering pings on the way.
    ///
    /// Returns `Ok(None)` once the relay closed the connection.
    pub async fn next_message(&mut self) -> Result<Option<ServerMessage>, ClientError> {
        while let Some(frame) = self.ws.next().await {
            match frame? {
                ws::Frame::Text(text) => return Ok(Some(serde_json::from_slice(&text)?)),
                ws::Frame::Ping(msg) => self.ws.send(ws::Message::Pong(msg)).await?,
                ws::Frame::Pong(_) => {}
                ws::Frame::Close(reason) => {
                    debug!(?reason, "Relay closed the connection");
                    return Ok(None);
                }
                ws::Frame::Binary(_) | ws::Frame::Continuation(_) => {
                    warn!("Ignoring non-text frame from relay");
                }
            }
        }
        Ok(None)
    }

    /// Performs a clean websocket close handshake.
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.ws
            .send(ws::Message::Close(Some(ws::CloseCode::Normal.into())))
            .await?;
        Ok(())
    }
}
