//! WeatherFlow Tempest data socket client
//!
//! Opens one WebSocket connection per device and subscribes to its
//! live observations with a `listen_start` request. The socket mixes
//! acknowledgements and keep-alives with observation payloads; every
//! well-formed JSON object is surfaced as an event, protocol frames
//! are handled here.

use application::{ApplicationError, DeviceSubscription, StreamEvent, StreamPort};
use async_trait::async_trait;
use domain::DeviceId;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, instrument, warn};

use crate::config::TempestConfig;
use crate::error::TempestError;
use crate::models::ListenStartRequest;
use crate::token::AccessToken;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket client for the Tempest live data socket
#[derive(Debug)]
pub struct TempestStream {
    config: TempestConfig,
    token: AccessToken,
}

impl TempestStream {
    /// Create a new stream client with the given configuration and token
    #[must_use]
    pub fn new(config: TempestConfig, token: AccessToken) -> Self {
        Self { config, token }
    }

    /// Socket URL with the access token attached
    ///
    /// The returned value carries the credential and must not be logged.
    fn socket_url(&self) -> String {
        format!("{}?token={}", self.config.socket_url, self.token.expose())
    }
}

#[async_trait]
impl StreamPort for TempestStream {
    #[instrument(skip(self))]
    async fn open(
        &self,
        device_id: DeviceId,
    ) -> Result<Box<dyn DeviceSubscription>, ApplicationError> {
        let (mut socket, _) = connect_async(&self.socket_url())
            .await
            .map_err(|e| TempestError::ConnectionFailed(e.to_string()))?;
        debug!(device_id = %device_id, "Connected to the data socket");

        let request = ListenStartRequest::new(device_id);
        let payload = serde_json::to_string(&request)
            .map_err(|e| TempestError::ParseError(e.to_string()))?;
        socket
            .send(Message::Text(payload.into()))
            .await
            .map_err(|e| TempestError::HandshakeFailed(e.to_string()))?;
        debug!(device_id = %device_id, request_id = %request.id, "Subscription requested");

        Ok(Box::new(WsSubscription { socket, device_id }))
    }
}

/// One live subscription on its own socket
struct WsSubscription {
    socket: Socket,
    device_id: DeviceId,
}

#[async_trait]
impl DeviceSubscription for WsSubscription {
    async fn next_event(&mut self) -> Result<Option<StreamEvent>, ApplicationError> {
        while let Some(message) = self.socket.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let raw: &str = text.as_ref();
                    match serde_json::from_str::<crate::models::SocketMessage>(raw) {
                        Ok(socket_message) => return Ok(Some(StreamEvent::from(socket_message))),
                        Err(e) => {
                            warn!(
                                device_id = %self.device_id,
                                error = %e,
                                "Discarding malformed message"
                            );
                        },
                    }
                },
                Ok(Message::Binary(_)) => {
                    debug!(device_id = %self.device_id, "Ignoring binary frame");
                },
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => {},
                Ok(Message::Close(_)) => return Ok(None),
                Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => return Ok(None),
                Err(e) => {
                    return Err(TempestError::ConnectionFailed(e.to_string()).into());
                },
            }
        }
        Ok(None)
    }

    async fn close(&mut self) -> Result<(), ApplicationError> {
        match self.socket.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(TempestError::ConnectionFailed(e.to_string()).into()),
        }
    }
}
