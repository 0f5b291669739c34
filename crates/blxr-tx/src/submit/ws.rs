//! Websocket transport built on `tokio-tungstenite`.

use std::fmt;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    Connector, MaybeTlsStream, WebSocketStream, connect_async_tls_with_config,
    tungstenite::{
        client::IntoClientRequest,
        error::Error as WsError,
        http::header::{AUTHORIZATION, HeaderValue},
        protocol::Message,
    },
};

use super::{DialRequest, RelayConnection, RelayDialer, TransportError, tls};

/// Dialer that opens `ws`/`wss` connections with the authorization header attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsDialer;

#[async_trait]
impl RelayDialer for WsDialer {
    type Connection = WsConnection;

    async fn dial(&self, request: &DialRequest) -> Result<Self::Connection, TransportError> {
        let mut upgrade = request
            .url
            .as_str()
            .into_client_request()
            .map_err(|error| TransportError::Config {
                message: format!("invalid websocket url {}: {error}", request.url),
            })?;
        let header_value = HeaderValue::from_str(&request.authorization).map_err(|error| {
            TransportError::Config {
                message: format!("invalid authorization header: {error}"),
            }
        })?;
        upgrade.headers_mut().insert(AUTHORIZATION, header_value);

        let connector = if upgrade.uri().scheme_str() == Some("wss") {
            Some(Connector::Rustls(tls::client_config(
                request.tls_verification,
            )?))
        } else {
            None
        };

        match connect_async_tls_with_config(upgrade, None, false, connector).await {
            Ok((stream, _response)) => Ok(WsConnection { stream }),
            Err(WsError::Http(response)) => Err(TransportError::Failure {
                message: format!(
                    "websocket upgrade to {} rejected with status {}",
                    request.url,
                    response.status()
                ),
            }),
            Err(error) => Err(TransportError::Failure {
                message: format!("failed to connect websocket {}: {error}", request.url),
            }),
        }
    }
}

/// Open websocket connection to the relay.
pub struct WsConnection {
    /// Underlying websocket stream.
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl fmt::Debug for WsConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let io = self.stream.get_ref();
        let peer_addr = match io {
            MaybeTlsStream::Plain(stream) => stream.peer_addr().ok(),
            MaybeTlsStream::Rustls(stream) => stream.get_ref().0.peer_addr().ok(),
            _ => None,
        };
        f.debug_struct("WsConnection")
            .field("peer_addr", &peer_addr)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RelayConnection for WsConnection {
    async fn write_text(&mut self, payload: String) -> Result<(), TransportError> {
        self.stream
            .send(Message::Text(payload.into()))
            .await
            .map_err(map_ws_error)
    }

    async fn read_text(&mut self) -> Result<String, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_owned()),
                Some(Ok(Message::Binary(bytes))) => {
                    return String::from_utf8(bytes.to_vec()).map_err(|error| {
                        TransportError::Failure {
                            message: format!("binary reply is not valid utf-8: {error}"),
                        }
                    });
                }
                // Control frames; tungstenite queues the pong itself.
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {}
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(
                        close_code = frame.as_ref().map(|frame| u16::from(frame.code)),
                        "relay closed websocket"
                    );
                    return Err(TransportError::Closed);
                }
                Some(Err(error)) => return Err(map_ws_error(error)),
                None => return Err(TransportError::Closed),
            }
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match self.stream.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
            Err(error) => Err(map_ws_error(error)),
        }
    }
}

/// Maps websocket errors, folding the closed states into [`TransportError::Closed`].
fn map_ws_error(error: WsError) -> TransportError {
    match error {
        WsError::ConnectionClosed | WsError::AlreadyClosed => TransportError::Closed,
        other => TransportError::Failure {
            message: other.to_string(),
        },
    }
}
