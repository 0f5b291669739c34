//! Shared submission types, errors, and transport traits.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TlsVerification;

/// Low-level transport errors surfaced by dialers and connections.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum TransportError {
    /// Dial inputs could not be turned into a valid upgrade request.
    #[error("transport configuration invalid: {message}")]
    Config {
        /// Human-readable description.
        message: String,
    },
    /// Network, TLS, or protocol failure.
    #[error("transport failure: {message}")]
    Failure {
        /// Human-readable description.
        message: String,
    },
    /// Peer closed the connection or the stream ended.
    #[error("connection closed")]
    Closed,
    /// An earlier call failed or was dropped mid-exchange; the stream may hold its reply.
    #[error("connection unusable after an interrupted or failed call")]
    Unusable,
}

/// Connector-level errors.
#[derive(Debug, Error)]
pub enum SenderError {
    /// Required setting missing. Raised before any network activity.
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Human-readable description.
        message: String,
    },
    /// Dial or upgrade handshake failed.
    #[error("failed to connect to relay: {source}")]
    Connection {
        /// Dialer error.
        source: TransportError,
    },
    /// Request envelope could not be encoded.
    #[error("failed to encode request: {source}")]
    Serialization {
        /// Encoder error.
        source: serde_json::Error,
    },
    /// Write or read failed on an established connection.
    #[error("relay transport failed: {source}")]
    Transport {
        /// Connection error.
        source: TransportError,
    },
}

/// Observed health of the connector's connection.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ConnectionState {
    /// Handshake succeeded and no transport error has been seen since.
    Connected,
    /// A write or read failed, or a send was dropped before its reply arrived. Build a new
    /// connector to recover.
    Failed,
}

/// Everything a dialer needs to open one authenticated connection.
#[derive(Clone, Eq, PartialEq)]
pub struct DialRequest {
    /// Websocket endpoint.
    pub url: String,
    /// `Authorization` header value sent with the upgrade request.
    pub authorization: String,
    /// Certificate verification policy for `wss` endpoints.
    pub tls_verification: TlsVerification,
}

impl fmt::Debug for DialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialRequest")
            .field("url", &self.url)
            .field("authorization", &"<redacted>")
            .field("tls_verification", &self.tls_verification)
            .finish()
    }
}

/// Opens duplex connections to the relay.
#[async_trait]
pub trait RelayDialer: Send + Sync {
    /// Connection type produced by a successful dial.
    type Connection: RelayConnection;

    /// Performs the authenticated handshake described by `request`.
    async fn dial(&self, request: &DialRequest) -> Result<Self::Connection, TransportError>;
}

/// One open duplex connection carrying text frames.
#[async_trait]
pub trait RelayConnection: Send {
    /// Writes `payload` as a single text frame.
    async fn write_text(&mut self, payload: String) -> Result<(), TransportError>;

    /// Waits for the next data frame and returns its text.
    async fn read_text(&mut self) -> Result<String, TransportError>;

    /// Closes the connection. The default does nothing and relies on drop.
    async fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}
