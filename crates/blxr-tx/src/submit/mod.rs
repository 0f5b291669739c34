//! Connection lifecycle and the submit operation.

/// Connector implementation.
mod client;
/// TLS client configuration for `wss` endpoints.
mod tls;
/// Shared submission types, errors, and transport traits.
mod types;
/// Websocket transport implementation.
mod ws;

pub use client::TxSender;
pub use types::{
    ConnectionState, DialRequest, RelayConnection, RelayDialer, SenderError, TransportError,
};
pub use ws::{WsConnection, WsDialer};
