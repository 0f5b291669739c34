#![forbid(unsafe_code)]
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::missing_docs_in_private_items,
        clippy::unwrap_used,
        missing_docs
    )
)]

//! Websocket client that relays raw transactions through the bloXroute `blxr_tx` JSON-RPC
//! method.
//!
//! One [`TxSender`] owns one authenticated connection. Each [`TxSender::send`] writes a single
//! request frame and resolves with the next frame read back, verbatim.

/// Account credentials and the handshake authorization header.
pub mod auth;
/// Connector configuration and environment loading.
pub mod config;
/// JSON-RPC request envelope and reply helpers.
pub mod rpc;
/// Connection lifecycle, transports, and the submit operation.
pub mod submit;

pub use auth::Credentials;
pub use config::{CLOUD_WS_URL, SenderConfig, TlsVerification};
pub use rpc::{
    BLXR_TX_METHOD, DEFAULT_REQUEST_ID, JSONRPC_VERSION, JsonRpcError, JsonRpcReply,
    JsonRpcRequest,
};
pub use submit::{
    ConnectionState, DialRequest, RelayConnection, RelayDialer, SenderError, TransportError,
    TxSender, WsConnection, WsDialer,
};
