//! Connector that owns one relay connection and submits transactions over it.

use super::{
    ConnectionState, DialRequest, RelayConnection, RelayDialer, SenderError, TransportError,
    WsConnection, WsDialer,
};
use crate::{config::SenderConfig, rpc::JsonRpcRequest};

/// Client holding one authenticated relay connection.
///
/// Construction dials once; there is no reconnection. [`Self::send`] takes `&mut self`, so calls
/// on one sender are strictly sequential and each reply read is the one that follows its own
/// write. Share a sender between tasks behind a lock.
#[derive(Debug)]
pub struct TxSender<C = WsConnection> {
    /// Open connection to the relay.
    connection: C,
    /// Endpoint the connection was dialed to.
    endpoint: String,
    /// Last observed connection health.
    state: ConnectionState,
}

impl TxSender<WsConnection> {
    /// Validates `config` and opens a websocket connection to the relay.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::Configuration`] when credentials are missing, and
    /// [`SenderError::Connection`] when the dial or upgrade handshake fails.
    pub async fn connect(config: &SenderConfig) -> Result<Self, SenderError> {
        Self::connect_with(config, &WsDialer).await
    }
}

impl<C> TxSender<C>
where
    C: RelayConnection,
{
    /// Validates `config` and opens a connection through `dialer`.
    ///
    /// The dialer is never invoked when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::Configuration`] when credentials are missing, and
    /// [`SenderError::Connection`] when the dialer fails.
    pub async fn connect_with<D>(config: &SenderConfig, dialer: &D) -> Result<Self, SenderError>
    where
        D: RelayDialer<Connection = C> + ?Sized,
    {
        let credentials = config.credentials()?;
        let request = DialRequest {
            url: config.endpoint().to_owned(),
            authorization: credentials.authorization_header(),
            tls_verification: config.tls_verification,
        };
        if !request.tls_verification.is_verified() {
            tracing::warn!(
                endpoint = %request.url,
                "server certificate verification is disabled for relay connection"
            );
        }

        let connection = dialer
            .dial(&request)
            .await
            .map_err(|source| SenderError::Connection { source })?;
        tracing::info!(
            endpoint = %request.url,
            account_id = credentials.account_id(),
            tls_verification = %request.tls_verification,
            "connected to transaction relay"
        );
        Ok(Self {
            connection,
            endpoint: request.url,
            state: ConnectionState::Connected,
        })
    }

    /// Submits one raw transaction and returns the relay's reply frame verbatim.
    ///
    /// Waits for the reply without a timeout. The state reads [`ConnectionState::Failed`] while
    /// the exchange is in flight, so dropping this future (for example on a timeout) leaves the
    /// sender failed and later calls are refused instead of reading the stale reply.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::Serialization`] when the request cannot be encoded, and
    /// [`SenderError::Transport`] when the write or the read fails. No read is attempted after
    /// a failed write. Once the state is [`ConnectionState::Failed`] every call returns
    /// [`TransportError::Unusable`] without touching the connection.
    pub async fn send(&mut self, raw_tx: &str) -> Result<String, SenderError> {
        if self.state == ConnectionState::Failed {
            return Err(SenderError::Transport {
                source: TransportError::Unusable,
            });
        }
        let payload = JsonRpcRequest::blxr_tx(raw_tx)
            .to_json()
            .map_err(|source| SenderError::Serialization { source })?;

        self.state = ConnectionState::Failed;
        tracing::debug!(bytes = payload.len(), "writing blxr_tx request");
        if let Err(source) = self.connection.write_text(payload).await {
            return Err(self.transport_failed("write", source));
        }

        match self.connection.read_text().await {
            Ok(reply) => {
                self.state = ConnectionState::Connected;
                tracing::debug!(bytes = reply.len(), "received relay reply");
                Ok(reply)
            }
            Err(source) => Err(self.transport_failed("read", source)),
        }
    }

    /// Returns the endpoint this sender is connected to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the last observed connection health.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Closes the connection. Dropping the sender is an equally valid teardown.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::Transport`] when the close handshake fails.
    pub async fn close(mut self) -> Result<(), SenderError> {
        self.connection
            .close()
            .await
            .map_err(|source| SenderError::Transport { source })
    }

    /// Records a failed write or read and wraps the error.
    fn transport_failed(&mut self, stage: &'static str, source: TransportError) -> SenderError {
        self.state = ConnectionState::Failed;
        tracing::warn!(
            endpoint = %self.endpoint,
            stage,
            error = %source,
            "relay transport failed"
        );
        SenderError::Transport { source }
    }
}
