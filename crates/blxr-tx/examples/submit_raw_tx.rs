//! Submits one raw transaction through the relay and prints the reply.
//!
//! Reads `BLXR_ACCOUNT_ID`, `BLXR_SECRET_HASH`, optional `BLXR_WS_URL` and `BLXR_TLS_VERIFY`,
//! and takes the raw transaction as the first argument.
#![doc(hidden)]

use blxr_tx::{JsonRpcReply, SenderConfig, SenderError, TxSender};
use thiserror::Error;

#[derive(Debug, Error)]
enum SubmitRawTxExampleError {
    #[error("usage: `{command}`")]
    MissingRawTx { command: &'static str },
    #[error(transparent)]
    Sender(#[from] SenderError),
}

fn init_tracing() {
    if tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .is_err()
    {
        // Subscriber already installed.
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), SubmitRawTxExampleError> {
    init_tracing();

    let raw_tx = std::env::args()
        .nth(1)
        .ok_or(SubmitRawTxExampleError::MissingRawTx {
            command: "cargo run -p blxr-tx --example submit_raw_tx -- <raw-tx-hex>",
        })?;

    let config = SenderConfig::from_env();
    let mut sender = TxSender::connect(&config).await?;
    let reply = sender.send(&raw_tx).await?;

    match JsonRpcReply::parse(&reply).map(JsonRpcReply::into_result) {
        Ok(Ok(result)) => tracing::info!(%result, "relay accepted transaction"),
        Ok(Err(error)) => tracing::warn!(%error, "relay rejected transaction"),
        Err(error) => tracing::warn!(%error, raw = %reply, "relay reply is not json-rpc"),
    }

    sender.close().await?;
    Ok(())
}
