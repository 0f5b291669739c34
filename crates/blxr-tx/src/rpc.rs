//! JSON-RPC 2.0 envelope used on the relay websocket.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Protocol version tag carried by every request.
pub const JSONRPC_VERSION: &str = "2.0";
/// Relay method that submits one raw transaction.
pub const BLXR_TX_METHOD: &str = "blxr_tx";
/// Identifier used for every request.
///
/// Replies are not correlated by id; one request is in flight per connection at a time.
pub const DEFAULT_REQUEST_ID: i64 = 1;

/// One JSON-RPC call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest {
    /// Protocol version tag.
    pub jsonrpc: &'static str,
    /// Request identifier.
    pub id: i64,
    /// Method name.
    pub method: String,
    /// Named parameters, omitted from the wire when empty.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, Value>,
}

impl JsonRpcRequest {
    /// Creates a request without parameters.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: DEFAULT_REQUEST_ID,
            method: method.into(),
            params: BTreeMap::new(),
        }
    }

    /// Creates a `blxr_tx` request for one raw transaction.
    #[must_use]
    pub fn blxr_tx(raw_tx: &str) -> Self {
        Self::new(BLXR_TX_METHOD).with_param("transaction", raw_tx)
    }

    /// Adds or replaces one named parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Serializes the request to compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns the encoder error when a parameter cannot be represented as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// JSON-RPC error object returned by the relay.
#[derive(Debug, Clone, PartialEq, Error, Deserialize)]
#[error("rpc error {code}: {message}")]
pub struct JsonRpcError {
    /// JSON-RPC error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
    /// Optional structured detail.
    #[serde(default)]
    pub data: Option<Value>,
}

/// Decoded relay reply.
///
/// [`crate::TxSender::send`] returns replies as raw text; this type is for callers that want to
/// tell a result from an error object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcReply {
    /// Protocol version tag, when present.
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Echoed request identifier, when present.
    #[serde(default)]
    pub id: Option<Value>,
    /// Result value for successful calls.
    #[serde(default)]
    pub result: Option<Value>,
    /// Error payload for failed calls.
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcReply {
    /// Parses one reply frame.
    ///
    /// # Errors
    ///
    /// Returns the decoder error when `text` is not a JSON-RPC reply object.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Returns the result value, or the error object when the relay reported one.
    ///
    /// A reply with neither field (or a `null` result) yields [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns [`JsonRpcError`] when the reply carries an error object.
    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blxr_tx_request_has_expected_shape() {
        let json = JsonRpcRequest::blxr_tx("deadbeef").to_json();
        assert!(json.is_ok());
        if let Ok(json) = json {
            assert_eq!(
                json,
                r#"{"jsonrpc":"2.0","id":1,"method":"blxr_tx","params":{"transaction":"deadbeef"}}"#
            );
        }
    }

    #[test]
    fn empty_params_are_omitted() {
        let json = JsonRpcRequest::new("ping").to_json();
        assert!(json.is_ok());
        if let Ok(json) = json {
            assert_eq!(json, r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
        }
    }

    #[test]
    fn reply_with_result_is_ok() {
        let reply = JsonRpcReply::parse(r#"{"jsonrpc":"2.0","id":1,"result":{"txHash":"ab"}}"#);
        assert!(reply.is_ok());
        if let Ok(reply) = reply {
            assert_eq!(reply.id, Some(Value::from(1)));
            let result = reply.into_result();
            assert_eq!(result, Ok(serde_json::json!({"txHash": "ab"})));
        }
    }

    #[test]
    fn reply_with_error_object_is_err() {
        let reply = JsonRpcReply::parse(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"invalid params"}}"#,
        );
        assert!(reply.is_ok());
        if let Ok(reply) = reply {
            let result = reply.into_result();
            assert!(result.is_err());
            if let Err(error) = result {
                assert_eq!(error.code, -32602);
                assert_eq!(error.to_string(), "rpc error -32602: invalid params");
            }
        }
    }

    #[test]
    fn non_object_reply_fails_to_parse() {
        assert!(JsonRpcReply::parse("not json").is_err());
    }
}
