//! JSON-RPC 2.0 envelope types used to talk to ledger nodes.
//!
//! Only the client side of the protocol is modelled: requests are built and
//! serialized here, responses are deserialized and unwrapped into either a
//! typed result or an [`UpstreamError`].

use crate::upstream::UpstreamError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::borrow::Cow;

/// JSON-RPC protocol version constant to avoid repeated allocations.
pub const JSONRPC_VERSION: &str = "2.0";

/// Pre-allocated `Cow` for the JSON-RPC version.
pub const JSONRPC_VERSION_COW: Cow<'static, str> = Cow::Borrowed(JSONRPC_VERSION);

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: Cow<'static, str>,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Creates a new JSON-RPC request with zero allocation for the version string.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self { jsonrpc: JSONRPC_VERSION_COW, id: 1, method: method.into(), params }
    }
}

/// JSON-RPC 2.0 response.
///
/// A response carries either a `result` or an `error`. A node answering with
/// `"result": null` (for example a block that is not available yet) is
/// deserialized with `result: None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: Cow<'static, str>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: serde_json::Value,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// Parses a raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::InvalidResponse`] if the body is not a JSON-RPC response.
    pub fn from_slice(body: &[u8]) -> Result<Self, UpstreamError> {
        serde_json::from_slice(body)
            .map_err(|e| UpstreamError::InvalidResponse(format!("Invalid JSON: {e}")))
    }

    /// Unwraps the response into a typed result.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::RpcError`] when the node returned an error object
    /// - [`UpstreamError::InvalidResponse`] when the result is missing, `null`,
    ///   or does not match `T`
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, UpstreamError> {
        if let Some(error) = self.error {
            return Err(UpstreamError::RpcError(error.code, error.message));
        }

        match self.result {
            None | Some(serde_json::Value::Null) => {
                Err(UpstreamError::InvalidResponse("missing result".to_string()))
            }
            Some(value) => serde_json::from_value(value)
                .map_err(|e| UpstreamError::InvalidResponse(format!("unexpected result: {e}"))),
        }
    }
}
