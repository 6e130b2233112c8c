//! Network client for a single ledger node.
//!
//! The quorum engine only depends on the [`LedgerClient`] trait;
//! [`RpcLedgerClient`] is the JSON-RPC over HTTP implementation used by the
//! binary.

use super::{endpoint::Endpoint, errors::UpstreamError, http_client::HttpClient};
use crate::{
    block::BlockRecord,
    types::{JsonRpcRequest, JsonRpcResponse},
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tracing::debug;

/// Queries one node for its view of the ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Returns the slot the node currently considers current.
    async fn current_slot(&self, endpoint: &Endpoint) -> Result<u64, UpstreamError>;

    /// Returns the block the node holds for `slot`.
    async fn block_at(&self, endpoint: &Endpoint, slot: u64) -> Result<BlockRecord, UpstreamError>;
}

/// [`LedgerClient`] speaking Solana-style JSON-RPC (`getSlot`, `getBlock`).
pub struct RpcLedgerClient {
    http_client: Arc<HttpClient>,
    request_timeout: Option<Duration>,
    commitment: Option<String>,
}

impl RpcLedgerClient {
    #[must_use]
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self { http_client, request_timeout: None, commitment: None }
    }

    /// Bounds each HTTP request. The fan-out executor applies its own
    /// per-query timeout on top of this.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the commitment level sent with every request (`processed`,
    /// `confirmed`, `finalized`). Nodes use their own default when unset.
    #[must_use]
    pub fn with_commitment(mut self, commitment: Option<String>) -> Self {
        self.commitment = commitment;
        self
    }

    fn slot_params(&self) -> Option<serde_json::Value> {
        self.commitment.as_ref().map(|c| json!([{ "commitment": c }]))
    }

    fn block_params(&self, slot: u64) -> serde_json::Value {
        let mut options = json!({
            "encoding": "base64",
            "transactionDetails": "full",
            "rewards": true,
            "maxSupportedTransactionVersion": 0,
        });
        if let (Some(commitment), Some(map)) = (&self.commitment, options.as_object_mut()) {
            map.insert("commitment".to_string(), json!(commitment));
        }
        json!([slot, options])
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        request: &JsonRpcRequest,
    ) -> Result<T, UpstreamError> {
        let body = serde_json::to_vec(request).map_err(|e| {
            UpstreamError::InvalidRequest(format!("Failed to serialize request: {e}"))
        })?;

        let response_bytes = self
            .http_client
            .post_json(endpoint.as_str(), bytes::Bytes::from(body), self.request_timeout)
            .await?;

        JsonRpcResponse::from_slice(&response_bytes)?.into_result()
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn current_slot(&self, endpoint: &Endpoint) -> Result<u64, UpstreamError> {
        let request = JsonRpcRequest::new("getSlot", self.slot_params());
        let result = self.call::<u64>(endpoint, &request).await;

        match &result {
            Ok(slot) => debug!(endpoint = %endpoint, slot, "getSlot succeeded"),
            Err(e) => debug!(endpoint = %endpoint, error = %e, "getSlot failed"),
        }
        result
    }

    async fn block_at(&self, endpoint: &Endpoint, slot: u64) -> Result<BlockRecord, UpstreamError> {
        let request = JsonRpcRequest::new("getBlock", Some(self.block_params(slot)));
        let result = self.call::<BlockRecord>(endpoint, &request).await;

        match &result {
            Ok(block) => debug!(
                endpoint = %endpoint,
                slot,
                blockhash = %block.blockhash,
                transactions = block.transactions.len(),
                "getBlock succeeded"
            ),
            Err(e) => debug!(endpoint = %endpoint, slot, error = %e, "getBlock failed"),
        }
        result
    }
}
