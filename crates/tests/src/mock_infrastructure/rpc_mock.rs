//! RPC Mock Builder for ledger node JSON-RPC testing
//!
//! Wraps mockito to provide `getSlot`/`getBlock` response builders.

use base64::Engine;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};

/// Builder for creating mock ledger node responses.
///
/// Uses mockito internally but provides node-specific helpers.
pub struct RpcMockBuilder {
    server: ServerGuard,
    mocks: Vec<Mock>,
}

impl RpcMockBuilder {
    /// Creates a new RPC mock builder with a fresh mockito server.
    pub async fn new() -> Self {
        Self { server: Server::new_async().await, mocks: Vec::new() }
    }

    /// Returns the URL of the mock server.
    #[must_use]
    pub fn url(&self) -> String {
        self.server.url()
    }

    fn mock_result(&mut self, matcher: Matcher, result: &Value) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(matcher)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": result
                })
                .to_string(),
            )
            .create();

        self.mocks.push(mock);
        self
    }

    /// Mocks a `getSlot` request.
    pub fn mock_get_slot(&mut self, slot: u64) -> &mut Self {
        self.mock_result(Matcher::Regex(r#""method"\s*:\s*"getSlot""#.to_string()), &json!(slot))
    }

    /// Mocks a `getBlock` request for `slot`.
    pub fn mock_get_block(&mut self, slot: u64, block: &Value) -> &mut Self {
        self.mock_result(
            Matcher::Regex(format!(r#""method"\s*:\s*"getBlock".*"params"\s*:\s*\[{slot},"#)),
            block,
        )
    }

    /// Mocks an RPC error response.
    pub fn mock_rpc_error(&mut self, method: &str, code: i64, message: &str) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(Matcher::Regex(format!(r#""method"\s*:\s*"{method}""#)))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": {
                        "code": code,
                        "message": message
                    }
                })
                .to_string(),
            )
            .create();

        self.mocks.push(mock);
        self
    }

    /// Mocks a server error (500).
    pub fn mock_server_error(&mut self) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .with_status(500)
            .with_body("Internal Server Error")
            .create();

        self.mocks.push(mock);
        self
    }

    /// Mocks a 200 response whose body is not JSON-RPC.
    pub fn mock_garbage(&mut self, method: &str) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(Matcher::Regex(format!(r#""method"\s*:\s*"{method}""#)))
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create();

        self.mocks.push(mock);
        self
    }

    /// Returns a reference to the underlying mockito server for advanced mocking.
    pub fn get_server(&mut self) -> &mut mockito::ServerGuard {
        &mut self.server
    }

    /// Verifies all mocks were called.
    #[must_use]
    pub fn verify_all_called(&self) -> bool {
        self.mocks.iter().all(mockito::Mock::matched)
    }
}

/// Builder for constructing `getBlock` results.
pub struct BlockResponseBuilder {
    slot: u64,
    blockhash: String,
    previous_blockhash: String,
    block_time: Option<i64>,
    transactions: Vec<Value>,
    rewards: Vec<Value>,
}

impl BlockResponseBuilder {
    /// Creates a new block response builder for `slot`.
    #[must_use]
    pub fn new(slot: u64) -> Self {
        Self {
            slot,
            blockhash: format!("HASH{slot:040}"),
            previous_blockhash: format!("HASH{:040}", slot.saturating_sub(1)),
            block_time: Some(1_700_000_000 + i64::try_from(slot).unwrap_or(0)),
            transactions: Vec::new(),
            rewards: Vec::new(),
        }
    }

    /// Sets a custom block hash.
    #[must_use]
    pub fn with_blockhash(mut self, hash: impl Into<String>) -> Self {
        self.blockhash = hash.into();
        self
    }

    /// Sets a custom block time, or none.
    #[must_use]
    pub fn with_block_time(mut self, block_time: Option<i64>) -> Self {
        self.block_time = block_time;
        self
    }

    /// Adds a transaction with the given raw payload and fee.
    #[must_use]
    pub fn with_transaction(mut self, payload: &[u8], fee: u64) -> Self {
        self.transactions.push(json!({
            "meta": {
                "err": null,
                "fee": fee,
                "preBalances": [1_000_000, 0],
                "postBalances": [1_000_000 - fee, 0],
                "logMessages": [],
                "innerInstructions": [],
                "status": {"Ok": null}
            },
            "transaction": [base64::engine::general_purpose::STANDARD.encode(payload), "base64"]
        }));
        self
    }

    /// Adds a transaction whose payload uses a different encoding.
    #[must_use]
    pub fn with_raw_transaction(mut self, data: &str, encoding: &str) -> Self {
        self.transactions.push(json!({
            "meta": null,
            "transaction": [data, encoding]
        }));
        self
    }

    /// Adds a reward entry.
    #[must_use]
    pub fn with_reward(mut self, pubkey: &str, lamports: i64) -> Self {
        self.rewards.push(json!({
            "pubkey": pubkey,
            "lamports": lamports,
            "postBalance": 1_000_000_000i64 + lamports,
            "rewardType": "Fee",
            "commission": null
        }));
        self
    }

    /// Builds the block result JSON.
    #[must_use]
    pub fn build(self) -> Value {
        json!({
            "blockhash": self.blockhash,
            "blockTime": self.block_time,
            "blockHeight": self.slot.saturating_sub(10),
            "previousBlockhash": self.previous_blockhash,
            "parentSlot": self.slot.saturating_sub(1),
            "transactions": self.transactions,
            "rewards": self.rewards
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rpc_mock_builder_creation() {
        let mock = RpcMockBuilder::new().await;
        assert!(!mock.url().is_empty());
    }

    #[test]
    fn test_block_response_builder() {
        let block = BlockResponseBuilder::new(100).with_transaction(b"tx", 5000).build();
        assert_eq!(block["parentSlot"], 99);
        assert_eq!(block["transactions"][0]["transaction"][1], "base64");
        assert_eq!(block["transactions"][0]["meta"]["fee"], 5000);
    }

    #[test]
    fn test_block_response_with_custom_hash() {
        let block = BlockResponseBuilder::new(100).with_blockhash("CUSTOM").build();
        assert_eq!(block["blockhash"], "CUSTOM");
    }
}
