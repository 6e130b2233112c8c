//! Block records as returned by a node's `getBlock` call.
//!
//! Field names follow the node's camelCase JSON so that records deserialize
//! straight from the RPC result. Transactions are requested with `base64`
//! encoding; the decoded bytes are the serialized wire payload compared by the
//! content comparator.

use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to obtain the serialized payload of a transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("unsupported transaction encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("malformed {encoding} payload: {reason}")]
    Malformed { encoding: String, reason: String },
}

/// A block at one slot, as reported by one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub blockhash: String,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub block_height: Option<u64>,
    pub previous_blockhash: String,
    pub parent_slot: u64,
    #[serde(default)]
    pub transactions: Vec<BlockTransaction>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
}

/// A transaction inside a block: status metadata plus the encoded payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTransaction {
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
    pub transaction: EncodedTransaction,
}

/// Encoded transaction payload, `[data, encoding]` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedTransaction(pub String, pub String);

impl EncodedTransaction {
    /// Builds a base64-encoded payload from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(base64::engine::general_purpose::STANDARD.encode(bytes), "base64".to_string())
    }

    /// The encoding the node used for this payload.
    #[must_use]
    pub fn encoding(&self) -> &str {
        &self.1
    }

    /// Decodes the payload into its serialized wire bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] when the encoding is not `base64` or the
    /// data does not decode.
    pub fn serialize(&self) -> Result<Vec<u8>, SerializationError> {
        match self.encoding() {
            "base64" => base64::engine::general_purpose::STANDARD.decode(&self.0).map_err(|e| {
                SerializationError::Malformed {
                    encoding: "base64".to_string(),
                    reason: e.to_string(),
                }
            }),
            other => Err(SerializationError::UnsupportedEncoding(other.to_string())),
        }
    }
}

/// Transaction status metadata.
///
/// The commonly inspected fields are typed; everything else the node sends
/// (inner instructions, token balances, loaded addresses, ...) is kept in
/// `other` so that structural equality covers the whole object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    pub fee: u64,
    #[serde(default)]
    pub pre_balances: Vec<u64>,
    #[serde(default)]
    pub post_balances: Vec<u64>,
    #[serde(default)]
    pub log_messages: Option<Vec<String>>,
    #[serde(default)]
    pub compute_units_consumed: Option<u64>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// A reward entry credited in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub pubkey: String,
    pub lamports: i64,
    pub post_balance: u64,
    #[serde(default)]
    pub reward_type: Option<String>,
    #[serde(default)]
    pub commission: Option<u8>,
}
