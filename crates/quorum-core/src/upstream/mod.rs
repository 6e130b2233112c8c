//! Access to individual ledger nodes.
//!
//! - [`endpoint`]: the opaque node address used as identity in every round
//! - [`client`]: the [`LedgerClient`] seam and its JSON-RPC implementation
//! - [`http_client`]: concurrency-limited, single-attempt HTTP transport
//! - [`errors`]: [`UpstreamError`], the per-endpoint failure taxonomy

pub mod client;
pub mod endpoint;
pub mod errors;
pub mod http_client;

pub use client::{LedgerClient, RpcLedgerClient};
pub use endpoint::Endpoint;
pub use errors::UpstreamError;
pub use http_client::{HttpClient, HttpClientConfig};
