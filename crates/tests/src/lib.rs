//! Integration Tests for slot-quorum
//!
//! This crate contains various test modules:
//!
//! - `quorum_round_tests`: Full passes through `RpcLedgerClient` against mock nodes
//! - `rpc_client_tests`: Wire-level behaviour of the JSON-RPC ledger client
//! - `mock_infrastructure`: Reusable mock nodes and block fixtures
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --package tests
//! ```

#[cfg(test)]
mod quorum_round_tests;
