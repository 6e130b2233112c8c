//! # Quorum Core
//!
//! Core library for slot-quorum polling of ledger RPC nodes.
//!
//! A pass asks every configured node for its current slot, determines which
//! slot the largest group of nodes agrees on, then asks every node for the
//! block at that slot and checks whether the nodes agree on its content.
//!
//! - **[`consensus`]**: Fan-out execution, quorum aggregation, block content
//!   comparison and the two-round orchestrator.
//!
//! - **[`upstream`]**: JSON-RPC transport to individual nodes behind the
//!   [`upstream::LedgerClient`] trait.
//!
//! - **[`block`]**: Block records as returned by the nodes, including
//!   transaction payload serialization.
//!
//! - **[`config`]**: Layered application configuration.
//!
//! - **[`report`]**: Structured log output of a finished pass.
//!
//! ## Pass Flow
//!
//! ```text
//!   endpoints ──► Slot round ──► Slot quorum ──► override? ──► chosen slot
//!                 (fan-out)      (rank by N)        │
//!                                                   ▼
//!   RunReport ◄── Content check ◄── Block quorum ◄── Block round
//!                 (per hash class)  (rank by N)      (fan-out)
//! ```

pub mod block;
pub mod config;
pub mod consensus;
pub mod report;
pub mod types;
pub mod upstream;
