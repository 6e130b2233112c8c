//! # Quorum Algorithm Overview
//!
//! The quorum engine asks every configured node for its view of the ledger
//! and reports what the fleet agrees on.
//!
//! ## Algorithm Steps
//!
//! 1. **Slot round**: query `current_slot` on all endpoints concurrently
//! 2. **Slot quorum**: group answers by slot number, rank by agreement
//! 3. **Slot choice**: operator override if configured, else the top-ranked slot
//! 4. **Block round**: query `block_at(slot)` on all endpoints concurrently
//! 5. **Block quorum**: group blocks by block hash, rank by agreement
//! 6. **Content check**: compare every block in a hash class against the first
//!
//! ## Failure Modes
//!
//! - **Endpoint failure/timeout**: endpoint excluded from that round only; it
//!   still counts toward the round total, lowering N/T
//! - **All endpoints fail the slot round**: "no quorum", block round skipped
//!   (unless an override slot is set)
//! - **Unserializable transaction**: reported as a content mismatch
//!
//! # Module Organization
//!
//! - [`config`]: Round settings (`RoundConfig`)
//! - [`types`]: Observations, equality classes and round outcomes
//! - [`fanout`]: Concurrent per-endpoint query execution
//! - [`quorum`]: Grouping and ranking of equality classes
//! - [`compare`]: Deep block-content comparison
//! - [`engine`]: Orchestration (`RoundOrchestrator` - main entry point)

pub mod compare;
pub mod config;
pub mod engine;
pub mod fanout;
pub mod quorum;
pub mod types;


pub use config::RoundConfig;
pub use engine::RoundOrchestrator;
pub use fanout::FanOutExecutor;
pub use types::{
    BlockClass, BlockRoundOutcome, ClassComparison, ContentVerdict, EndpointFailure,
    EqualityClass, FanOutResult, Observation, RunReport, SlotChoice, SlotClass, SlotRoundOutcome,
    SlotSource,
};
