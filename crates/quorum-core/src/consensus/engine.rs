//! Round orchestration.
//!
//! A pass runs the slot round, picks the slot to inspect (operator override
//! first, quorum winner otherwise), then runs the block round for that slot.
//! There is exactly one pass and no loop back to the slot round.

use super::{
    compare,
    config::RoundConfig,
    fanout::FanOutExecutor,
    quorum,
    types::{BlockRoundOutcome, RunReport, SlotChoice, SlotRoundOutcome, SlotSource},
};
use crate::{
    config::ConfigError,
    upstream::{Endpoint, LedgerClient},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sequences the slot round and the block round over a fixed endpoint set.
pub struct RoundOrchestrator {
    client: Arc<dyn LedgerClient>,
    endpoints: Vec<Endpoint>,
    executor: FanOutExecutor,
    slot_override: Option<u64>,
}

impl RoundOrchestrator {
    /// Creates an orchestrator for `endpoints`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoEndpoints`] if the endpoint set is empty.
    pub fn new(
        client: Arc<dyn LedgerClient>,
        endpoints: Vec<Endpoint>,
        config: &RoundConfig,
    ) -> Result<Self, ConfigError> {
        if endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }

        Ok(Self {
            client,
            endpoints,
            executor: FanOutExecutor::from_config(config),
            slot_override: config.override_slot(),
        })
    }

    #[must_use]
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Runs one full pass.
    ///
    /// Endpoint failures never abort the pass; a slot round in which every
    /// endpoint failed ends the pass without a block round unless an override
    /// slot is configured.
    pub async fn run(&self) -> RunReport {
        info!(endpoints = self.endpoints.len(), "starting quorum pass");

        let slot_round = self.run_slot_round().await;
        let chosen = self.choose_slot(&slot_round);

        let block_round = match chosen {
            Some(choice) => Some(self.run_block_round(choice.slot).await),
            None => {
                warn!(
                    attempted = slot_round.attempted,
                    failed = slot_round.failures.len(),
                    "no quorum: no endpoint reported a slot, skipping block round"
                );
                None
            }
        };

        RunReport { endpoints: self.endpoints.len(), slot_round, chosen, block_round }
    }

    /// Queries every endpoint for its current slot and ranks the answers.
    pub async fn run_slot_round(&self) -> SlotRoundOutcome {
        let client = Arc::clone(&self.client);
        let fan_out = self
            .executor
            .execute("current_slot", &self.endpoints, move |endpoint| {
                let client = Arc::clone(&client);
                async move { client.current_slot(&endpoint).await }
            })
            .await;

        let classes = quorum::slot_quorum(fan_out.successes, fan_out.attempted);
        debug!(classes = classes.len(), "slot round aggregated");

        SlotRoundOutcome { attempted: fan_out.attempted, failures: fan_out.failures, classes }
    }

    /// Picks the block-round slot. The override always wins and skips the vote.
    #[must_use]
    pub fn choose_slot(&self, slot_round: &SlotRoundOutcome) -> Option<SlotChoice> {
        if let Some(slot) = self.slot_override {
            return Some(SlotChoice { slot, source: SlotSource::Override });
        }

        slot_round.winner().map(|class| SlotChoice { slot: class.key, source: SlotSource::Quorum })
    }

    /// Queries every endpoint for the block at `slot`, ranks the variants by
    /// block hash and compares content within each variant.
    pub async fn run_block_round(&self, slot: u64) -> BlockRoundOutcome {
        let client = Arc::clone(&self.client);
        let fan_out = self
            .executor
            .execute("block_at", &self.endpoints, move |endpoint| {
                let client = Arc::clone(&client);
                async move { client.block_at(&endpoint, slot).await }
            })
            .await;

        let classes = quorum::block_quorum(fan_out.successes, fan_out.attempted);
        let comparisons = classes.iter().filter_map(compare::compare_class).collect();
        debug!(slot, variants = classes.len(), "block round aggregated");

        BlockRoundOutcome {
            slot,
            attempted: fan_out.attempted,
            failures: fan_out.failures,
            classes,
            comparisons,
        }
    }
}
