//! Human-readable reporting of a finished pass as structured log lines.

use crate::{
    block::BlockRecord,
    consensus::{BlockRoundOutcome, EqualityClass, RunReport, SlotRoundOutcome, SlotSource},
};
use chrono::DateTime;
use std::fmt::Display;
use tracing::{info, warn};

/// Renders a ranked class table as `[{slot:100, N:4, T:5}, ...]`.
#[must_use]
pub fn format_class_table<K: Display, T>(label: &str, classes: &[EqualityClass<K, T>]) -> String {
    let rows = classes
        .iter()
        .map(|class| {
            format!(
                "{{{label}:{}, N:{}, T:{}}}",
                class.key, class.agreement_count, class.total_queried
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{rows}]")
}

/// Renders a block's Unix timestamp as RFC 3339, or `"unknown"`.
#[must_use]
pub fn format_block_time(block_time: Option<i64>) -> String {
    block_time
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map_or_else(|| "unknown".to_string(), |time| time.to_rfc3339())
}

/// Logs every part of a finished pass.
pub fn log_report(report: &RunReport) {
    log_slot_round(&report.slot_round);

    match report.chosen {
        Some(choice) => {
            let source = match choice.source {
                SlotSource::Override => "override",
                SlotSource::Quorum => "quorum",
            };
            info!(slot = choice.slot, source, "chosen slot");
        }
        None => warn!(endpoints = report.endpoints, "no quorum"),
    }

    if let Some(block_round) = &report.block_round {
        log_block_round(block_round);
    }
}

/// Logs per-endpoint slots and the ranked slot table.
pub fn log_slot_round(outcome: &SlotRoundOutcome) {
    for class in &outcome.classes {
        for endpoint in class.endpoints() {
            info!(endpoint = %endpoint, slot = class.key, "slot reported");
        }
    }
    for failure in &outcome.failures {
        warn!(
            endpoint = %failure.endpoint,
            kind = failure.error.kind(),
            error = %failure.error,
            "slot query failed"
        );
    }

    info!(
        attempted = outcome.attempted,
        responded = outcome.responded(),
        classes = %format_class_table("slot", &outcome.classes),
        "slot quorum"
    );
}

/// Logs the block variants and per-endpoint content verdicts.
pub fn log_block_round(outcome: &BlockRoundOutcome) {
    for failure in &outcome.failures {
        warn!(
            endpoint = %failure.endpoint,
            slot = outcome.slot,
            kind = failure.error.kind(),
            error = %failure.error,
            "block query failed"
        );
    }

    info!(
        slot = outcome.slot,
        variants = outcome.variants(),
        classes = %format_class_table("hash", &outcome.classes),
        "block quorum"
    );
    if outcome.variants() > 1 {
        warn!(
            slot = outcome.slot,
            variants = outcome.variants(),
            "nodes disagree on block content"
        );
    }

    for (class, comparison) in outcome.classes.iter().zip(&outcome.comparisons) {
        for (member, verdict) in class.members.iter().zip(&comparison.verdicts) {
            log_verdict(&member.value, verdict.endpoint.as_str(), verdict.matches_reference);
        }
        if comparison.mismatches() > 0 {
            warn!(
                blockhash = %comparison.blockhash,
                reference = %comparison.reference,
                mismatches = comparison.mismatches(),
                "block content differs under the same hash"
            );
        }
    }
}

fn log_verdict(block: &BlockRecord, endpoint: &str, matches: bool) {
    let block_time = format_block_time(block.block_time);
    if matches {
        info!(
            endpoint,
            blockhash = %block.blockhash,
            block_time = %block_time,
            transactions = block.transactions.len(),
            "block matches reference"
        );
    } else {
        warn!(
            endpoint,
            blockhash = %block.blockhash,
            block_time = %block_time,
            transactions = block.transactions.len(),
            "block does not match reference"
        );
    }
}
