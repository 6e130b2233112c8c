//! Full quorum passes through the JSON-RPC client against mock nodes.

use crate::mock_infrastructure::{
    create_node, create_orchestrator, node_urls, BlockResponseBuilder, RpcMockBuilder,
    DEAD_ENDPOINT,
};
use quorum_core::{
    consensus::{SlotChoice, SlotSource},
    report,
};

fn canonical_block(slot: u64) -> BlockResponseBuilder {
    BlockResponseBuilder::new(slot)
        .with_blockhash(format!("CANONICAL-{slot}"))
        .with_transaction(b"transfer-1", 5000)
        .with_transaction(b"transfer-2", 5000)
        .with_reward("Leader1111", 10_000)
}

#[tokio::test]
async fn test_majority_slot_and_agreeing_blocks() {
    let mut nodes = Vec::new();
    for _ in 0..4 {
        nodes.push(create_node(100, canonical_block(100)).await);
    }
    // lagging node still serves the block at 100
    let mut lagging = RpcMockBuilder::new().await;
    lagging.mock_get_slot(99).mock_get_block(100, &canonical_block(100).build());
    nodes.push(lagging);

    let run = create_orchestrator(&node_urls(&nodes), None).run().await;
    report::log_report(&run);

    assert_eq!(run.chosen, Some(SlotChoice { slot: 100, source: SlotSource::Quorum }));
    assert_eq!(
        report::format_class_table("slot", &run.slot_round.classes),
        "[{slot:100, N:4, T:5}, {slot:99, N:1, T:5}]"
    );

    let block_round = run.block_round.expect("block round runs");
    assert_eq!(block_round.variants(), 1);
    assert_eq!(block_round.classes[0].agreement_count, 5);
    assert!(block_round.failures.is_empty());
    assert_eq!(block_round.comparisons[0].mismatches(), 0);
}

#[tokio::test]
async fn test_override_slot_fetches_older_block() {
    let mut nodes = Vec::new();
    for _ in 0..3 {
        let mut node = RpcMockBuilder::new().await;
        node.mock_get_slot(100).mock_get_block(50, &canonical_block(50).build());
        nodes.push(node);
    }

    let run = create_orchestrator(&node_urls(&nodes), Some(50)).run().await;

    assert_eq!(run.chosen, Some(SlotChoice { slot: 50, source: SlotSource::Override }));
    let block_round = run.block_round.expect("override runs block round");
    assert_eq!(block_round.slot, 50);
    assert_eq!(block_round.winner().map(|c| c.key.as_str()), Some("CANONICAL-50"));
    assert!(nodes.iter().all(RpcMockBuilder::verify_all_called));
}

#[tokio::test]
async fn test_all_nodes_unreachable() {
    let addresses = vec![DEAD_ENDPOINT.to_string(); 3];

    let run = create_orchestrator(&addresses, None).run().await;
    report::log_report(&run);

    assert!(run.slot_round.classes.is_empty());
    assert_eq!(run.slot_round.failures.len(), 3);
    assert!(run.chosen.is_none());
    assert!(!run.reached_block_round());
}

#[tokio::test]
async fn test_failing_nodes_count_toward_total() {
    let healthy_a = create_node(700, canonical_block(700)).await;
    let healthy_b = create_node(700, canonical_block(700)).await;
    let mut broken = RpcMockBuilder::new().await;
    broken.mock_server_error();

    let addresses =
        vec![healthy_a.url(), broken.url(), DEAD_ENDPOINT.to_string(), healthy_b.url()];
    let run = create_orchestrator(&addresses, None).run().await;

    assert_eq!(run.slot_round.attempted, 4);
    assert_eq!(run.slot_round.failures.len(), 2);
    let winner = run.slot_round.winner().unwrap();
    assert_eq!((winner.key, winner.agreement_count, winner.total_queried), (700, 2, 4));

    let block_round = run.block_round.unwrap();
    assert_eq!(block_round.failures.len(), 2);
    assert_eq!(block_round.classes[0].agreement_count, 2);
    assert_eq!(block_round.classes[0].total_queried, 4);
}

#[tokio::test]
async fn test_forked_block_is_a_separate_variant() {
    let canonical_a = create_node(200, canonical_block(200)).await;
    let canonical_b = create_node(200, canonical_block(200)).await;
    let fork = create_node(
        200,
        BlockResponseBuilder::new(200).with_blockhash("FORK-200").with_transaction(b"other", 5000),
    )
    .await;

    let nodes = [canonical_a, fork, canonical_b];
    let addresses = node_urls(&nodes);
    let run = create_orchestrator(&addresses, None).run().await;
    let block_round = run.block_round.unwrap();

    assert_eq!(block_round.variants(), 2);
    assert_eq!(
        report::format_class_table("hash", &block_round.classes),
        "[{hash:CANONICAL-200, N:2, T:3}, {hash:FORK-200, N:1, T:3}]"
    );
    assert_eq!(block_round.comparisons.len(), 2);
    assert!(block_round.comparisons.iter().all(|c| c.mismatches() == 0));
}

#[tokio::test]
async fn test_same_hash_divergent_content_is_flagged() {
    let honest = create_node(300, canonical_block(300)).await;
    let tampered = create_node(
        300,
        BlockResponseBuilder::new(300)
            .with_blockhash("CANONICAL-300")
            .with_transaction(b"transfer-1", 5000)
            .with_transaction(b"transfer-X", 5000)
            .with_reward("Leader1111", 10_000),
    )
    .await;
    let wrong_encoding = create_node(
        300,
        BlockResponseBuilder::new(300)
            .with_blockhash("CANONICAL-300")
            .with_raw_transaction("{\"signatures\":[]}", "json")
            .with_raw_transaction("{\"signatures\":[]}", "json")
            .with_reward("Leader1111", 10_000),
    )
    .await;

    let nodes = [honest, tampered, wrong_encoding];
    let addresses = node_urls(&nodes);
    let run = create_orchestrator(&addresses, None).run().await;
    report::log_report(&run);
    let block_round = run.block_round.unwrap();

    assert_eq!(block_round.variants(), 1);
    let comparison = &block_round.comparisons[0];
    assert_eq!(comparison.reference.as_str(), addresses[0]);
    let verdicts: Vec<_> = comparison.verdicts.iter().map(|v| v.matches_reference).collect();
    assert_eq!(verdicts, vec![true, false, false]);
    assert_eq!(comparison.mismatches(), 2);
}

#[tokio::test]
async fn test_skipped_slot_reported_as_failures() {
    let mut nodes = Vec::new();
    for _ in 0..2 {
        let mut node = RpcMockBuilder::new().await;
        node.mock_get_slot(400).mock_rpc_error("getBlock", -32007, "Slot 400 was skipped");
        nodes.push(node);
    }

    let run = create_orchestrator(&node_urls(&nodes), None).run().await;
    let block_round = run.block_round.unwrap();

    assert!(block_round.classes.is_empty());
    assert_eq!(block_round.failures.len(), 2);
    assert!(block_round.failures.iter().all(|f| f.error.kind() == "rpc_error"));
}

#[tokio::test]
async fn test_report_json_output() {
    let node = create_node(10, canonical_block(10)).await;

    let run = create_orchestrator(&[node.url()], None).run().await;
    let json = serde_json::to_value(&run).unwrap();

    assert_eq!(json["chosen"]["source"], "quorum");
    assert_eq!(json["slot_round"]["classes"][0]["key"], 10);
    assert_eq!(json["slot_round"]["classes"][0]["endpoints"][0], node.url());
    assert_eq!(json["block_round"]["classes"][0]["representative"]["blockhash"], "CANONICAL-10");
}
