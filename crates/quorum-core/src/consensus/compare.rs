//! Deep content comparison of block records sharing a block hash.
//!
//! Hash equality should already imply content equality. The comparator is a
//! diagnostic that surfaces nodes returning divergent records under the same
//! hash, including differences that only show up in the serialized
//! transaction bytes. It never changes quorum counts.

use super::types::{BlockClass, ClassComparison, ContentVerdict};
use crate::block::{BlockRecord, BlockTransaction, EncodedTransaction, Reward};
use tracing::warn;

/// Field-by-field content equality of two block records.
#[must_use]
pub fn blocks_content_equal(a: &BlockRecord, b: &BlockRecord) -> bool {
    a.blockhash == b.blockhash &&
        a.block_time == b.block_time &&
        a.block_height == b.block_height &&
        a.previous_blockhash == b.previous_blockhash &&
        a.parent_slot == b.parent_slot &&
        transactions_equal(&a.transactions, &b.transactions) &&
        rewards_equal(&a.rewards, &b.rewards)
}

/// Ordered transaction equality: equal metadata and byte-identical payloads.
///
/// A payload that cannot be serialized on one side only makes the comparison
/// a mismatch. When neither side serializes, the raw `(data, encoding)` pairs
/// are compared, so a record always matches itself.
#[must_use]
pub fn transactions_equal(a: &[BlockTransaction], b: &[BlockTransaction]) -> bool {
    a.len() == b.len() &&
        a.iter()
            .zip(b)
            .enumerate()
            .all(|(index, (x, y))| {
                x.meta == y.meta && payloads_equal(index, &x.transaction, &y.transaction)
            })
}

fn payloads_equal(index: usize, a: &EncodedTransaction, b: &EncodedTransaction) -> bool {
    match (a.serialize(), b.serialize()) {
        (Ok(left), Ok(right)) => left == right,
        (Err(_), Err(_)) => a == b,
        (Err(error), _) | (_, Err(error)) => {
            warn!(
                transaction_index = index,
                error = %error,
                "transaction payload could not be serialized, treating as content mismatch"
            );
            false
        }
    }
}

/// Pairwise, in-order reward equality.
#[must_use]
pub fn rewards_equal(a: &[Reward], b: &[Reward]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Compares every member of a block class against its first member.
///
/// Returns `None` only for a class without members, which the aggregator
/// never produces.
#[must_use]
pub fn compare_class(class: &BlockClass) -> Option<ClassComparison> {
    let reference = class.members.first()?;

    let verdicts = class
        .members
        .iter()
        .enumerate()
        .map(|(position, member)| ContentVerdict {
            endpoint: member.endpoint.clone(),
            is_reference: position == 0,
            matches_reference: position == 0
                || blocks_content_equal(&member.value, &reference.value),
        })
        .collect();

    Some(ClassComparison {
        blockhash: class.key.clone(),
        reference: reference.endpoint.clone(),
        verdicts,
    })
}
