//! Majority-vote aggregation over equality classes.
//!
//! All functions are stateless. The same generic grouping serves both rounds:
//! slot observations are keyed by the slot number, block observations by the
//! block hash.
//!
//! # Ranking
//!
//! Classes are ordered by agreement count, descending. Equal counts are broken
//! by key, descending: the numerically larger slot (the more advanced view of
//! the ledger) or the lexicographically larger block hash comes first. Both
//! rounds use this one rule, so the winner and the full table are independent
//! of the order endpoints were configured or answered in.

use super::types::{BlockClass, EqualityClass, Observation, SlotClass};
use crate::block::BlockRecord;
use std::{cmp::Ordering, collections::HashMap, hash::Hash};

/// Groups observations into equality classes by `key_of`.
///
/// Classes are returned in first-seen order and members keep input order.
/// `total_queried` is stamped on every class unchanged, so endpoints that
/// failed still count toward T.
#[must_use]
pub fn group_observations<K, T, F>(
    observations: Vec<Observation<T>>,
    total_queried: usize,
    key_of: F,
) -> Vec<EqualityClass<K, T>>
where
    K: Eq + Hash + Clone,
    T: Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::with_capacity(observations.len());
    let mut classes: Vec<EqualityClass<K, T>> = Vec::new();

    for observation in observations {
        let key = key_of(&observation.value);

        if let Some(class) = index.get(&key).and_then(|&i| classes.get_mut(i)) {
            class.members.push(observation);
            class.agreement_count += 1;
            continue;
        }

        index.insert(key.clone(), classes.len());
        classes.push(EqualityClass {
            key,
            representative: observation.value.clone(),
            members: vec![observation],
            agreement_count: 1,
            total_queried,
        });
    }

    classes
}

/// Orders classes strongest agreement first, larger key first on ties.
pub fn rank_classes<K: Ord, T>(classes: &mut [EqualityClass<K, T>]) {
    classes.sort_by(compare_classes);
}

fn compare_classes<K: Ord, T>(a: &EqualityClass<K, T>, b: &EqualityClass<K, T>) -> Ordering {
    b.agreement_count.cmp(&a.agreement_count).then_with(|| b.key.cmp(&a.key))
}

/// Groups and ranks in one step.
#[must_use]
pub fn find_quorum<K, T, F>(
    observations: Vec<Observation<T>>,
    total_queried: usize,
    key_of: F,
) -> Vec<EqualityClass<K, T>>
where
    K: Eq + Hash + Ord + Clone,
    T: Clone,
    F: Fn(&T) -> K,
{
    let mut classes = group_observations(observations, total_queried, key_of);
    rank_classes(&mut classes);
    classes
}

/// Ranked slot classes, keyed by the slot number.
#[must_use]
pub fn slot_quorum(observations: Vec<Observation<u64>>, total_queried: usize) -> Vec<SlotClass> {
    find_quorum(observations, total_queried, |slot| *slot)
}

/// Ranked block classes, keyed by block hash.
#[must_use]
pub fn block_quorum(
    observations: Vec<Observation<BlockRecord>>,
    total_queried: usize,
) -> Vec<BlockClass> {
    find_quorum(observations, total_queried, |block| block.blockhash.clone())
}
