//! Round result types.

use crate::{
    block::BlockRecord,
    upstream::{Endpoint, UpstreamError},
};
use serde::{ser::SerializeStruct, Serialize, Serializer};

/// A value returned by one endpoint for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation<T> {
    pub endpoint: Endpoint,
    pub value: T,
}

impl<T> Observation<T> {
    #[must_use]
    pub fn new(endpoint: Endpoint, value: T) -> Self {
        Self { endpoint, value }
    }
}

/// An endpoint whose query failed during a round.
#[derive(Debug)]
pub struct EndpointFailure {
    pub endpoint: Endpoint,
    pub error: UpstreamError,
}

impl Serialize for EndpointFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("EndpointFailure", 3)?;
        state.serialize_field("endpoint", &self.endpoint)?;
        state.serialize_field("kind", self.error.kind())?;
        state.serialize_field("error", &self.error.to_string())?;
        state.end()
    }
}

/// Everything a fan-out produced, in endpoint-set order.
#[derive(Debug)]
pub struct FanOutResult<T> {
    /// Number of endpoints queried (T).
    pub attempted: usize,
    pub successes: Vec<Observation<T>>,
    pub failures: Vec<EndpointFailure>,
}

/// Endpoints whose values share an equality key.
///
/// `agreement_count` is N, the number of members; `total_queried` is T, the
/// size of the endpoint set at round start, identical for every class of a
/// round.
#[derive(Debug, Clone)]
pub struct EqualityClass<K, T> {
    pub key: K,
    /// Value of the first member.
    pub representative: T,
    /// Members in endpoint-set order.
    pub members: Vec<Observation<T>>,
    pub agreement_count: usize,
    pub total_queried: usize,
}

impl<K, T> EqualityClass<K, T> {
    /// Endpoints belonging to this class.
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.members.iter().map(|m| &m.endpoint)
    }

    /// Agreement as a fraction of all endpoints queried.
    #[must_use]
    pub fn agreement_ratio(&self) -> f64 {
        if self.total_queried == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.agreement_count as f64 / self.total_queried as f64;
        ratio
    }
}

// Members are reported by endpoint only; the representative carries the value.
impl<K: Serialize, T: Serialize> Serialize for EqualityClass<K, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let endpoints: Vec<&Endpoint> = self.endpoints().collect();
        let mut state = serializer.serialize_struct("EqualityClass", 5)?;
        state.serialize_field("key", &self.key)?;
        state.serialize_field("agreement_count", &self.agreement_count)?;
        state.serialize_field("total_queried", &self.total_queried)?;
        state.serialize_field("endpoints", &endpoints)?;
        state.serialize_field("representative", &self.representative)?;
        state.end()
    }
}

/// Slot-round class, keyed by the slot number itself.
pub type SlotClass = EqualityClass<u64, u64>;

/// Block-round class, keyed by block hash.
pub type BlockClass = EqualityClass<String, BlockRecord>;

/// Content comparison of one endpoint's block against its class reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentVerdict {
    pub endpoint: Endpoint,
    pub is_reference: bool,
    pub matches_reference: bool,
}

/// Comparator output for one block class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassComparison {
    pub blockhash: String,
    pub reference: Endpoint,
    pub verdicts: Vec<ContentVerdict>,
}

impl ClassComparison {
    /// Members whose content differs from the reference despite sharing its hash.
    #[must_use]
    pub fn mismatches(&self) -> usize {
        self.verdicts.iter().filter(|v| !v.matches_reference).count()
    }
}

/// Outcome of the slot round.
#[derive(Debug, Serialize)]
pub struct SlotRoundOutcome {
    pub attempted: usize,
    pub failures: Vec<EndpointFailure>,
    /// Ranked, strongest agreement first.
    pub classes: Vec<SlotClass>,
}

impl SlotRoundOutcome {
    /// The most agreed-upon slot class, if any endpoint answered.
    #[must_use]
    pub fn winner(&self) -> Option<&SlotClass> {
        self.classes.first()
    }

    /// Number of endpoints that produced a slot.
    #[must_use]
    pub fn responded(&self) -> usize {
        self.classes.iter().map(|c| c.agreement_count).sum()
    }
}

/// Where the block-round slot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotSource {
    Quorum,
    Override,
}

/// Slot selected for the block round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotChoice {
    pub slot: u64,
    pub source: SlotSource,
}

/// Outcome of the block round.
#[derive(Debug, Serialize)]
pub struct BlockRoundOutcome {
    pub slot: u64,
    pub attempted: usize,
    pub failures: Vec<EndpointFailure>,
    /// Ranked, strongest agreement first.
    pub classes: Vec<BlockClass>,
    /// One comparison per class, in the same order as `classes`.
    pub comparisons: Vec<ClassComparison>,
}

impl BlockRoundOutcome {
    /// Number of distinct block-content variants observed for the slot.
    #[must_use]
    pub fn variants(&self) -> usize {
        self.classes.len()
    }

    /// The most agreed-upon block class, if any endpoint answered.
    #[must_use]
    pub fn winner(&self) -> Option<&BlockClass> {
        self.classes.first()
    }
}

/// Result of one complete pass.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub endpoints: usize,
    pub slot_round: SlotRoundOutcome,
    /// `None` when no endpoint reported a slot and no override was given.
    pub chosen: Option<SlotChoice>,
    pub block_round: Option<BlockRoundOutcome>,
}

impl RunReport {
    /// Whether the pass reached the block round.
    #[must_use]
    pub fn reached_block_round(&self) -> bool {
        self.block_round.is_some()
    }
}
