use serde::{Serialize, Serializer};
use std::{fmt, sync::Arc};

/// Address of one ledger node, as configured by the operator.
///
/// Opaque to the quorum engine: it is only used as an identity for reporting
/// and handed back to the [`LedgerClient`](super::LedgerClient) when querying.
/// Clones share the underlying string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint(Arc<str>);

impl Endpoint {
    #[must_use]
    pub fn new(address: &str) -> Self {
        Self(Arc::from(address))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the endpoint set from configured addresses, preserving order.
    ///
    /// Duplicates are kept: each entry is queried and counted on its own.
    #[must_use]
    pub fn from_addresses<S: AsRef<str>>(addresses: &[S]) -> Vec<Self> {
        addresses.iter().map(|a| Self::new(a.as_ref())).collect()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Endpoint {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl Serialize for Endpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
