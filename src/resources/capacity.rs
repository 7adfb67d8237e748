/*!
 * System Capacity
 * Total amount of each resource kind the simulated machine provides
 */

use super::types::{ResourceKind, ResourceVector};
use crate::core::types::Quantity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Configured total per resource kind
///
/// The admission controller starts with `available == total` and keeps the
/// capacity around to audit conservation: `available + Σ assigned == total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemCapacity {
    totals: BTreeMap<ResourceKind, Quantity>,
}

impl SystemCapacity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style total for one kind
    pub fn with(mut self, kind: ResourceKind, total: Quantity) -> Self {
        self.totals.insert(kind, total);
        self
    }

    pub fn set(&mut self, kind: ResourceKind, total: Quantity) {
        self.totals.insert(kind, total);
    }

    /// Total for `kind`, zero if not configured
    pub fn total(&self, kind: ResourceKind) -> Quantity {
        self.totals.get(&kind).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, Quantity)> + '_ {
        self.totals.iter().map(|(kind, total)| (*kind, *total))
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Initial availability vector, one entry per configured kind
    pub fn to_vector(&self) -> ResourceVector {
        self.iter().collect()
    }
}

impl From<&ResourceVector> for SystemCapacity {
    fn from(vector: &ResourceVector) -> Self {
        let mut capacity = Self::new();
        for (kind, amount) in vector.iter() {
            *capacity.totals.entry(kind).or_insert(0) += amount;
        }
        capacity
    }
}

impl FromIterator<(ResourceKind, Quantity)> for SystemCapacity {
    fn from_iter<I: IntoIterator<Item = (ResourceKind, Quantity)>>(iter: I) -> Self {
        Self {
            totals: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for SystemCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SystemCapacity {}", self.to_vector())
    }
}
