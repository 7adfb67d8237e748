/*!
 * Resource Types
 * Resource kinds, per-kind quantity vectors and admission claims
 */

use crate::core::limits::MIN_VECTOR_CAPACITY;
use crate::core::types::Quantity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of system resource tracked by the admission controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Memory,
    Cpu,
    Gpu,
    Swap,
    Network,
    File,
}

impl ResourceKind {
    /// Every kind, in declaration order
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Memory,
        ResourceKind::Cpu,
        ResourceKind::Gpu,
        ResourceKind::Swap,
        ResourceKind::Network,
        ResourceKind::File,
    ];

    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Cpu => "cpu",
            Self::Gpu => "gpu",
            Self::Swap => "swap",
            Self::Network => "network",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered sequence of `(kind, amount)` pairs
///
/// Append-only from the consumer's point of view: amounts are adjusted in
/// place but entries are never removed. Producers build one entry per kind;
/// the container itself does not enforce uniqueness, and lookups resolve to
/// the first matching entry.
///
/// Backing storage grows by doubling once full, starting from
/// [`MIN_VECTOR_CAPACITY`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<(ResourceKind, Quantity)>", into = "Vec<(ResourceKind, Quantity)>")]
pub struct ResourceVector {
    entries: Vec<(ResourceKind, Quantity)>,
    capacity: usize,
}

impl ResourceVector {
    pub fn new() -> Self {
        Self::with_capacity(MIN_VECTOR_CAPACITY)
    }

    /// Requests below [`MIN_VECTOR_CAPACITY`] are raised to it
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_VECTOR_CAPACITY);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a vector from `(kind, amount)` pairs, preserving order
    pub fn from_pairs(pairs: &[(ResourceKind, Quantity)]) -> Self {
        pairs.iter().copied().collect()
    }

    /// Append an entry - O(1) amortized
    pub fn append(&mut self, kind: ResourceKind, amount: Quantity) {
        if self.entries.len() >= self.capacity {
            self.grow();
        }
        self.entries.push((kind, amount));
    }

    fn grow(&mut self) {
        let new_capacity = (self.capacity * 2).max(MIN_VECTOR_CAPACITY);
        self.entries
            .reserve_exact(new_capacity.saturating_sub(self.entries.len()));
        self.capacity = new_capacity;
    }

    /// Amount recorded for `kind` - linear scan
    pub fn get(&self, kind: ResourceKind) -> Option<Quantity> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, amount)| *amount)
    }

    /// Amount for `kind`, treating an absent kind as zero
    #[inline]
    pub fn amount(&self, kind: ResourceKind) -> Quantity {
        self.get(kind).unwrap_or(0)
    }

    /// Overwrite the amount for `kind`, appending if absent
    pub fn set(&mut self, kind: ResourceKind, amount: Quantity) {
        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = amount,
            None => self.append(kind, amount),
        }
    }

    /// Add `delta` (possibly negative) to the amount for `kind`
    ///
    /// An absent kind is appended with `delta` unless `delta` is zero.
    pub fn adjust(&mut self, kind: ResourceKind, delta: Quantity) {
        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 += delta,
            None if delta != 0 => self.append(kind, delta),
            None => {}
        }
    }

    /// Independent copy with identical order, values and backing capacity
    pub fn deep_copy(&self) -> Self {
        let mut copy = Self::with_capacity(self.capacity);
        copy.entries.extend_from_slice(&self.entries);
        copy
    }

    /// True when every amount in `need` fits within this vector
    ///
    /// Kinds absent from `self` count as zero; an empty `need` always fits.
    pub fn covers(&self, need: &ResourceVector) -> bool {
        need.iter().all(|(kind, amount)| amount <= self.amount(kind))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, Quantity)> + '_ {
        self.entries.iter().copied()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.entries.iter().map(|(kind, _)| *kind)
    }

    /// First kind recorded more than once, if any
    pub fn duplicate_kind(&self) -> Option<ResourceKind> {
        self.entries
            .iter()
            .enumerate()
            .find(|(i, (kind, _))| self.entries[..*i].iter().any(|(k, _)| k == kind))
            .map(|(_, (kind, _))| *kind)
    }

    /// Sum of all amounts
    pub fn total(&self) -> Quantity {
        self.entries.iter().map(|(_, amount)| amount).sum()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Logical backing capacity (doubles on growth)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ResourceVector {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ResourceVector {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for ResourceVector {}

impl FromIterator<(ResourceKind, Quantity)> for ResourceVector {
    fn from_iter<I: IntoIterator<Item = (ResourceKind, Quantity)>>(iter: I) -> Self {
        let mut vector = Self::new();
        for (kind, amount) in iter {
            vector.append(kind, amount);
        }
        vector
    }
}

impl From<Vec<(ResourceKind, Quantity)>> for ResourceVector {
    fn from(pairs: Vec<(ResourceKind, Quantity)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<ResourceVector> for Vec<(ResourceKind, Quantity)> {
    fn from(vector: ResourceVector) -> Self {
        vector.entries
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (kind, amount)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", kind, amount)?;
        }
        f.write_str("]")
    }
}

/// One row of an admission table: declared maximum and initially assigned
/// amount for a single resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub kind: ResourceKind,
    pub max: Quantity,
    pub assigned: Quantity,
}

impl Claim {
    pub const fn new(kind: ResourceKind, max: Quantity, assigned: Quantity) -> Self {
        Self {
            kind,
            max,
            assigned,
        }
    }

    /// Split a claim table into `(max, assigned)` vectors
    pub fn split(claims: &[Claim]) -> (ResourceVector, ResourceVector) {
        let max = claims.iter().map(|c| (c.kind, c.max)).collect();
        let assigned = claims.iter().map(|c| (c.kind, c.assigned)).collect();
        (max, assigned)
    }
}
