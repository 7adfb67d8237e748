/*!
 * Admission Controller
 * Banker's algorithm deadlock avoidance over a ledger of admitted processes
 *
 * Admission reserves each process's initially assigned resources from
 * `available`. `run` then plans one safe completion order and walks it,
 * claiming each entry's remaining need, executing it and releasing its
 * maximum before removing the entry.
 */

use super::ledger::LedgerEntry;
use crate::core::config::SimulationConfig;
use crate::core::errors::{AdmissionError, ConfigError};
use crate::core::limits::DEFAULT_LEDGER_CAPACITY;
use crate::core::types::EntryId;
use crate::process::types::ProcessRecord;
use crate::resources::{ResourceKind, ResourceVector, SystemCapacity};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info};

mod admission;
mod execution;
mod safety;

pub use execution::RunReport;
pub use safety::SafetyCheck;

/// Banker's algorithm admission controller
///
/// # Invariants
/// - `available[kind] + Σ assigned[kind]` equals the configured capacity for
///   every kind until `run` begins claiming
/// - entry ids are unique and increase with admission order
#[derive(Debug, Clone)]
pub struct AdmissionController {
    entries: Vec<LedgerEntry>,
    available: ResourceVector,
    capacity: SystemCapacity,
    next_id: u64,
}

impl AdmissionController {
    /// Create a controller with every unit of `capacity` available
    pub fn new(capacity: SystemCapacity) -> Self {
        let available = capacity.to_vector();
        Self::with_parts(capacity, available, DEFAULT_LEDGER_CAPACITY)
    }

    /// Create a controller from validated configuration
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut available = ResourceVector::with_capacity(config.vector_capacity);
        for (kind, total) in config.capacity.iter() {
            available.append(kind, total);
        }
        Ok(Self::with_parts(
            config.capacity.clone(),
            available,
            config.ledger_capacity,
        ))
    }

    fn with_parts(capacity: SystemCapacity, available: ResourceVector, ledger_capacity: usize) -> Self {
        info!(capacity = %capacity, "Admission controller initialized");
        Self {
            entries: Vec::with_capacity(ledger_capacity.max(1)),
            available,
            capacity,
            next_id: 1,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in admission order
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn entry(&self, id: EntryId) -> Option<&LedgerEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn available(&self) -> &ResourceVector {
        &self.available
    }

    pub fn capacity(&self) -> &SystemCapacity {
        &self.capacity
    }

    /// Check `available + Σ assigned == capacity` for every kind seen anywhere
    pub fn check_conservation(&self) -> bool {
        let mut kinds: BTreeSet<ResourceKind> = self.capacity.iter().map(|(kind, _)| kind).collect();
        kinds.extend(self.available.kinds());
        for entry in &self.entries {
            kinds.extend(entry.assigned.kinds());
        }

        kinds.into_iter().all(|kind| {
            let held: i64 = self.entries.iter().map(|entry| entry.assigned.amount(kind)).sum();
            self.available.amount(kind) + held == self.capacity.total(kind)
        })
    }

    /// Remove an entry before it runs, returning its assigned resources
    pub fn withdraw(&mut self, id: EntryId) -> Result<ProcessRecord, AdmissionError> {
        let idx = self.position(id).ok_or(AdmissionError::EntryNotFound(id))?;
        let entry = self.entries.remove(idx);
        for (kind, amount) in entry.assigned.iter() {
            self.available.adjust(kind, amount);
        }
        info!(pid = entry.pid(), entry = %id, "Ledger entry withdrawn");
        Ok(entry.process.into_record())
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// Append an entry, doubling ledger storage when full
    fn push_entry(&mut self, entry: LedgerEntry) {
        if self.entries.len() == self.entries.capacity() {
            let grow_by = self.entries.capacity().max(DEFAULT_LEDGER_CAPACITY);
            self.entries.reserve_exact(grow_by);
            debug!(capacity = self.entries.capacity(), "Ledger storage grown");
        }
        self.entries.push(entry);
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl fmt::Display for AdmissionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AdmissionController ({} entries)", self.entries.len())?;
        writeln!(f, "  capacity:  {}", self.capacity)?;
        writeln!(f, "  available: {}", self.available)?;
        for entry in &self.entries {
            writeln!(f, "  {}", entry)?;
        }
        Ok(())
    }
}
