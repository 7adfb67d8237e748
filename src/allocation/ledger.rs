/*!
 * Admission Ledger
 * Per-process claim bookkeeping held by the admission controller
 */

use crate::core::types::{EntryId, Pid};
use crate::process::types::ProcessRecord;
use crate::resources::ResourceVector;
use std::fmt;

/// Who the admitted process record belongs to
///
/// Owned records are dropped when their entry completes. Borrowed records
/// belong to the caller and are handed back once the entry completes, so a
/// record is never released twice.
#[derive(Debug, Clone)]
pub enum ProcessHandle {
    Owned(ProcessRecord),
    Borrowed(ProcessRecord),
}

impl ProcessHandle {
    pub fn record(&self) -> &ProcessRecord {
        match self {
            Self::Owned(record) | Self::Borrowed(record) => record,
        }
    }

    pub fn record_mut(&mut self) -> &mut ProcessRecord {
        match self {
            Self::Owned(record) | Self::Borrowed(record) => record,
        }
    }

    pub fn into_record(self) -> ProcessRecord {
        match self {
            Self::Owned(record) | Self::Borrowed(record) => record,
        }
    }

    #[inline]
    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }

    /// Invoke the record's work routine, keeping the ownership tag
    pub fn invoke(self) -> Self {
        match self {
            Self::Owned(record) => Self::Owned(record.invoke()),
            Self::Borrowed(record) => Self::Borrowed(record.invoke()),
        }
    }
}

/// One admitted process and its claim vectors
///
/// `need` equals `max - assigned` per kind right after admission. Claim and
/// release steps update all three vectors together; nothing re-derives
/// `need` on its own.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub(super) id: EntryId,
    pub(super) process: ProcessHandle,
    pub(super) max: ResourceVector,
    pub(super) assigned: ResourceVector,
    pub(super) need: ResourceVector,
}

impl LedgerEntry {
    #[inline]
    pub fn id(&self) -> EntryId {
        self.id
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.process.record().id
    }

    pub fn process(&self) -> &ProcessHandle {
        &self.process
    }

    pub fn max(&self) -> &ResourceVector {
        &self.max
    }

    pub fn assigned(&self) -> &ResourceVector {
        &self.assigned
    }

    pub fn need(&self) -> &ResourceVector {
        &self.need
    }

    /// True when `need == max - assigned` for every kind in `max`
    pub fn need_is_consistent(&self) -> bool {
        self.max
            .iter()
            .all(|(kind, max)| self.need.amount(kind) == max - self.assigned.amount(kind))
    }

    /// Run the process's work routine
    pub(super) fn execute(mut self) -> Self {
        self.process = self.process.invoke();
        self
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}{})",
            self.id,
            self.process.record(),
            if self.process.is_borrowed() { ", borrowed" } else { "" }
        )?;
        writeln!(f, "    max:      {}", self.max)?;
        writeln!(f, "    assigned: {}", self.assigned)?;
        write!(f, "    need:     {}", self.need)
    }
}
