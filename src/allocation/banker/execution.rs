/*!
 * Claim / Execute / Release
 * Drives a planned safe order to completion
 */

use super::safety::SafetyCheck;
use super::AdmissionController;
use crate::allocation::ledger::{LedgerEntry, ProcessHandle};
use crate::core::types::Pid;
use crate::monitoring::span_run;
use crate::process::types::ProcessRecord;
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Outcome of one `run` call
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Correlates this run's log lines
    pub run_id: String,
    /// Process ids in the order they completed
    pub completed: Vec<Pid>,
    /// Caller-owned records handed back, in completion order
    pub returned: Vec<ProcessRecord>,
    /// True when the initial state was unsafe and nothing ran
    pub halted: bool,
}

impl AdmissionController {
    /// Run every admitted entry to completion along one safe order
    ///
    /// The order is planned once up front; an unsafe initial state halts the
    /// run before any claim. For each entry in turn its full remaining need
    /// is claimed, its work routine is invoked, its maximum is released and
    /// the entry is removed. The safety search is repeated after every
    /// release as a consistency check only.
    ///
    /// # Panics
    ///
    /// Panics if the remaining entries become unsafe after a release, which
    /// means the ledger vectors were left inconsistent.
    pub fn run(&mut self) -> RunReport {
        let span = span_run(self.entries.len());
        let _guard = span.enter();

        let mut report = RunReport {
            run_id: span.run_id().to_string(),
            completed: Vec::with_capacity(self.entries.len()),
            returned: Vec::new(),
            halted: false,
        };

        let order = match self.compute_safe_order() {
            SafetyCheck::Safe(order) => order,
            SafetyCheck::Unsafe => {
                warn!(entries = self.entries.len(), "Initial state is unsafe, nothing will run");
                report.halted = true;
                span.record_halted(true);
                return report;
            }
        };
        info!(order = ?order, "Safe order planned");

        for id in order {
            let Some(idx) = self.position(id) else {
                error!(entry = %id, "Planned entry vanished from the ledger");
                panic!("ledger entry {} missing during run", id);
            };

            let mut entry = self.entries.remove(idx);
            self.claim(&mut entry);
            let mut entry = entry.execute();
            self.release(&mut entry);

            let pid = entry.pid();
            report.completed.push(pid);
            match entry.process {
                ProcessHandle::Borrowed(record) => report.returned.push(record),
                ProcessHandle::Owned(_) => {}
            }

            let verdict = self.compute_safe_order();
            if !verdict.is_safe() {
                error!(pid, available = %self.available, "Unsafe state after release");
            }
            assert!(
                verdict.is_safe(),
                "system became unsafe after releasing process {}",
                pid
            );
        }

        span.record_completed(report.completed.len());
        span.record_halted(false);
        info!(completed = report.completed.len(), available = %self.available, "Run finished");
        report
    }

    /// Move the entry's whole remaining need from `available` to `assigned`
    fn claim(&mut self, entry: &mut LedgerEntry) {
        let need: Vec<_> = entry.need.iter().collect();
        for (kind, amount) in need {
            self.available.adjust(kind, -amount);
            entry.assigned.adjust(kind, amount);
            entry.need.set(kind, 0);
        }
        debug!(pid = entry.pid(), assigned = %entry.assigned, "Claimed");
    }

    /// Return the entry's maximum to `available`
    fn release(&mut self, entry: &mut LedgerEntry) {
        for (kind, amount) in entry.max.iter() {
            self.available.adjust(kind, amount);
            entry.assigned.adjust(kind, -amount);
            entry.need.adjust(kind, amount);
        }
        debug!(pid = entry.pid(), available = %self.available, "Released");
    }
}
