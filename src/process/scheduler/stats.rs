/*!
 * Scheduler Statistics
 * Track and report scheduler activity
 */

use super::Scheduler;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Counters accumulated across scheduler runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStats {
    /// Completed `run` calls
    pub runs: u64,
    /// Records run to completion
    pub executed: u64,
    /// Work routine invocations
    pub time_slices: u64,
    /// Slices that ended with the record still owing service time
    pub preemptions: u64,
}

impl SchedulerStats {
    pub(super) fn record_completion(&mut self) {
        self.executed += 1;
        self.time_slices += 1;
    }

    pub(super) fn record_preemption(&mut self) {
        self.preemptions += 1;
        self.time_slices += 1;
    }
}

impl AddAssign for SchedulerStats {
    fn add_assign(&mut self, rhs: Self) {
        self.runs += rhs.runs;
        self.executed += rhs.executed;
        self.time_slices += rhs.time_slices;
        self.preemptions += rhs.preemptions;
    }
}

impl Scheduler {
    /// Statistics accumulated since construction or the last reset
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SchedulerStats::default();
    }
}
