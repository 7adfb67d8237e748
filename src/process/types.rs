/*!
 * Process Types
 * Common types for simulated processes
 */

use crate::core::limits::PRIORITY_LEVELS;
use crate::core::types::{Pid, ServiceTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Work routine invoked when a process is given the CPU
///
/// Consumes the record and hands back the record the caller continues
/// bookkeeping against (commonly the same one).
pub type WorkRoutine = Arc<dyn Fn(ProcessRecord) -> ProcessRecord + Send + Sync>;

/// Process priority, lowest to highest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessPriority {
    Low,
    #[default]
    Normal,
    High,
    Exigency,
}

impl ProcessPriority {
    /// Priority levels from highest to lowest
    pub const DESCENDING: [ProcessPriority; PRIORITY_LEVELS] = [
        ProcessPriority::Exigency,
        ProcessPriority::High,
        ProcessPriority::Normal,
        ProcessPriority::Low,
    ];

    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Exigency => "exigency",
        }
    }
}

impl fmt::Display for ProcessPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Just created, never scheduled
    #[default]
    New,
    /// Ready to run
    Ready,
    /// Currently holding the CPU
    Running,
    /// Waiting for a resource
    Blocked,
    /// Waiting for an event
    Waiting,
    /// Finished and reaped
    Terminated,
    /// Ran to completion, parked until reaped
    SuspendedReady,
    /// Preempted at the end of a time slice
    SuspendedBlocked,
}

impl ProcessState {
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Blocked => "blocked",
            Self::Waiting => "waiting",
            Self::Terminated => "terminated",
            Self::SuspendedReady => "suspended_ready",
            Self::SuspendedBlocked => "suspended_blocked",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schedulable unit of simulated work
#[derive(Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessRecord {
    pub id: Pid,
    pub name: String,
    pub priority: ProcessPriority,
    pub state: ProcessState,
    pub total_service_time: ServiceTime,
    pub consumed_service_time: ServiceTime,
    #[serde(skip)]
    routine: WorkRoutine,
}

impl ProcessRecord {
    /// New process with an identity work routine
    pub fn new(
        id: Pid,
        name: impl Into<String>,
        total_service_time: ServiceTime,
        priority: ProcessPriority,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            priority,
            state: ProcessState::New,
            total_service_time,
            consumed_service_time: 0.0,
            routine: Arc::new(|record| record),
        }
    }

    pub fn with_routine<F>(mut self, routine: F) -> Self
    where
        F: Fn(ProcessRecord) -> ProcessRecord + Send + Sync + 'static,
    {
        self.routine = Arc::new(routine);
        self
    }

    pub fn set_routine(&mut self, routine: WorkRoutine) {
        self.routine = routine;
    }

    pub fn routine(&self) -> &WorkRoutine {
        &self.routine
    }

    /// Invoke the work routine, returning whatever record it hands back
    pub fn invoke(self) -> ProcessRecord {
        let routine = Arc::clone(&self.routine);
        routine(self)
    }

    /// Service time still owed to this process
    pub fn remaining_service_time(&self) -> ServiceTime {
        (self.total_service_time - self.consumed_service_time).max(0.0)
    }

    pub fn is_complete(&self) -> bool {
        self.consumed_service_time >= self.total_service_time
    }
}

impl fmt::Debug for ProcessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("state", &self.state)
            .field("total_service_time", &self.total_service_time)
            .field("consumed_service_time", &self.consumed_service_time)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ProcessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "process {} '{}' [{}, {}] {:.1}/{:.1}",
            self.id,
            self.name,
            self.state,
            self.priority,
            self.consumed_service_time,
            self.total_service_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = ProcessRecord::new(1, "init", 10.0, ProcessPriority::High);
        assert_eq!(record.state, ProcessState::New);
        assert_eq!(record.consumed_service_time, 0.0);
        assert_eq!(record.remaining_service_time(), 10.0);
        assert!(!record.is_complete());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(ProcessPriority::Exigency > ProcessPriority::High);
        assert!(ProcessPriority::High > ProcessPriority::Normal);
        assert!(ProcessPriority::Normal > ProcessPriority::Low);
        assert_eq!(ProcessPriority::default(), ProcessPriority::Normal);
    }

    #[test]
    fn test_invoke_runs_routine() {
        let record = ProcessRecord::new(2, "worker", 4.0, ProcessPriority::Low).with_routine(|mut r| {
            r.name.push_str("-ran");
            r
        });
        let record = record.invoke();
        assert_eq!(record.name, "worker-ran");

        // Routine survives the round trip
        let record = record.invoke();
        assert_eq!(record.name, "worker-ran-ran");
    }

    #[test]
    fn test_display_and_serialize() {
        let record = ProcessRecord::new(3, "p3", 7.5, ProcessPriority::Exigency);
        assert_eq!(record.to_string(), "process 3 'p3' [new, exigency] 0.0/7.5");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["state"], "new");
        assert_eq!(json["priority"], "exigency");
        assert!(json.get("routine").is_none());
    }
}
