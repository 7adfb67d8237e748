/*!
 * Simulated Kernel Library
 * Banker's algorithm admission control and ready queue scheduling
 */

pub mod allocation;
pub mod core;
pub mod monitoring;
pub mod process;
pub mod resources;

// Re-exports
pub use allocation::{AdmissionController, LedgerEntry, ProcessHandle, RunReport, SafetyCheck, SharedController};
pub use crate::core::{
    AdmissionError, AdmissionRejected, ConfigError, EntryId, KernelError, KernelResult, Pid, Quantity,
    ServiceTime, SimulationConfig,
};
pub use monitoring::{generate_trace_id, init_tracing};
pub use process::{
    ProcessPriority, ProcessRecord, ProcessState, ReadyQueue, ScheduleReport, Scheduler, SchedulerStats,
    SchedulingPolicy,
};
pub use resources::{Claim, ResourceKind, ResourceVector, SystemCapacity};
