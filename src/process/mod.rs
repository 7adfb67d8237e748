/*!
 * Process Module
 * Simulated processes, the ready queue and its scheduler
 */

pub mod queue;
pub mod scheduler;
pub mod types;

// Re-export for convenience
pub use queue::ReadyQueue;
pub use scheduler::{ScheduleReport, Scheduler, SchedulerStats, SchedulingPolicy};
pub use types::{ProcessPriority, ProcessRecord, ProcessState, WorkRoutine};
