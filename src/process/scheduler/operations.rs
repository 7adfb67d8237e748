/*!
 * Execution Passes
 * Run-to-completion and round-robin executors over a ready queue
 */

use super::stats::SchedulerStats;
use crate::core::types::ServiceTime;
use crate::process::queue::ReadyQueue;
use crate::process::types::{ProcessRecord, ProcessState};
use tracing::debug;

/// Run every record front to back to completion
///
/// Each record goes Running, has its routine invoked once, and is parked
/// as SuspendedReady with its full service time consumed.
pub fn execute_over(queue: &mut ReadyQueue) -> SchedulerStats {
    let mut pass = SchedulerStats::default();
    queue.map_in_place(|mut record| {
        record.state = ProcessState::Running;
        let mut record = record.invoke();
        record.consumed_service_time = record.total_service_time;
        record.state = ProcessState::SuspendedReady;

        debug!(pid = record.id, service = record.total_service_time, "Process ran to completion");
        pass.record_completion();
        record
    });
    pass
}

/// Interleave records in fixed `quantum` slices until every one finishes
///
/// A record finishes once the next slice would cover its remaining service
/// time, or when it is the last one left. The queue ends up in completion
/// order.
pub fn round_robin(queue: &mut ReadyQueue, quantum: ServiceTime) -> SchedulerStats {
    let mut pass = SchedulerStats::default();
    queue.drain_ring(|record, alone| {
        let (record, finished) = run_slice(record, quantum, alone);
        if finished {
            pass.record_completion();
        } else {
            pass.record_preemption();
        }
        (record, finished)
    });
    pass
}

/// One slice for `record`; the outcome is fixed by the consumed time the
/// record had before its routine ran, whatever the routine does to it
fn run_slice(mut record: ProcessRecord, quantum: ServiceTime, alone: bool) -> (ProcessRecord, bool) {
    let finished = record.consumed_service_time + quantum >= record.total_service_time || alone;
    let consumed = record.consumed_service_time;

    record.state = ProcessState::Running;
    let mut record = record.invoke();
    record.consumed_service_time = consumed;

    if finished {
        record.consumed_service_time = record.total_service_time;
        record.state = ProcessState::SuspendedReady;
        debug!(pid = record.id, service = record.total_service_time, "Process finished its last slice");
    } else {
        record.consumed_service_time += quantum;
        record.state = ProcessState::SuspendedBlocked;
        debug!(
            pid = record.id,
            consumed = record.consumed_service_time,
            remaining = record.remaining_service_time(),
            "Process preempted"
        );
    }
    (record, finished)
}
