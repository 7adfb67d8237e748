/*!
 * Process Scheduler
 * Orders a ready queue under a policy and executes it
 *
 * Every run is a sort pass followed by an execution pass. FCFS, SJN and
 * Priority reorder the queue and then run each record to completion;
 * round-robin runs its own interleaved executor over the queue as given.
 */

use crate::core::config::SimulationConfig;
use crate::core::errors::ConfigError;
use crate::core::limits::DEFAULT_TIME_SLICE;
use crate::core::types::{Pid, ServiceTime};
use crate::process::queue::ReadyQueue;
use serde::Serialize;
use tracing::info;

mod operations;
mod policy;
mod stats;

pub use operations::{execute_over, round_robin};
pub use policy::{first_come_first_serve, priority_scheduling, shortest_job_next, SchedulingPolicy};
pub use stats::SchedulerStats;

/// Outcome of one scheduler run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleReport {
    pub policy: SchedulingPolicy,
    /// Process ids in the order the queue holds them after the run
    pub completed: Vec<Pid>,
    /// Counters for this run alone
    pub stats: SchedulerStats,
}

/// Single-threaded ready queue scheduler
#[derive(Debug, Clone)]
pub struct Scheduler {
    policy: SchedulingPolicy,
    quantum: ServiceTime,
    stats: SchedulerStats,
}

impl Scheduler {
    /// Create a scheduler with the default time slice
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self {
            policy,
            quantum: DEFAULT_TIME_SLICE,
            stats: SchedulerStats::default(),
        }
    }

    /// Create a scheduler with a custom round-robin time slice
    pub fn with_quantum(policy: SchedulingPolicy, quantum: ServiceTime) -> Result<Self, ConfigError> {
        validate_quantum(quantum)?;
        info!(policy = %policy, quantum, "Scheduler initialized");
        Ok(Self {
            quantum,
            ..Self::new(policy)
        })
    }

    /// Create a scheduler taking its time slice from configuration
    pub fn from_config(policy: SchedulingPolicy, config: &SimulationConfig) -> Result<Self, ConfigError> {
        Self::with_quantum(policy, config.time_slice)
    }

    #[inline]
    pub fn policy(&self) -> SchedulingPolicy {
        self.policy
    }

    #[inline]
    pub fn quantum(&self) -> ServiceTime {
        self.quantum
    }

    pub fn set_policy(&mut self, policy: SchedulingPolicy) {
        if policy != self.policy {
            info!(from = %self.policy, to = %policy, "Changing scheduling policy");
            self.policy = policy;
        }
    }

    pub fn set_quantum(&mut self, quantum: ServiceTime) -> Result<(), ConfigError> {
        validate_quantum(quantum)?;
        self.quantum = quantum;
        info!(quantum, "Time slice updated");
        Ok(())
    }

    /// Order and execute the queue under the current policy
    pub fn run(&mut self, queue: &mut ReadyQueue) -> ScheduleReport {
        let quantum = self.quantum;
        match self.policy {
            SchedulingPolicy::FirstComeFirstServe => {
                self.run_with(queue, first_come_first_serve, execute_over)
            }
            SchedulingPolicy::ShortestJobNext => self.run_with(queue, shortest_job_next, execute_over),
            SchedulingPolicy::Priority => self.run_with(queue, priority_scheduling, execute_over),
            SchedulingPolicy::RoundRobin => {
                self.run_with(queue, |_| {}, |queue| round_robin(queue, quantum))
            }
        }
    }

    /// Run an arbitrary sort pass followed by an arbitrary execution pass
    ///
    /// The report carries the scheduler's current policy as its label.
    pub fn run_with<S, E>(&mut self, queue: &mut ReadyQueue, sort: S, execute: E) -> ScheduleReport
    where
        S: FnOnce(&mut ReadyQueue),
        E: FnOnce(&mut ReadyQueue) -> SchedulerStats,
    {
        info!(policy = %self.policy, processes = queue.len(), "Scheduling ready queue");

        sort(queue);
        let mut pass = execute(queue);
        pass.runs = 1;
        self.stats += pass;

        let completed = queue.ids();
        info!(
            policy = %self.policy,
            executed = pass.executed,
            preemptions = pass.preemptions,
            "Ready queue drained"
        );

        ScheduleReport {
            policy: self.policy,
            completed,
            stats: pass,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulingPolicy::default())
    }
}

fn validate_quantum(quantum: ServiceTime) -> Result<(), ConfigError> {
    if quantum.is_finite() && quantum > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "time slice must be a positive finite number, got {}",
            quantum
        )))
    }
}
