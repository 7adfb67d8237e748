/*!
 * Scheduling Policies
 * Policy selection and the ordering passes that realize each policy
 */

use crate::process::queue::ReadyQueue;
use crate::process::types::{ProcessPriority, ProcessRecord};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Ready queue ordering policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SchedulingPolicy {
    /// Arrival order
    #[default]
    FirstComeFirstServe,
    /// Ascending total service time
    ShortestJobNext,
    /// Descending priority, arrival order within a level
    Priority,
    /// Fixed time slices in a ring
    RoundRobin,
}

impl SchedulingPolicy {
    pub const ALL: [SchedulingPolicy; 4] = [
        SchedulingPolicy::FirstComeFirstServe,
        SchedulingPolicy::ShortestJobNext,
        SchedulingPolicy::Priority,
        SchedulingPolicy::RoundRobin,
    ];

    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstComeFirstServe => "fcfs",
            Self::ShortestJobNext => "sjn",
            Self::Priority => "priority",
            Self::RoundRobin => "round_robin",
        }
    }

    /// Whether the policy interleaves execution instead of running each
    /// record to completion
    pub const fn is_preemptive(&self) -> bool {
        matches!(self, Self::RoundRobin)
    }
}

impl FromStr for SchedulingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fcfs" | "first_come_first_serve" | "fifo" => Ok(Self::FirstComeFirstServe),
            "sjn" | "sjf" | "shortest_job_next" => Ok(Self::ShortestJobNext),
            "priority" | "prio" => Ok(Self::Priority),
            "round_robin" | "roundrobin" | "rr" => Ok(Self::RoundRobin),
            _ => Err(format!(
                "Invalid policy '{}'. Valid: fcfs, sjn, priority, round_robin",
                s
            )),
        }
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SchedulingPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SchedulingPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Restore arrival order
///
/// Arrivals are pushed at the front, so one reversal is enough.
pub fn first_come_first_serve(queue: &mut ReadyQueue) {
    queue.reverse();
}

/// Stable sort by ascending total service time
pub fn shortest_job_next(queue: &mut ReadyQueue) {
    queue.stable_sort(|a: &ProcessRecord, b: &ProcessRecord| {
        a.total_service_time < b.total_service_time
    });
}

/// One stable partition pass per priority level, highest first
pub fn priority_scheduling(queue: &mut ReadyQueue) {
    queue.group_stable(&ProcessPriority::DESCENDING, |record| record.priority);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_policy_parse() {
        assert_eq!("FCFS".parse::<SchedulingPolicy>(), Ok(SchedulingPolicy::FirstComeFirstServe));
        assert_eq!("sjf".parse::<SchedulingPolicy>(), Ok(SchedulingPolicy::ShortestJobNext));
        assert_eq!("rr".parse::<SchedulingPolicy>(), Ok(SchedulingPolicy::RoundRobin));
        assert!("lottery".parse::<SchedulingPolicy>().is_err());

        for policy in SchedulingPolicy::ALL {
            assert_eq!(policy.as_str().parse::<SchedulingPolicy>(), Ok(policy));
        }
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&SchedulingPolicy::RoundRobin).unwrap();
        assert_eq!(json, "\"round_robin\"");
        let policy: SchedulingPolicy = serde_json::from_str("\"priority\"").unwrap();
        assert_eq!(policy, SchedulingPolicy::Priority);
        assert!(serde_json::from_str::<SchedulingPolicy>("\"fair\"").is_err());
    }

    #[test]
    fn test_fcfs_restores_arrival_order() {
        let mut queue = ReadyQueue::new();
        for id in 1..=4 {
            queue.push_front(ProcessRecord::new(id, format!("p{}", id), 1.0, ProcessPriority::Normal));
        }
        first_come_first_serve(&mut queue);
        assert_eq!(queue.ids(), vec![1, 2, 3, 4]);
    }
}
