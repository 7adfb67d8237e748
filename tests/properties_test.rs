/*!
 * Property Tests
 * Invariants of admission control and scheduling over generated inputs
 */

use proptest::prelude::*;
use sim_kernel::{
    AdmissionController, Claim, ProcessPriority, ProcessRecord, ReadyQueue, ResourceKind, Scheduler,
    SchedulingPolicy, SystemCapacity,
};

const KINDS: [ResourceKind; 3] = [ResourceKind::Cpu, ResourceKind::Memory, ResourceKind::Swap];

fn claim_row() -> impl Strategy<Value = Vec<Claim>> {
    prop::collection::vec((0i64..12, 0i64..12), 3).prop_map(|pairs| {
        KINDS
            .iter()
            .zip(pairs)
            .map(|(&kind, (a, b))| Claim::new(kind, a.max(b), a.min(b)))
            .collect()
    })
}

fn priority() -> impl Strategy<Value = ProcessPriority> {
    prop_oneof![
        Just(ProcessPriority::Low),
        Just(ProcessPriority::Normal),
        Just(ProcessPriority::High),
        Just(ProcessPriority::Exigency),
    ]
}

fn controller_with(capacity: [i64; 3], rows: &[Vec<Claim>]) -> AdmissionController {
    let capacity: SystemCapacity = KINDS.iter().copied().zip(capacity).collect();
    let mut controller = AdmissionController::new(capacity);
    for (id, claims) in rows.iter().enumerate() {
        let record = ProcessRecord::new(id as u32, format!("p{}", id), 1.0, ProcessPriority::Normal);
        let _ = controller.admit_new_process(record, claims);
    }
    controller
}

fn queue_of(jobs: &[(f64, ProcessPriority)]) -> ReadyQueue {
    let mut queue = ReadyQueue::new();
    for (id, &(total, priority)) in jobs.iter().enumerate() {
        queue.push_back(ProcessRecord::new(id as u32, format!("p{}", id), total, priority));
    }
    queue
}

proptest! {
    #[test]
    fn need_invariant_and_conservation_hold_after_admission(
        capacity in prop::array::uniform3(0i64..40),
        rows in prop::collection::vec(claim_row(), 0..8),
    ) {
        let controller = controller_with(capacity, &rows);
        prop_assert!(controller.check_conservation());
        for entry in controller.entries() {
            prop_assert!(entry.need_is_consistent());
        }
    }

    #[test]
    fn rejected_admission_leaves_available_untouched(
        capacity in prop::array::uniform3(0i64..20),
        rows in prop::collection::vec(claim_row(), 1..8),
    ) {
        let mut controller = controller_with(capacity, &[]);
        for (id, claims) in rows.iter().enumerate() {
            let before = controller.available().clone();
            let record = ProcessRecord::new(id as u32, "p", 1.0, ProcessPriority::Normal);
            if controller.admit_new_process(record, claims).is_err() {
                prop_assert_eq!(controller.available(), &before);
            }
        }
    }

    #[test]
    fn safety_search_is_idempotent(
        capacity in prop::array::uniform3(0i64..40),
        rows in prop::collection::vec(claim_row(), 0..8),
    ) {
        let controller = controller_with(capacity, &rows);
        prop_assert_eq!(controller.compute_safe_order(), controller.compute_safe_order());
    }

    #[test]
    fn safe_runs_restore_full_capacity(
        capacity in prop::array::uniform3(0i64..40),
        rows in prop::collection::vec(claim_row(), 0..8),
    ) {
        let mut controller = controller_with(capacity, &rows);
        let admitted = controller.len();
        let safe = controller.compute_safe_order().is_safe();

        let report = controller.run();

        prop_assert_eq!(report.halted, !safe);
        if safe {
            prop_assert_eq!(report.completed.len(), admitted);
            prop_assert!(controller.is_empty());
            for (i, kind) in KINDS.iter().enumerate() {
                prop_assert_eq!(controller.available().amount(*kind), capacity[i]);
            }
        }
    }

    #[test]
    fn round_robin_conserves_processes(
        jobs in prop::collection::vec((0.0f64..40.0, priority()), 0..16),
        quantum in 0.5f64..10.0,
    ) {
        let mut queue = queue_of(&jobs);
        let mut scheduler = Scheduler::with_quantum(SchedulingPolicy::RoundRobin, quantum).unwrap();

        let report = scheduler.run(&mut queue);

        let mut ids = report.completed.clone();
        ids.sort_unstable();
        prop_assert_eq!(ids, (0..jobs.len() as u32).collect::<Vec<_>>());
        for record in &queue {
            prop_assert_eq!(record.consumed_service_time, record.total_service_time);
        }
    }

    #[test]
    fn shortest_job_next_matches_stable_sort(
        jobs in prop::collection::vec((0u8..6, priority()), 0..24),
    ) {
        let jobs: Vec<(f64, ProcessPriority)> =
            jobs.into_iter().map(|(t, p)| (f64::from(t), p)).collect();
        let mut queue = queue_of(&jobs);
        Scheduler::new(SchedulingPolicy::ShortestJobNext).run(&mut queue);

        let mut expected: Vec<u32> = (0..jobs.len() as u32).collect();
        expected.sort_by(|a, b| jobs[*a as usize].0.total_cmp(&jobs[*b as usize].0));
        prop_assert_eq!(queue.ids(), expected);
    }

    #[test]
    fn priority_matches_stable_sort_descending(
        jobs in prop::collection::vec((1.0f64..5.0, priority()), 0..24),
    ) {
        let mut queue = queue_of(&jobs);
        Scheduler::new(SchedulingPolicy::Priority).run(&mut queue);

        let mut expected: Vec<u32> = (0..jobs.len() as u32).collect();
        expected.sort_by(|a, b| jobs[*b as usize].1.cmp(&jobs[*a as usize].1));
        prop_assert_eq!(queue.ids(), expected);
    }
}
