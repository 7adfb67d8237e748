/*!
 * Simulated Kernel - Demo Entry Point
 *
 * Walks the admission controller through a safe and an unsafe claim table,
 * then runs the same batch of arrivals under every scheduling policy.
 *
 * Environment:
 * - KERNEL_CONFIG: optional path to a JSON `SimulationConfig`
 * - KERNEL_TIME_SLICE / KERNEL_LEDGER_CAPACITY: config overrides
 */

use miette::Result;
use tracing::{info, warn};

use sim_kernel::{
    init_tracing, AdmissionController, Claim, ProcessPriority, ProcessRecord, ReadyQueue, ResourceKind,
    Scheduler, SchedulingPolicy, SimulationConfig, SystemCapacity,
};

fn main() -> Result<()> {
    init_tracing();

    info!("Simulated kernel starting...");
    info!("================================================");

    let config = load_config()?;
    info!(time_slice = config.time_slice, "Configuration loaded");

    // Safe claim table: completes in a valid safe sequence
    let safe_capacity = capacity_of(&config, [20, 25, 30]);
    run_admission("safe scenario", &config, safe_capacity, &SAFE_TABLE)?;

    // Unsafe claim table: the run must halt before claiming anything
    let unsafe_capacity = capacity_of(&config, [10, 20, 30]);
    run_admission("unsafe scenario", &config, unsafe_capacity, &UNSAFE_TABLE)?;

    for policy in SchedulingPolicy::ALL {
        let mut scheduler = Scheduler::from_config(policy, &config)?;
        let mut queue = arrivals();
        println!("--- {} (before) ---\n{}", policy, queue);

        let report = scheduler.run(&mut queue);
        println!("--- {} (after) ---\n{}", policy, queue);
        info!(
            policy = %policy,
            order = ?report.completed,
            slices = report.stats.time_slices,
            preemptions = report.stats.preemptions,
            "Policy finished"
        );
    }

    info!("================================================");
    info!("Simulated kernel finished");
    Ok(())
}

/// (pid, [cpu, memory, swap] max, [cpu, memory, swap] assigned)
type ClaimRow = (u32, [i64; 3], [i64; 3]);

const SAFE_TABLE: [ClaimRow; 3] = [
    (1, [7, 10, 15], [5, 5, 10]),
    (2, [3, 7, 5], [2, 2, 2]),
    (3, [9, 5, 7], [4, 2, 4]),
];

const UNSAFE_TABLE: [ClaimRow; 3] = [
    (1, [7, 10, 15], [5, 5, 10]),
    (2, [13, 17, 25], [2, 2, 2]),
    (3, [9, 5, 7], [4, 2, 4]),
];

const KINDS: [ResourceKind; 3] = [ResourceKind::Cpu, ResourceKind::Memory, ResourceKind::Swap];

fn load_config() -> Result<SimulationConfig> {
    let config = match std::env::var("KERNEL_CONFIG") {
        Ok(path) => SimulationConfig::from_file(path)?,
        Err(_) => SimulationConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

/// Configured capacity, falling back to the scenario's own totals
fn capacity_of(config: &SimulationConfig, totals: [i64; 3]) -> SystemCapacity {
    if !config.capacity.is_empty() {
        return config.capacity.clone();
    }
    KINDS.iter().copied().zip(totals).collect()
}

fn run_admission(
    label: &str,
    config: &SimulationConfig,
    capacity: SystemCapacity,
    table: &[ClaimRow],
) -> Result<()> {
    let config = SimulationConfig {
        capacity,
        ..config.clone()
    };
    let mut controller = AdmissionController::from_config(&config)?;

    for &(pid, max, assigned) in table {
        let claims: Vec<Claim> = KINDS
            .iter()
            .zip(max.iter().zip(assigned.iter()))
            .map(|(&kind, (&max, &assigned))| Claim::new(kind, max, assigned))
            .collect();
        let record = ProcessRecord::new(pid, format!("P{}", pid), 10.0, ProcessPriority::Normal);

        if let Err(rejected) = controller.admit_new_process(record, &claims) {
            warn!(scenario = label, "{}", rejected);
        }
    }

    println!("--- {} ---\n{}", label, controller);
    let verdict = controller.compute_safe_order();
    println!("safety: {}", if verdict.is_safe() { "safe" } else { "unsafe" });

    let report = controller.run();
    info!(
        scenario = label,
        run_id = %report.run_id,
        completed = ?report.completed,
        halted = report.halted,
        "Admission run finished"
    );
    Ok(())
}

/// Sample arrivals, pushed newest first as the queue expects
fn arrivals() -> ReadyQueue {
    let jobs = [
        (1, "editor", 12.0, ProcessPriority::Normal),
        (2, "compiler", 3.0, ProcessPriority::High),
        (3, "backup", 7.0, ProcessPriority::Normal),
        (4, "watchdog", 9.0, ProcessPriority::Exigency),
        (5, "indexer", 4.0, ProcessPriority::Low),
    ];

    let mut queue = ReadyQueue::new();
    for (id, name, total, priority) in jobs {
        queue.push_front(ProcessRecord::new(id, name, total, priority));
    }
    queue
}
