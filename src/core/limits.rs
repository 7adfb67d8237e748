/*!
 * System Limits and Constants
 *
 * Centralized location for simulation-wide limits and magic numbers.
 * Organized by domain: resource bookkeeping, admission control, scheduling.
 */

// =============================================================================
// RESOURCE BOOKKEEPING
// =============================================================================

/// Minimum backing capacity of a resource vector
/// Growth doubles from here once the vector fills up
pub const MIN_VECTOR_CAPACITY: usize = 10;

// =============================================================================
// ADMISSION CONTROL
// =============================================================================

/// Initial capacity of the admission controller's ledger
/// Grows by doubling, never below this value
pub const DEFAULT_LEDGER_CAPACITY: usize = 5;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Fixed round-robin time slice (simulated time units)
pub const DEFAULT_TIME_SLICE: f64 = 5.0;

/// Number of distinct process priority levels
pub const PRIORITY_LEVELS: usize = 4;
