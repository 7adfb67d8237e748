/*!
 * Allocation Module
 * Banker's algorithm admission control over system resources
 */

pub mod banker;
pub mod ledger;
pub mod shared;

// Re-export for convenience
pub use banker::{AdmissionController, RunReport, SafetyCheck};
pub use ledger::{LedgerEntry, ProcessHandle};
pub use shared::SharedController;
