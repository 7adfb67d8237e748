/*!
 * Resources Module
 * Resource kinds, quantity vectors and system capacity
 */

pub mod capacity;
pub mod types;

// Re-export for convenience
pub use capacity::SystemCapacity;
pub use types::{Claim, ResourceKind, ResourceVector};
