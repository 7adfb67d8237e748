/*!
 * Core Types
 * Common types used across the kernel simulation
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Process ID type
pub type Pid = u32;

/// Amount of a single resource kind
///
/// Signed so that trial arithmetic (claim, release, rollback) never has to
/// special-case underflow; admission rejects any claim that would make a
/// `need` quantity negative.
pub type Quantity = i64;

/// Simulated CPU service time
pub type ServiceTime = f64;

/// Stable handle for an admitted ledger entry
///
/// Indices into the controller's entry collection shift as entries complete,
/// so every admission is stamped with a monotonically increasing id instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl EntryId {
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry#{}", self.0)
    }
}

/// Common result type for kernel operations
pub type KernelResult<T> = Result<T, super::errors::KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_display() {
        assert_eq!(EntryId(7).to_string(), "entry#7");
    }

    #[test]
    fn test_entry_id_serializes_transparently() {
        let json = serde_json::to_string(&EntryId(42)).unwrap();
        assert_eq!(json, "42");
    }
}
