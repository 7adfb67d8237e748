/*!
 * Safety Search
 * Banker's algorithm over a private copy of `available`
 */

use super::AdmissionController;
use crate::core::types::EntryId;
use serde::Serialize;
use tracing::debug;

/// Verdict of a safety search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "order", rename_all = "snake_case")]
pub enum SafetyCheck {
    /// Every entry can finish in this order
    Safe(Vec<EntryId>),
    /// Some entries can never obtain their remaining need
    Unsafe,
}

impl SafetyCheck {
    #[inline]
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe(_))
    }

    /// The safe sequence, if there is one
    pub fn order(&self) -> Option<&[EntryId]> {
        match self {
            Self::Safe(order) => Some(order),
            Self::Unsafe => None,
        }
    }
}

impl AdmissionController {
    /// Find a completion order in which every entry's need can be met
    ///
    /// Repeatedly scans unfinished entries in admission order, finishing
    /// each whose need fits the working vector and returning its assigned
    /// resources to it. Entries freed earlier in a scan help later ones in
    /// the same scan. Only a copy of `available` is touched, so the search
    /// can be repeated at any time with the same result.
    pub fn compute_safe_order(&self) -> SafetyCheck {
        let mut work = self.available.deep_copy();
        let mut finished = vec![false; self.entries.len()];
        let mut order = Vec::with_capacity(self.entries.len());

        while order.len() < self.entries.len() {
            let mut progressed = false;

            for (idx, entry) in self.entries.iter().enumerate() {
                if finished[idx] || !work.covers(&entry.need) {
                    continue;
                }
                for (kind, amount) in entry.assigned.iter() {
                    work.adjust(kind, amount);
                }
                finished[idx] = true;
                order.push(entry.id);
                progressed = true;
            }

            if !progressed {
                debug!(
                    finished = order.len(),
                    outstanding = self.entries.len() - order.len(),
                    "Safety search found no eligible entry"
                );
                return SafetyCheck::Unsafe;
            }
        }

        SafetyCheck::Safe(order)
    }
}
