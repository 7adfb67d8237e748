/*!
 * Admission
 * Reserve a process's assigned claims with exact rollback on failure
 */

use super::AdmissionController;
use crate::allocation::ledger::{LedgerEntry, ProcessHandle};
use crate::core::errors::{AdmissionError, AdmissionRejected};
use crate::core::types::{EntryId, Quantity};
use crate::process::types::ProcessRecord;
use crate::resources::{Claim, ResourceKind, ResourceVector};
use tracing::{debug, info, warn};

impl AdmissionController {
    /// Admit a process with declared `max` and initially `assigned` claims
    ///
    /// `need` is derived as `max - assigned` per kind; each kind may appear
    /// at most once in `max` and in `assigned`. Assigned amounts are
    /// subtracted from `available` kind by kind; the first kind that does
    /// not fit undoes every subtraction made so far and the process comes
    /// back inside the rejection.
    pub fn try_admit(
        &mut self,
        process: ProcessHandle,
        max: ResourceVector,
        assigned: ResourceVector,
    ) -> Result<EntryId, AdmissionRejected> {
        let pid = process.record().id;

        let need = match derive_need(&max, &assigned) {
            Ok(need) => need,
            Err(reason) => return Err(reject(process, reason)),
        };
        if let Err(reason) = self.reserve(&assigned) {
            return Err(reject(process, reason));
        }

        let id = self.allocate_id();
        info!(
            pid,
            entry = %id,
            max = %max,
            assigned = %assigned,
            available = %self.available,
            "Process admitted"
        );
        self.push_entry(LedgerEntry {
            id,
            process,
            max,
            assigned,
            need,
        });
        Ok(id)
    }

    /// Admit a process the controller takes ownership of
    pub fn admit_new_process(
        &mut self,
        record: ProcessRecord,
        claims: &[Claim],
    ) -> Result<EntryId, AdmissionRejected> {
        let (max, assigned) = Claim::split(claims);
        self.try_admit(ProcessHandle::Owned(record), max, assigned)
    }

    /// Admit a caller-owned process, handed back once its entry completes
    pub fn admit_existing_process(
        &mut self,
        record: ProcessRecord,
        claims: &[Claim],
    ) -> Result<EntryId, AdmissionRejected> {
        let (max, assigned) = Claim::split(claims);
        self.try_admit(ProcessHandle::Borrowed(record), max, assigned)
    }

    /// Admit processes one at a time in order, one result per process
    pub fn admit_batch(
        &mut self,
        batch: Vec<(ProcessHandle, Vec<Claim>)>,
    ) -> Vec<Result<EntryId, AdmissionRejected>> {
        batch
            .into_iter()
            .map(|(process, claims)| {
                let (max, assigned) = Claim::split(&claims);
                self.try_admit(process, max, assigned)
            })
            .collect()
    }

    /// Grant part of an admitted entry's remaining need
    ///
    /// The request must name each kind once and fit within both the entry's
    /// need and `available`.
    /// It is applied tentatively and kept only if the safety search still
    /// finds a safe order; otherwise every vector is restored.
    pub fn request(&mut self, id: EntryId, request: &ResourceVector) -> Result<(), AdmissionError> {
        let idx = self.position(id).ok_or(AdmissionError::EntryNotFound(id))?;

        if let Some(kind) = request.duplicate_kind() {
            return Err(AdmissionError::DuplicateKind { kind });
        }
        {
            let entry = &self.entries[idx];
            for (kind, amount) in request.iter() {
                if amount < 0 {
                    return Err(AdmissionError::NegativeClaim { kind, amount });
                }
                let need = entry.need.amount(kind);
                if amount > need {
                    return Err(AdmissionError::RequestExceedsNeed {
                        kind,
                        requested: amount,
                        need,
                    });
                }
                let available = self.available.amount(kind);
                if amount > available {
                    return Err(AdmissionError::CapacityExceeded {
                        kind,
                        requested: amount,
                        available,
                    });
                }
            }
        }

        let saved_available = self.available.deep_copy();
        let saved_assigned = self.entries[idx].assigned.deep_copy();
        let saved_need = self.entries[idx].need.deep_copy();

        for (kind, amount) in request.iter() {
            self.available.adjust(kind, -amount);
            let entry = &mut self.entries[idx];
            entry.assigned.adjust(kind, amount);
            entry.need.adjust(kind, -amount);
        }

        let pid = self.entries[idx].pid();
        if self.compute_safe_order().is_safe() {
            info!(pid, entry = %id, request = %request, "Request granted");
            return Ok(());
        }

        self.available = saved_available;
        let entry = &mut self.entries[idx];
        entry.assigned = saved_assigned;
        entry.need = saved_need;
        warn!(pid, entry = %id, request = %request, "Request would be unsafe, rolled back");
        Err(AdmissionError::UnsafeRequest(pid))
    }

    /// Subtract `assigned` from `available`, undoing partial progress on failure
    fn reserve(&mut self, assigned: &ResourceVector) -> Result<(), AdmissionError> {
        let mut taken: Vec<(ResourceKind, Quantity)> = Vec::with_capacity(assigned.len());

        for (kind, requested) in assigned.iter() {
            let available = self.available.amount(kind);
            if requested > available {
                for (kind, amount) in taken.into_iter().rev() {
                    self.available.adjust(kind, amount);
                }
                return Err(AdmissionError::CapacityExceeded {
                    kind,
                    requested,
                    available,
                });
            }
            self.available.adjust(kind, -requested);
            taken.push((kind, requested));
            debug!(kind = %kind, requested, remaining = available - requested, "Reserved");
        }
        Ok(())
    }
}

/// `max - assigned` per kind in `max`, rejecting repeated kinds, negative
/// amounts and assignments above the declared maximum
fn derive_need(max: &ResourceVector, assigned: &ResourceVector) -> Result<ResourceVector, AdmissionError> {
    if let Some(kind) = max.duplicate_kind().or_else(|| assigned.duplicate_kind()) {
        return Err(AdmissionError::DuplicateKind { kind });
    }
    if let Some((kind, amount)) = max.iter().chain(assigned.iter()).find(|(_, amount)| *amount < 0) {
        return Err(AdmissionError::NegativeClaim { kind, amount });
    }

    for (kind, assigned) in assigned.iter() {
        let max = max.amount(kind);
        if assigned > max {
            return Err(AdmissionError::ClaimExceedsMaximum { kind, max, assigned });
        }
    }

    let mut need = ResourceVector::with_capacity(max.capacity());
    for (kind, max) in max.iter() {
        need.append(kind, max - assigned.amount(kind));
    }
    Ok(need)
}

fn reject(process: ProcessHandle, reason: AdmissionError) -> AdmissionRejected {
    warn!(pid = process.record().id, reason = %reason, "Admission rejected");
    AdmissionRejected {
        reason,
        process: process.into_record(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{capacity, claims, record};
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_admission_derives_need() {
        let mut controller = AdmissionController::new(capacity(20, 25, 30));
        let id = controller
            .admit_new_process(record(1), &claims([7, 10, 15], [5, 5, 10]))
            .unwrap();

        let entry = controller.entry(id).unwrap();
        assert_eq!(
            entry.need(),
            &ResourceVector::from_pairs(&[
                (ResourceKind::Cpu, 2),
                (ResourceKind::Memory, 5),
                (ResourceKind::Swap, 5),
            ])
        );
        assert!(entry.need_is_consistent());
        assert_eq!(controller.available().amount(ResourceKind::Cpu), 15);
    }

    #[test]
    fn test_capacity_violation_rolls_back() {
        let mut controller = AdmissionController::new(capacity(10, 20, 30));
        let before = controller.available().clone();

        // Cpu and memory fit, swap does not
        let rejected = controller
            .admit_new_process(record(1), &claims([5, 5, 40], [5, 5, 31]))
            .unwrap_err();

        assert_eq!(
            rejected.reason,
            AdmissionError::CapacityExceeded {
                kind: ResourceKind::Swap,
                requested: 31,
                available: 30,
            }
        );
        assert_eq!(rejected.process.id, 1);
        assert_eq!(controller.available(), &before);
        assert!(controller.is_empty());
    }

    #[test]
    fn test_assigned_above_max_rejected() {
        let mut controller = AdmissionController::new(capacity(10, 10, 10));
        let before = controller.available().clone();

        let rejected = controller
            .admit_new_process(record(2), &claims([3, 3, 3], [4, 1, 1]))
            .unwrap_err();

        assert!(matches!(
            rejected.reason,
            AdmissionError::ClaimExceedsMaximum { kind: ResourceKind::Cpu, max: 3, assigned: 4 }
        ));
        assert_eq!(controller.available(), &before);
    }

    #[test]
    fn test_negative_claim_rejected() {
        let mut controller = AdmissionController::new(capacity(10, 10, 10));
        let rejected = controller
            .admit_new_process(record(3), &claims([3, 3, 3], [1, -1, 1]))
            .unwrap_err();
        assert!(matches!(rejected.reason, AdmissionError::NegativeClaim { amount: -1, .. }));
    }

    #[test]
    fn test_repeated_assigned_kind_rejected() {
        let mut controller = AdmissionController::new(capacity(10, 10, 10));
        let before = controller.available().clone();

        let max = ResourceVector::from_pairs(&[(ResourceKind::Cpu, 5)]);
        let assigned = ResourceVector::from_pairs(&[(ResourceKind::Cpu, 3), (ResourceKind::Cpu, 3)]);
        let rejected = controller
            .try_admit(ProcessHandle::Owned(record(1)), max, assigned)
            .unwrap_err();

        assert_eq!(rejected.reason, AdmissionError::DuplicateKind { kind: ResourceKind::Cpu });
        assert_eq!(controller.available(), &before);
        assert!(controller.is_empty());
        assert!(controller.check_conservation());
    }

    #[test]
    fn test_repeated_max_kind_rejected() {
        let mut controller = AdmissionController::new(capacity(10, 10, 10));
        let max = ResourceVector::from_pairs(&[(ResourceKind::Swap, 2), (ResourceKind::Swap, 8)]);
        let assigned = ResourceVector::from_pairs(&[(ResourceKind::Swap, 1)]);

        let rejected = controller
            .try_admit(ProcessHandle::Borrowed(record(2)), max, assigned)
            .unwrap_err();
        assert_eq!(rejected.reason, AdmissionError::DuplicateKind { kind: ResourceKind::Swap });
        assert_eq!(rejected.process.id, 2);
    }

    #[test]
    fn test_batch_admission_results_in_order() {
        let mut controller = AdmissionController::new(capacity(10, 10, 10));
        let results = controller.admit_batch(vec![
            (ProcessHandle::Owned(record(1)), claims([4, 4, 4], [4, 4, 4])),
            (ProcessHandle::Owned(record(2)), claims([8, 8, 8], [8, 1, 1])),
            (ProcessHandle::Borrowed(record(3)), claims([6, 6, 6], [6, 6, 6])),
        ]);

        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().process.id, 2);
        assert!(results[2].is_ok());
        assert_eq!(controller.len(), 2);
        assert_eq!(controller.available().amount(ResourceKind::Cpu), 0);
        assert!(controller.check_conservation());
    }

    #[test]
    fn test_request_granted_when_safe() {
        let mut controller = AdmissionController::new(capacity(10, 10, 10));
        let id = controller
            .admit_new_process(record(1), &claims([6, 6, 6], [2, 2, 2]))
            .unwrap();

        let request = ResourceVector::from_pairs(&[(ResourceKind::Cpu, 3)]);
        controller.request(id, &request).unwrap();

        let entry = controller.entry(id).unwrap();
        assert_eq!(entry.assigned().amount(ResourceKind::Cpu), 5);
        assert_eq!(entry.need().amount(ResourceKind::Cpu), 1);
        assert!(entry.need_is_consistent());
        assert!(controller.check_conservation());
    }

    #[test]
    fn test_request_bounds() {
        let mut controller = AdmissionController::new(capacity(4, 10, 10));
        let id = controller
            .admit_new_process(record(1), &claims([6, 6, 6], [2, 2, 2]))
            .unwrap();

        let too_much = ResourceVector::from_pairs(&[(ResourceKind::Memory, 5)]);
        assert!(matches!(
            controller.request(id, &too_much),
            Err(AdmissionError::RequestExceedsNeed { need: 4, .. })
        ));

        let unavailable = ResourceVector::from_pairs(&[(ResourceKind::Cpu, 3)]);
        assert!(matches!(
            controller.request(id, &unavailable),
            Err(AdmissionError::CapacityExceeded { available: 2, .. })
        ));

        assert_eq!(
            controller.request(EntryId(99), &unavailable),
            Err(AdmissionError::EntryNotFound(EntryId(99)))
        );
    }

    #[test]
    fn test_repeated_request_kind_rejected() {
        let mut controller = AdmissionController::new(capacity(10, 10, 10));
        let id = controller
            .admit_new_process(record(1), &claims([5, 5, 5], [1, 1, 1]))
            .unwrap();
        let before = controller.clone();

        // Each row fits need 4 on its own; together they would exceed it
        let request = ResourceVector::from_pairs(&[(ResourceKind::Cpu, 3), (ResourceKind::Cpu, 3)]);
        assert_eq!(
            controller.request(id, &request),
            Err(AdmissionError::DuplicateKind { kind: ResourceKind::Cpu })
        );

        let entry = controller.entry(id).unwrap();
        assert_eq!(entry.assigned(), before.entry(id).unwrap().assigned());
        assert_eq!(entry.need(), before.entry(id).unwrap().need());
        assert!(entry.need_is_consistent());
        assert_eq!(controller.available(), before.available());
        assert!(controller.check_conservation());
    }

    #[test]
    fn test_unsafe_request_rolled_back() {
        let mut controller = AdmissionController::new(capacity(10, 10, 10));
        controller
            .admit_new_process(record(1), &claims([5, 1, 1], [2, 0, 0]))
            .unwrap();
        let second = controller
            .admit_new_process(record(2), &claims([9, 1, 1], [3, 0, 0]))
            .unwrap();
        assert!(controller.compute_safe_order().is_safe());

        // Leaves 2 cpu against needs of 3 and 3
        let before = controller.clone();
        let request = ResourceVector::from_pairs(&[(ResourceKind::Cpu, 3)]);
        assert_eq!(
            controller.request(second, &request),
            Err(AdmissionError::UnsafeRequest(2))
        );

        assert_eq!(controller.available(), before.available());
        let entry = controller.entry(second).unwrap();
        assert_eq!(entry.assigned(), before.entry(second).unwrap().assigned());
        assert_eq!(entry.need(), before.entry(second).unwrap().need());
        assert!(controller.compute_safe_order().is_safe());
    }
}
