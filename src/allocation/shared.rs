/*!
 * Shared Admission Controller
 * One controller behind one lock for use across threads
 *
 * The safety search, claim and release steps all read and write the same
 * `available` vector, so a controller and its whole entry set are guarded
 * as a single unit. Every operation takes the lock for its full duration.
 */

use super::banker::{AdmissionController, RunReport, SafetyCheck};
use super::ledger::ProcessHandle;
use crate::core::errors::{AdmissionError, AdmissionRejected};
use crate::core::types::EntryId;
use crate::resources::{Claim, ResourceVector};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Cheaply clonable handle to a lock-guarded [`AdmissionController`]
#[derive(Debug, Clone)]
pub struct SharedController {
    inner: Arc<Mutex<AdmissionController>>,
}

impl SharedController {
    pub fn new(controller: AdmissionController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// Lock the controller for a sequence of operations
    pub fn lock(&self) -> MutexGuard<'_, AdmissionController> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access to the controller
    pub fn with<R>(&self, f: impl FnOnce(&mut AdmissionController) -> R) -> R {
        let mut controller = self.inner.lock();
        f(&mut controller)
    }

    pub fn try_admit(&self, process: ProcessHandle, claims: &[Claim]) -> Result<EntryId, AdmissionRejected> {
        let (max, assigned) = Claim::split(claims);
        self.inner.lock().try_admit(process, max, assigned)
    }

    pub fn request(&self, id: EntryId, request: &ResourceVector) -> Result<(), AdmissionError> {
        self.inner.lock().request(id, request)
    }

    pub fn compute_safe_order(&self) -> SafetyCheck {
        self.inner.lock().compute_safe_order()
    }

    pub fn check_conservation(&self) -> bool {
        self.inner.lock().check_conservation()
    }

    pub fn run(&self) -> RunReport {
        self.inner.lock().run()
    }

    /// Take the controller back once no other handle remains
    pub fn into_inner(self) -> Result<AdmissionController, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<AdmissionController> for SharedController {
    fn from(controller: AdmissionController) -> Self {
        Self::new(controller)
    }
}
