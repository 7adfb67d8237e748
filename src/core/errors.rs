/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{EntryId, Pid, Quantity};
use crate::process::ProcessRecord;
use crate::resources::ResourceKind;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Admission-control errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum AdmissionError {
    #[error("Insufficient {kind}: requested {requested}, available {available}")]
    #[diagnostic(
        code(admission::capacity_exceeded),
        help("Lower the assigned claim or wait for running processes to release resources.")
    )]
    CapacityExceeded {
        kind: ResourceKind,
        requested: Quantity,
        available: Quantity,
    },

    #[error("Assigned {kind} ({assigned}) exceeds declared maximum ({max})")]
    #[diagnostic(
        code(admission::claim_exceeds_maximum),
        help("A process can never hold more than its declared maximum claim.")
    )]
    ClaimExceedsMaximum {
        kind: ResourceKind,
        max: Quantity,
        assigned: Quantity,
    },

    #[error("Negative {kind} amount ({amount}) in claim")]
    #[diagnostic(
        code(admission::negative_claim),
        help("Maximum, assigned and requested amounts must all be zero or positive.")
    )]
    NegativeClaim { kind: ResourceKind, amount: Quantity },

    #[error("{kind} appears more than once in a claim")]
    #[diagnostic(
        code(admission::duplicate_kind),
        help("Declare each resource kind once per maximum, assigned or requested vector.")
    )]
    DuplicateKind { kind: ResourceKind },

    #[error("Request for {kind} ({requested}) exceeds remaining need ({need})")]
    #[diagnostic(
        code(admission::request_exceeds_need),
        help("Requests are bounded by max - assigned for every resource kind.")
    )]
    RequestExceedsNeed {
        kind: ResourceKind,
        requested: Quantity,
        need: Quantity,
    },

    #[error("Granting the request of process {0} would leave the system unsafe")]
    #[diagnostic(
        code(admission::unsafe_request),
        help("The request was rolled back. Retry after other processes release resources.")
    )]
    UnsafeRequest(Pid),

    #[error("Ledger entry {0} not found")]
    #[diagnostic(
        code(admission::entry_not_found),
        help("The entry may have completed and been removed from the controller.")
    )]
    EntryNotFound(EntryId),
}

/// Configuration errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    #[diagnostic(
        code(config::parse_failed),
        help("Configuration must be a JSON object. See SimulationConfig for field names.")
    )]
    Parse(String),

    #[error("Failed to read configuration file: {0}")]
    #[diagnostic(code(config::io_failed), help("Check the path and file permissions."))]
    Io(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(config::invalid))]
    Invalid(String),
}

/// An admission attempt that was turned down
///
/// Carries the process record back so the caller can retry with different
/// claims or drop it.
#[derive(Error, Debug)]
#[error("Admission of process {} rejected: {reason}", .process.id)]
pub struct AdmissionRejected {
    pub reason: AdmissionError,
    pub process: ProcessRecord,
}

impl AdmissionRejected {
    pub fn into_parts(self) -> (AdmissionError, ProcessRecord) {
        (self.reason, self.process)
    }
}

impl Diagnostic for AdmissionRejected {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.reason.code()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.reason.help()
    }
}

/// Unified kernel error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum KernelError {
    #[error("Admission error: {0}")]
    #[diagnostic(transparent)]
    Admission(#[from] AdmissionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Rejected(#[from] AdmissionRejected),

    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    #[diagnostic(
        code(kernel::internal_error),
        help("An unexpected internal error occurred. Please report this issue.")
    )]
    Internal(String),
}

impl From<String> for KernelError {
    fn from(msg: String) -> Self {
        KernelError::Internal(msg)
    }
}

impl From<&str> for KernelError {
    fn from(msg: &str) -> Self {
        KernelError::Internal(msg.to_string())
    }
}
