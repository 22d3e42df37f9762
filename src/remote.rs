//! Remote validation seam.
//!
//! Graph persistence defers the authoritative check to a backend service.
//! The trait keeps the engine transport-agnostic; [`classify`] folds the
//! call's outcome into a three-state verdict where a transport failure is
//! [`ValidationStatus::Unknown`], never a silent pass.

use serde::{Deserialize, Serialize};

use crate::error::RemoteValidationError;
use crate::graph::{Edge, Node};

/// Verdict returned by a remote validation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RemoteValidationReport {
    pub is_valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Three-state validation verdict as the engine records it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ValidationStatus {
    Valid,
    Invalid(Vec<String>),
    /// The backend could not be asked or answered garbage. Treated as
    /// not-validated, never as valid.
    #[default]
    Unknown,
}

impl ValidationStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationStatus::Valid)
    }
}

/// A backend able to validate a whole graph.
pub trait RemoteValidator {
    fn validate(
        &self,
        nodes: &[Node],
        edges: &[Edge],
    ) -> Result<RemoteValidationReport, RemoteValidationError>;
}

/// Folds a remote call result into a [`ValidationStatus`].
pub fn classify(
    outcome: Result<RemoteValidationReport, RemoteValidationError>,
) -> ValidationStatus {
    match outcome {
        Ok(report) if report.is_valid => ValidationStatus::Valid,
        Ok(report) => ValidationStatus::Invalid(report.errors),
        Err(_) => ValidationStatus::Unknown,
    }
}
