//! FHIR-specific types and operations
//!
//! This module contains the FHIR resource shapes found in a patient's
//! exported record, plus the helpers used to read them: reference
//! resolution, date parsing and value rendering.

pub mod conversion;
pub mod datatypes;
pub mod datetime;
pub mod reference;
pub mod resources;

use serde::{Deserialize, Serialize};

pub use resources::{
    DiagnosticReport, Encounter, MedicationStatement, Observation, Patient, Practitioner,
};

/// A single entry of the exported record, keyed by `resourceType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    DiagnosticReport(DiagnosticReport),
    Observation(Observation),
    Patient(Patient),
    Practitioner(Practitioner),
    Encounter(Encounter),
    MedicationStatement(MedicationStatement),
    /// Any resource type the transformer does not read (Condition, Immunization, ...).
    #[serde(other)]
    Other,
}

impl Resource {
    pub fn resource_type(&self) -> &'static str {
        match self {
            Resource::DiagnosticReport(_) => "DiagnosticReport",
            Resource::Observation(_) => "Observation",
            Resource::Patient(_) => "Patient",
            Resource::Practitioner(_) => "Practitioner",
            Resource::Encounter(_) => "Encounter",
            Resource::MedicationStatement(_) => "MedicationStatement",
            Resource::Other => "Other",
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Resource::DiagnosticReport(r) => Some(&r.id),
            Resource::Observation(r) => Some(&r.id),
            Resource::Patient(r) => Some(&r.id),
            Resource::Practitioner(r) => Some(&r.id),
            Resource::Encounter(r) => Some(&r.id),
            Resource::MedicationStatement(r) => Some(&r.id),
            Resource::Other => None,
        }
    }
}
