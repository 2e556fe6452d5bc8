use std::collections::HashMap;

use log::debug;

use crate::fhir::{
    DiagnosticReport, Encounter, MedicationStatement, Observation, Patient, Practitioner, Resource,
};

/// Typed view over one loaded bundle.
///
/// Observations, practitioners and encounters are looked up by id;
/// reports, medication statements and patients are only ever iterated,
/// so they stay as lists in source order.
#[derive(Debug, Default, Clone)]
pub struct ResourceIndex {
    observations: HashMap<String, Observation>,
    encounters: HashMap<String, Encounter>,
    practitioners: Vec<Practitioner>,
    practitioner_positions: HashMap<String, usize>, // id -> position in `practitioners`
    diagnostic_reports: Vec<DiagnosticReport>,
    medication_statements: Vec<MedicationStatement>,
    patients: Vec<Patient>,
}

impl ResourceIndex {
    pub fn new(resources: Vec<Resource>) -> Self {
        let mut index = ResourceIndex::default();
        for resource in resources {
            index.insert(resource);
        }
        index
    }

    // First occurrence of an id wins; later duplicates are dropped.
    fn insert(&mut self, resource: Resource) {
        match resource {
            Resource::Observation(obs) => {
                if self.observations.contains_key(&obs.id) {
                    debug!("Duplicate Observation/{} ignored", obs.id);
                } else {
                    self.observations.insert(obs.id.clone(), obs);
                }
            }
            Resource::Encounter(enc) => {
                if self.encounters.contains_key(&enc.id) {
                    debug!("Duplicate Encounter/{} ignored", enc.id);
                } else {
                    self.encounters.insert(enc.id.clone(), enc);
                }
            }
            Resource::Practitioner(pr) => {
                if self.practitioner_positions.contains_key(&pr.id) {
                    debug!("Duplicate Practitioner/{} ignored", pr.id);
                } else {
                    self.practitioner_positions.insert(pr.id.clone(), self.practitioners.len());
                    self.practitioners.push(pr);
                }
            }
            Resource::DiagnosticReport(report) => self.diagnostic_reports.push(report),
            Resource::MedicationStatement(statement) => self.medication_statements.push(statement),
            Resource::Patient(patient) => self.patients.push(patient),
            Resource::Other => {}
        }
    }

    pub fn observations(&self) -> &HashMap<String, Observation> {
        &self.observations
    }

    pub fn encounters(&self) -> &HashMap<String, Encounter> {
        &self.encounters
    }

    /// Practitioners in source order.
    pub fn practitioners(&self) -> &[Practitioner] {
        &self.practitioners
    }

    /// Practitioner by id together with its 0-based source position.
    pub fn practitioner(&self, id: &str) -> Option<(usize, &Practitioner)> {
        self.practitioner_positions
            .get(id)
            .map(|&position| (position, &self.practitioners[position]))
    }

    pub fn diagnostic_reports(&self) -> &[DiagnosticReport] {
        &self.diagnostic_reports
    }

    pub fn medication_statements(&self) -> &[MedicationStatement] {
        &self.medication_statements
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn len(&self) -> usize {
        self.observations.len()
            + self.encounters.len()
            + self.practitioners.len()
            + self.diagnostic_reports.len()
            + self.medication_statements.len()
            + self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
