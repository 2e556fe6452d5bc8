//! View models derived from the loaded record.
//!
//! [`HealthRecords`] is the entry point used by the presentation layer.
//! It wraps one indexed bundle snapshot; every method is a pure function
//! of that snapshot plus the `now` instant captured when it was taken.

pub mod medications;
pub mod patient;
pub mod practitioners;
pub mod provider_detail;
pub mod reports;
pub mod summary;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::categorization::{categorize_providers, filter_by_category, CategorizedProvider, ProviderCategory};
use crate::config::SummaryConfig;
use crate::fhir::Resource;
use crate::storage::ResourceIndex;

pub use medications::{Medication, MedicationFilter};
pub use patient::PatientProfile;
pub use practitioners::{Department, Provider};
pub use provider_detail::{ProgressNote, ProviderAppointment, ProviderDiagnosesAndPlans, TreatmentPlanItem};
pub use reports::{MedicalReport, Report};
pub use summary::{Appointment, HealthSummary};

#[derive(Debug, Clone)]
pub struct HealthRecords {
    index: Arc<ResourceIndex>,
    options: SummaryConfig,
    now: DateTime<Utc>,
}

impl HealthRecords {
    pub fn new(index: Arc<ResourceIndex>, options: SummaryConfig) -> Self {
        HealthRecords {
            index,
            options,
            now: Utc::now(),
        }
    }

    pub fn from_resources(resources: Vec<Resource>) -> Self {
        HealthRecords::new(Arc::new(ResourceIndex::new(resources)), SummaryConfig::default())
    }

    /// Pins the instant used for scheduled/completed and recency decisions.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn index(&self) -> &ResourceIndex {
        &self.index
    }

    pub fn list_practitioners(&self) -> Vec<Provider> {
        practitioners::list_practitioners(&self.index)
    }

    pub fn get_practitioner_by_id(&self, id: &str) -> Option<Provider> {
        practitioners::practitioner_by_id(&self.index, id)
    }

    pub fn group_practitioners_by_department(&self) -> Vec<Department> {
        practitioners::group_by_department(&self.index)
    }

    pub fn list_diagnostic_reports_as_reports(&self) -> Vec<Report> {
        reports::list_reports(&self.index)
    }

    pub fn transform_fasten_health_data(&self) -> HealthSummary {
        summary::health_summary(&self.index, &self.options, self.now)
    }

    pub fn get_provider_diagnoses_and_treatment_plans(&self, practitioner_id: &str) -> ProviderDiagnosesAndPlans {
        provider_detail::diagnoses_and_treatment_plans(&self.index, practitioner_id, &self.options, self.now)
    }

    pub fn get_provider_progress_notes(&self, practitioner_id: &str) -> Vec<ProgressNote> {
        provider_detail::progress_notes(&self.index, practitioner_id)
    }

    pub fn get_provider_appointments(&self, practitioner_id: &str) -> Vec<ProviderAppointment> {
        provider_detail::appointments(&self.index, practitioner_id, self.now)
    }

    /// Active and completed medication statements.
    pub fn get_fasten_medications(&self) -> Vec<Medication> {
        medications::medications(&self.index, MedicationFilter::ActiveOrCompleted)
    }

    pub fn get_fasten_patient(&self) -> Option<PatientProfile> {
        patient::patient_profile(&self.index)
    }

    /// Providers in engagement order, each with its category assignment.
    pub fn categorized_providers(&self) -> Vec<CategorizedProvider> {
        categorize_providers(&self.list_practitioners())
    }

    pub fn providers_in_category(&self, category: ProviderCategory, sub_category: Option<&str>) -> Vec<Provider> {
        filter_by_category(self.categorized_providers(), category, sub_category)
    }
}
