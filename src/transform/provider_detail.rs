//! Per-practitioner detail views.
//!
//! A report belongs to a practitioner only when its *first* performer
//! references that practitioner. Treatment plans reuse the patient's
//! active medications because exports do not link medications to
//! encounters.

use std::collections::HashSet;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SummaryConfig;
use crate::fhir::datatypes::non_empty;
use crate::fhir::datetime::{format_date, format_time};
use crate::fhir::reference::resolve;
use crate::fhir::DiagnosticReport;
use crate::storage::ResourceIndex;
use crate::transform::medications::{medications, Medication, MedicationFilter};
use crate::transform::practitioners::practitioner_by_id;
use crate::transform::reports::{
    diagnosis_text, findings, first_performer_is, report_date, report_title, sorted_by_date_desc,
    ReportStatus,
};
use crate::transform::summary::{encounter_location, encounter_type, AppointmentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosisStatus {
    Active,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDiagnosis {
    pub id: String,
    pub condition: String,
    pub date: String,
    pub status: DiagnosisStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentPlanItem {
    pub id: String,
    pub title: String,
    pub date: String,
    pub diagnosis: String,
    pub description: String,
    pub status: PlanStatus,
    pub is_current: bool,
    pub medications: Vec<Medication>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDiagnosesAndPlans {
    pub diagnoses: Vec<ProviderDiagnosis>,
    pub treatment_plans: Vec<TreatmentPlanItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressNote {
    pub id: String,
    pub date: String,
    pub title: String,
    pub provider_name: String,
    pub summary: String,
    pub findings: Vec<String>,
    pub status: ReportStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAppointment {
    pub id: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
    pub status: AppointmentStatus,
    pub location: Option<String>,
    pub notes: Option<String>,
    #[serde(skip)]
    at: Option<DateTime<FixedOffset>>,
}

/// Reports attributed to the practitioner, newest first.
fn attributed_reports<'a>(index: &'a ResourceIndex, practitioner_id: &str) -> Vec<&'a DiagnosticReport> {
    sorted_by_date_desc(
        index
            .diagnostic_reports()
            .iter()
            .filter(|report| first_performer_is(report, practitioner_id)),
    )
}

/// Within `window_days` of `now`. A window too large to subtract from
/// `now` covers every date.
fn is_recent(date: Option<DateTime<FixedOffset>>, now: DateTime<Utc>, window_days: u32) -> bool {
    let Some(date) = date else {
        return false;
    };
    match Duration::try_days(i64::from(window_days)).and_then(|window| now.checked_sub_signed(window)) {
        Some(cutoff) => date.with_timezone(&Utc) >= cutoff,
        None => true,
    }
}

pub fn diagnoses_and_treatment_plans(
    index: &ResourceIndex,
    practitioner_id: &str,
    options: &SummaryConfig,
    now: DateTime<Utc>,
) -> ProviderDiagnosesAndPlans {
    let reports = attributed_reports(index, practitioner_id);
    let plan_medications: Vec<Medication> = medications(index, MedicationFilter::Active)
        .into_iter()
        .take(options.plan_medication_limit)
        .collect();

    let diagnoses = reports
        .iter()
        .map(|report| {
            let date = report_date(report);
            ProviderDiagnosis {
                id: report.id.clone(),
                condition: diagnosis_text(report),
                date: format_date(date),
                status: if is_recent(date, now, options.plan_active_window_days) {
                    DiagnosisStatus::Active
                } else {
                    DiagnosisStatus::Resolved
                },
                notes: non_empty(report.conclusion.as_deref()).map(str::to_string),
            }
        })
        .collect();

    let treatment_plans = reports
        .iter()
        .enumerate()
        .map(|(position, report)| {
            let date = report_date(report);
            let is_current = position == 0;
            TreatmentPlanItem {
                id: format!("plan-{}", report.id),
                title: if is_current {
                    "Current Treatment Plan".to_string()
                } else {
                    "Previous Treatment Plan".to_string()
                },
                date: format_date(date),
                diagnosis: diagnosis_text(report),
                description: non_empty(report.conclusion.as_deref())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Treatment following {}", report_title(report))),
                status: if is_recent(date, now, options.plan_active_window_days) {
                    PlanStatus::Active
                } else {
                    PlanStatus::Completed
                },
                is_current,
                medications: plan_medications.clone(),
            }
        })
        .collect();

    ProviderDiagnosesAndPlans { diagnoses, treatment_plans }
}

pub fn progress_notes(index: &ResourceIndex, practitioner_id: &str) -> Vec<ProgressNote> {
    let provider_name = practitioner_by_id(index, practitioner_id)
        .map(|p| p.name)
        .unwrap_or_else(|| "Unknown Provider".to_string());

    attributed_reports(index, practitioner_id)
        .into_iter()
        .map(|report| {
            let title = report_title(report);
            ProgressNote {
                id: report.id.clone(),
                date: format_date(report_date(report)),
                summary: non_empty(report.conclusion.as_deref())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{} results reviewed", title)),
                title,
                provider_name: provider_name.clone(),
                findings: findings(report, index.observations()),
                status: ReportStatus::from_fhir(report.status.as_deref()),
            }
        })
        .collect()
}

/// One appointment per attributed report, de-duplicated by report id,
/// newest first.
pub fn appointments(index: &ResourceIndex, practitioner_id: &str, now: DateTime<Utc>) -> Vec<ProviderAppointment> {
    let mut seen = HashSet::new();
    let mut appointments: Vec<ProviderAppointment> = attributed_reports(index, practitioner_id)
        .into_iter()
        .filter(|report| seen.insert(report.id.clone()))
        .map(|report| {
            let at = report_date(report);
            let encounter = resolve(index.encounters(), report.encounter.as_ref());
            ProviderAppointment {
                id: report.id.clone(),
                date: format_date(at),
                time: format_time(at),
                appointment_type: encounter_type(encounter).unwrap_or_else(|| report_title(report)),
                status: AppointmentStatus::at(at, now),
                location: encounter.and_then(encounter_location),
                notes: non_empty(report.conclusion.as_deref()).map(str::to_string),
                at,
            }
        })
        .collect();

    appointments.sort_by(|a, b| b.at.cmp(&a.at));
    appointments
}
