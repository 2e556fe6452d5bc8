//! The aggregate health summary shown on the home screen.
//!
//! Appointments are synthesised from DiagnosticReport + Encounter pairs,
//! since exports carry no Appointment resources. Likewise there is no
//! CarePlan in the source data, so the treatment plan is a fixed
//! placeholder rather than something derived.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SummaryConfig;
use crate::fhir::datatypes::{non_empty, CodeableConcept};
use crate::fhir::datetime::{format_date, format_time, is_after};
use crate::fhir::reference::resolve;
use crate::fhir::{DiagnosticReport, Encounter};
use crate::storage::ResourceIndex;
use crate::transform::medications::{medications, Medication, MedicationFilter};
use crate::transform::patient::{patient_profile, PatientProfile};
use crate::transform::reports::{
    performer_name, report_date, sorted_by_date_desc, to_medical_report, MedicalReport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
}

impl AppointmentStatus {
    /// Future-dated visits are still scheduled; undated ones count as done.
    pub fn at(date: Option<DateTime<FixedOffset>>, now: DateTime<Utc>) -> Self {
        match date {
            Some(date) if is_after(&date, now) => AppointmentStatus::Scheduled,
            _ => AppointmentStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
    pub status: AppointmentStatus,
    pub location: Option<String>,
    pub reason: Option<String>,
    #[serde(skip)]
    pub(crate) at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDiagnosis {
    pub doctor_name: String,
    pub date: String,
    pub diagnosis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentPlan {
    pub title: String,
    pub description: String,
    pub goals: Vec<String>,
    pub status: String,
}

impl TreatmentPlan {
    pub fn placeholder() -> Self {
        TreatmentPlan {
            title: "General Health Maintenance".to_string(),
            description: "Continue current medications and follow up with your care team as scheduled."
                .to_string(),
            goals: vec![
                "Take medications as prescribed".to_string(),
                "Attend scheduled follow-up appointments".to_string(),
                "Review new lab results with your provider".to_string(),
            ],
            status: "Active".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    pub patient: Option<PatientProfile>,
    pub medical_reports: Vec<MedicalReport>,
    pub appointments: Vec<Appointment>,
    pub medications: Vec<Medication>,
    pub doctor_diagnoses: Vec<DoctorDiagnosis>,
    pub treatment_plan: TreatmentPlan,
}

pub fn health_summary(index: &ResourceIndex, options: &SummaryConfig, now: DateTime<Utc>) -> HealthSummary {
    let reports = sorted_by_date_desc(index.diagnostic_reports());

    HealthSummary {
        patient: patient_profile(index),
        medical_reports: reports
            .iter()
            .take(options.max_reports)
            .map(|report| to_medical_report(report, index))
            .collect(),
        appointments: appointments(index, &reports, now),
        medications: medications(index, MedicationFilter::ActiveOrCompleted),
        doctor_diagnoses: doctor_diagnoses(index, &reports),
        treatment_plan: TreatmentPlan::placeholder(),
    }
}

fn appointments(index: &ResourceIndex, reports: &[&DiagnosticReport], now: DateTime<Utc>) -> Vec<Appointment> {
    let mut seen = HashSet::new();
    let mut appointments: Vec<Appointment> = reports
        .iter()
        .filter(|report| report.encounter.is_some())
        .filter(|report| seen.insert(report.id.clone()))
        .map(|report| {
            let at = report_date(report);
            let encounter = resolve(index.encounters(), report.encounter.as_ref());
            Appointment {
                id: report.id.clone(),
                doctor_name: doctor_name(index, report).unwrap_or_else(|| "Unknown Doctor".to_string()),
                date: format_date(at),
                time: format_time(at),
                appointment_type: encounter_type(encounter).unwrap_or_else(|| "Consultation".to_string()),
                status: AppointmentStatus::at(at, now),
                location: encounter.and_then(encounter_location),
                reason: encounter
                    .and_then(|e| e.reason_code.iter().find_map(CodeableConcept::label))
                    .map(str::to_string),
                at,
            }
        })
        .collect();

    appointments.sort_by(|a, b| b.at.cmp(&a.at));
    appointments
}

fn doctor_diagnoses(index: &ResourceIndex, reports: &[&DiagnosticReport]) -> Vec<DoctorDiagnosis> {
    let mut seen = HashSet::new();
    reports
        .iter()
        .filter_map(|report| {
            let diagnosis = report
                .conclusion_code
                .iter()
                .find_map(CodeableConcept::label)
                .or_else(|| non_empty(report.conclusion.as_deref()))?;
            Some(DoctorDiagnosis {
                doctor_name: doctor_name(index, report).unwrap_or_else(|| "Unknown Doctor".to_string()),
                date: format_date(report_date(report)),
                diagnosis: diagnosis.to_string(),
            })
        })
        .filter(|diagnosis| seen.insert(diagnosis.clone()))
        .collect()
}

fn doctor_name(index: &ResourceIndex, report: &DiagnosticReport) -> Option<String> {
    performer_name(index, report.performer.first())
}

/// Encounter.type label, then the class display or code.
pub(crate) fn encounter_type(encounter: Option<&Encounter>) -> Option<String> {
    let encounter = encounter?;
    encounter
        .encounter_type
        .iter()
        .find_map(CodeableConcept::label)
        .or_else(|| {
            encounter.class.as_ref().and_then(|c| {
                non_empty(c.display.as_deref()).or_else(|| non_empty(c.code.as_deref()))
            })
        })
        .map(str::to_string)
}

pub(crate) fn encounter_location(encounter: &Encounter) -> Option<String> {
    encounter
        .location
        .iter()
        .filter_map(|l| l.location.as_ref())
        .find_map(|l| non_empty(l.display.as_deref()))
        .or_else(|| encounter.service_provider.as_ref().and_then(|s| non_empty(s.display.as_deref())))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{index_of, now, sample_bundle};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn summary() -> HealthSummary {
        health_summary(&index_of(&sample_bundle()), &SummaryConfig::default(), now())
    }

    #[test]
    fn test_reports_newest_first() {
        let ids: Vec<_> = summary().medical_reports.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["dr-3", "dr-2", "dr-1", "dr-4"]);
    }

    #[test]
    fn test_report_limit() {
        let options = SummaryConfig { max_reports: 2, ..SummaryConfig::default() };
        let summary = health_summary(&index_of(&sample_bundle()), &options, now());
        assert_eq!(summary.medical_reports.len(), 2);
    }

    #[test]
    fn test_appointments_from_report_encounter_pairs() {
        let appointments = summary().appointments;
        let view: Vec<_> = appointments
            .iter()
            .map(|a| (a.id.as_str(), a.doctor_name.as_str(), a.appointment_type.as_str(), a.status))
            .collect();
        assert_eq!(
            view,
            vec![
                ("dr-3", "Susan Lee", "Office visit", AppointmentStatus::Scheduled),
                ("dr-2", "John Smith", "ambulatory", AppointmentStatus::Completed),
                ("dr-1", "Dr. John Smith", "Office visit", AppointmentStatus::Completed),
            ]
        );
        assert_eq!(appointments[1].location.as_deref(), Some("Springfield Imaging Center"));
        assert_eq!(appointments[1].time, "02:30 PM");
    }

    #[test]
    fn test_appointments_deduplicated_by_report() {
        let bundle = json!([
            { "resourceType": "DiagnosticReport", "id": "r1", "encounter": { "reference": "Encounter/gone" }, "effectiveDateTime": "2024-01-01" },
            { "resourceType": "DiagnosticReport", "id": "r1", "encounter": { "reference": "Encounter/gone" }, "effectiveDateTime": "2024-01-01" }
        ]);
        let summary = health_summary(&index_of(&bundle), &SummaryConfig::default(), now());
        assert_eq!(summary.appointments.len(), 1);
        assert_eq!(summary.appointments[0].doctor_name, "Unknown Doctor");
        assert_eq!(summary.appointments[0].appointment_type, "Consultation");
    }

    #[test]
    fn test_evening_visit_keeps_recorded_date() {
        let bundle = json!([
            { "resourceType": "Encounter", "id": "e", "type": [{ "text": "Follow-up" }] },
            { "resourceType": "DiagnosticReport", "id": "late", "encounter": { "reference": "Encounter/e" },
              "effectiveDateTime": "2024-11-25T21:30:00-05:00", "conclusion": "Stable" },
            { "resourceType": "DiagnosticReport", "id": "late-again", "encounter": { "reference": "Encounter/e" },
              "effectiveDateTime": "2024-11-25T22:45:00-05:00", "conclusion": "Stable" }
        ]);
        let summary = health_summary(&index_of(&bundle), &SummaryConfig::default(), now());

        let appointment = &summary.appointments[1];
        assert_eq!(appointment.id, "late");
        assert_eq!((appointment.date.as_str(), appointment.time.as_str()), ("2024-11-25", "09:30 PM"));
        assert_eq!(summary.medical_reports[0].date, "2024-11-25");
        // same local day, so the diagnosis key collapses to one entry
        assert_eq!(summary.doctor_diagnoses.len(), 1);
        assert_eq!(summary.doctor_diagnoses[0].date, "2024-11-25");
    }

    #[test]
    fn test_doctor_diagnoses() {
        let diagnoses = summary().doctor_diagnoses;
        assert_eq!(
            diagnoses,
            vec![
                DoctorDiagnosis {
                    doctor_name: "John Smith".into(),
                    date: "2024-11-25".into(),
                    diagnosis: "No acute findings".into(),
                },
                DoctorDiagnosis {
                    doctor_name: "Dr. John Smith".into(),
                    date: "2024-11-20".into(),
                    diagnosis: "Type 2 diabetes".into(),
                },
                DoctorDiagnosis {
                    doctor_name: "John Smith".into(),
                    date: "2024-06-01".into(),
                    diagnosis: "Hyperlipidemia".into(),
                },
            ]
        );
    }

    #[test]
    fn test_medications_and_placeholder_plan() {
        let summary = summary();
        assert_eq!(summary.medications.len(), 5);
        assert_eq!(summary.treatment_plan, TreatmentPlan::placeholder());
        assert_eq!(summary.patient.map(|p| p.id).as_deref(), Some("pat-1"));
    }

    #[test]
    fn test_empty_bundle() {
        let summary = health_summary(&index_of(&json!([])), &SummaryConfig::default(), now());
        assert!(summary.medical_reports.is_empty());
        assert!(summary.appointments.is_empty());
        assert!(summary.patient.is_none());
    }
}
