//! DiagnosticReport view models.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::fhir::conversion::ToFindings;
use crate::fhir::datatypes::{identifier_by_type, non_empty, CodeableConcept, Reference};
use crate::fhir::datetime::{format_date, format_time, parse_fhir_datetime};
use crate::fhir::reference::{reference_type, resolve};
use crate::fhir::{DiagnosticReport, Encounter, Observation};
use crate::storage::ResourceIndex;
use crate::transform::practitioners::practitioner_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportCategory {
    Imaging,
    Pathology,
    Lab,
    MedicalRecords,
    Other(String),
}

impl ReportCategory {
    /// Buckets the first category entry by keyword. No category at all
    /// is treated as a general medical record.
    pub fn of(report: &DiagnosticReport) -> Self {
        let label = match report.category.first().and_then(CodeableConcept::first_coding_or_text) {
            Some(label) => label,
            None => return ReportCategory::MedicalRecords,
        };
        let lower = label.to_lowercase();

        if lower.contains("imag") || lower.contains("rad") {
            ReportCategory::Imaging
        } else if lower.contains("path") {
            ReportCategory::Pathology
        } else if lower.contains("lab") {
            ReportCategory::Lab
        } else if lower.contains("record") || lower.contains("note") {
            ReportCategory::MedicalRecords
        } else {
            ReportCategory::Other(label.to_string())
        }
    }

    /// Label on the health summary cards.
    pub fn label(&self) -> &str {
        match self {
            ReportCategory::Imaging => "Imaging",
            ReportCategory::Pathology => "Pathology",
            ReportCategory::Lab => "Lab Report",
            ReportCategory::MedicalRecords => "Medical Records",
            ReportCategory::Other(text) => text,
        }
    }

    /// Label on the reports screen filter tabs.
    pub fn tab_label(&self) -> &str {
        match self {
            ReportCategory::Lab => "Lab Reports",
            other => other.label(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Completed,
    Pending,
    Available,
}

impl ReportStatus {
    pub fn from_fhir(status: Option<&str>) -> Self {
        match status {
            Some("final") => ReportStatus::Completed,
            Some("preliminary") | Some("registered") => ReportStatus::Pending,
            _ => ReportStatus::Available,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "DICOM")]
    Dicom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalReport {
    pub id: String,
    pub title: String,
    pub date: String,
    pub doctor: String,
    pub category: String,
    pub findings: Vec<String>,
    pub status: ReportStatus,
    pub conclusion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: usize, // 1-based position in the date-sorted list
    pub source_id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub category: String,
    pub provider: String,
    pub status: ReportStatus,
    pub findings: Vec<String>,
    pub conclusion: Option<String>,
    pub accession_number: Option<String>,
    pub order_number: Option<String>,
    pub interpreted_by: Option<String>,
    pub signed_by: Option<String>,
    pub facility: Option<String>,
    pub file_type: FileType,
    pub attachment_url: Option<String>,
}

pub fn report_title(report: &DiagnosticReport) -> String {
    report
        .code
        .as_ref()
        .and_then(CodeableConcept::label)
        .unwrap_or("Diagnostic Report")
        .to_string()
}

pub fn report_date(report: &DiagnosticReport) -> Option<DateTime<FixedOffset>> {
    report.effective().and_then(parse_fhir_datetime)
}

/// Reports newest first; undated reports sink to the end in source order.
pub fn sorted_by_date_desc<'a>(reports: impl IntoIterator<Item = &'a DiagnosticReport>) -> Vec<&'a DiagnosticReport> {
    let mut reports: Vec<_> = reports.into_iter().collect();
    reports.sort_by(|a, b| report_date(b).cmp(&report_date(a)));
    reports
}

/// Diagnosis text: first conclusion code, then report code.
pub fn diagnosis_text(report: &DiagnosticReport) -> String {
    report
        .conclusion_code
        .iter()
        .find_map(CodeableConcept::label)
        .map(str::to_string)
        .unwrap_or_else(|| report_title(report))
}

/// Finding lines for every resolvable result; dangling references are
/// skipped. A report with nothing to show gets a single "completed" line.
pub fn findings(report: &DiagnosticReport, observations: &HashMap<String, Observation>) -> Vec<String> {
    let lines: Vec<String> = report
        .result
        .iter()
        .filter_map(|result| resolve(observations, Some(result)))
        .flat_map(ToFindings::to_findings)
        .collect();

    if lines.is_empty() {
        vec![format!("{} completed", report_title(report))]
    } else {
        lines
    }
}

pub fn to_medical_report(report: &DiagnosticReport, index: &ResourceIndex) -> MedicalReport {
    MedicalReport {
        id: report.id.clone(),
        title: report_title(report),
        date: format_date(report_date(report)),
        doctor: performer_name(index, report.performer.first())
            .unwrap_or_else(|| "Unknown Provider".to_string()),
        category: ReportCategory::of(report).label().to_string(),
        findings: findings(report, index.observations()),
        status: ReportStatus::from_fhir(report.status.as_deref()),
        conclusion: non_empty(report.conclusion.as_deref()).map(str::to_string),
    }
}

pub fn to_report(report: &DiagnosticReport, position: usize, index: &ResourceIndex) -> Report {
    let date = report_date(report);
    let category = ReportCategory::of(report);
    let encounter = resolve(index.encounters(), report.encounter.as_ref());
    let status = ReportStatus::from_fhir(report.status.as_deref());
    let provider = performer_name(index, report.performer.first());
    let attachment = report.presented_form.first();

    Report {
        id: position,
        source_id: report.id.clone(),
        title: report_title(report),
        date: format_date(date),
        time: format_time(date),
        category: category.tab_label().to_string(),
        provider: provider.clone().unwrap_or_else(|| "Unknown Provider".to_string()),
        status,
        findings: findings(report, index.observations()),
        conclusion: non_empty(report.conclusion.as_deref()).map(str::to_string),
        accession_number: identifier_by_type(&report.identifier, "FILL"),
        order_number: identifier_by_type(&report.identifier, "PLAC"),
        interpreted_by: performer_name(index, report.results_interpreter.first()),
        signed_by: provider.filter(|_| status == ReportStatus::Completed),
        facility: facility_name(report, encounter),
        file_type: file_type(attachment.and_then(|a| a.content_type.as_deref()), &category),
        attachment_url: attachment.and_then(|a| non_empty(a.url.as_deref())).map(str::to_string),
    }
}

/// All reports as [`Report`]s, newest first, numbered from 1.
pub fn list_reports(index: &ResourceIndex) -> Vec<Report> {
    sorted_by_date_desc(index.diagnostic_reports())
        .into_iter()
        .enumerate()
        .map(|(i, report)| to_report(report, i + 1, index))
        .collect()
}

/// Name for a performer or interpreter reference: the display text the
/// report carries, then the referenced practitioner's derived name.
pub(crate) fn performer_name(index: &ResourceIndex, reference: Option<&Reference>) -> Option<String> {
    let reference = reference?;
    non_empty(reference.display.as_deref())
        .map(str::to_string)
        .or_else(|| practitioner_name(index, reference.reference.as_deref()))
}

fn facility_name(report: &DiagnosticReport, encounter: Option<&Encounter>) -> Option<String> {
    let organization_performer = report
        .performer
        .iter()
        .filter(|p| p.reference.as_deref().and_then(reference_type) == Some("Organization"))
        .find_map(|p| non_empty(p.display.as_deref()));

    organization_performer
        .or_else(|| encounter.and_then(|e| e.service_provider.as_ref()).and_then(|s| non_empty(s.display.as_deref())))
        .or_else(|| {
            encounter
                .and_then(|e| e.location.first())
                .and_then(|l| l.location.as_ref())
                .and_then(|l| non_empty(l.display.as_deref()))
        })
        .map(str::to_string)
}

fn file_type(content_type: Option<&str>, category: &ReportCategory) -> FileType {
    match content_type.map(str::to_lowercase) {
        Some(ct) if ct.contains("pdf") => FileType::Pdf,
        Some(ct) if ct.contains("dicom") || ct.contains("image") => FileType::Dicom,
        _ if *category == ReportCategory::Imaging => FileType::Dicom,
        _ => FileType::Pdf,
    }
}

/// Exact match on `performer[0].reference`; later performers never attribute a report.
pub(crate) fn first_performer_is(report: &DiagnosticReport, practitioner_id: &str) -> bool {
    report
        .performer
        .first()
        .and_then(|p| p.reference.as_deref())
        .map_or(false, |r| r == format!("Practitioner/{}", practitioner_id))
}
