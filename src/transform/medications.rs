use serde::{Deserialize, Serialize};

use crate::fhir::conversion::{render_dose, render_frequency};
use crate::fhir::datatypes::{non_empty, CodeableConcept};
use crate::fhir::datetime::{format_date, parse_fhir_datetime};
use crate::fhir::MedicationStatement;
use crate::storage::ResourceIndex;

/// Name fragment -> purpose shown on the medication card.
const PURPOSE_KEYWORDS: [(&str, &str); 5] = [
    ("metformin", "Diabetes management"),
    ("lisinopril", "Blood pressure control"),
    ("aspirin", "Cardiovascular protection"),
    ("statin", "Cholesterol management"),
    ("insulin", "Blood sugar control"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedicationFilter {
    Active,
    ActiveOrCompleted,
}

impl MedicationFilter {
    fn admits(self, status: Option<&str>) -> bool {
        match self {
            MedicationFilter::Active => status == Some("active"),
            MedicationFilter::ActiveOrCompleted => matches!(status, Some("active") | Some("completed")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub purpose: String,
    pub status: String,
    pub start_date: Option<String>,
    pub prescriber: Option<String>,
    pub reason: Option<String>,
}

pub fn medications(index: &ResourceIndex, filter: MedicationFilter) -> Vec<Medication> {
    index
        .medication_statements()
        .iter()
        .filter(|statement| filter.admits(statement.status.as_deref()))
        .map(to_medication)
        .collect()
}

pub fn to_medication(statement: &MedicationStatement) -> Medication {
    let name = medication_name(statement);
    Medication {
        id: statement.id.clone(),
        purpose: purpose_for(&name).to_string(),
        dosage: render_dose(&statement.dosage),
        frequency: render_frequency(&statement.dosage),
        status: statement.status.clone().unwrap_or_else(|| "unknown".to_string()),
        start_date: statement
            .start()
            .and_then(parse_fhir_datetime)
            .map(|d| format_date(Some(d))),
        prescriber: statement
            .information_source
            .as_ref()
            .and_then(|s| non_empty(s.display.as_deref()))
            .map(str::to_string),
        reason: statement
            .reason_code
            .iter()
            .find_map(CodeableConcept::label)
            .map(str::to_string),
        name,
    }
}

fn medication_name(statement: &MedicationStatement) -> String {
    statement
        .medication_codeable_concept
        .as_ref()
        .and_then(CodeableConcept::label)
        .or_else(|| {
            statement
                .medication_reference
                .as_ref()
                .and_then(|r| non_empty(r.display.as_deref()))
        })
        .unwrap_or("Unknown Medication")
        .to_string()
}

pub fn purpose_for(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    PURPOSE_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, purpose)| *purpose)
        .unwrap_or("Prescribed medication")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{index_of, sample_bundle};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_status_filters() {
        let index = index_of(&sample_bundle());

        let ids = |filter| -> Vec<String> { medications(&index, filter).into_iter().map(|m| m.id).collect() };
        assert_eq!(
            ids(MedicationFilter::ActiveOrCompleted),
            vec!["ms-metformin", "ms-amoxicillin", "ms-lisinopril", "ms-atorvastatin", "ms-insulin"]
        );
        assert_eq!(
            ids(MedicationFilter::Active),
            vec!["ms-metformin", "ms-lisinopril", "ms-atorvastatin", "ms-insulin"]
        );
    }

    #[test]
    fn test_structured_dosage() {
        let index = index_of(&sample_bundle());
        let metformin = to_medication(&index.medication_statements()[0]);
        assert_eq!(metformin.name, "Metformin 500 MG Oral Tablet");
        assert_eq!(metformin.dosage, "500mg");
        assert_eq!(metformin.frequency, "Twice daily");
        assert_eq!(metformin.purpose, "Diabetes management");
        assert_eq!(metformin.start_date.as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_textual_fallbacks() {
        let index = index_of(&sample_bundle());
        let amoxicillin = to_medication(&index.medication_statements()[1]);
        assert_eq!(amoxicillin.name, "Amoxicillin 250 MG");
        assert_eq!(amoxicillin.dosage, "250 mg three times a day for 10 days");
        assert_eq!(amoxicillin.purpose, "Prescribed medication");
        assert_eq!(amoxicillin.reason.as_deref(), Some("Sinus infection"));

        let lisinopril = to_medication(&index.medication_statements()[3]);
        assert_eq!(lisinopril.name, "Lisinopril 10 MG");
        assert_eq!(lisinopril.dosage, "As directed");
        assert_eq!(lisinopril.frequency, "As directed");
    }

    #[test]
    fn test_purpose_table() {
        assert_eq!(purpose_for("Atorvastatin 20 MG"), "Cholesterol management");
        assert_eq!(purpose_for("Insulin glargine"), "Blood sugar control");
        assert_eq!(purpose_for("ASPIRIN 81"), "Cardiovascular protection");
        assert_eq!(purpose_for("Vitamin D"), "Prescribed medication");
    }

    #[test]
    fn test_unnamed_statement() {
        let statement: MedicationStatement = serde_json::from_value(json!({ "id": "m" })).unwrap();
        let medication = to_medication(&statement);
        assert_eq!(medication.name, "Unknown Medication");
        assert_eq!(medication.status, "unknown");
    }
}
