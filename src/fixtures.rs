//! Shared test bundle: four practitioners, four reports, two encounters,
//! a handful of observations and medication statements, and one patient.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::storage::{load_resources_from_str, ResourceIndex};
use crate::transform::HealthRecords;

/// Reference instant for recency decisions in tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap()
}

pub fn index_of(payload: &Value) -> ResourceIndex {
    ResourceIndex::new(load_resources_from_str(&payload.to_string()))
}

pub fn records_of(payload: &Value) -> HealthRecords {
    HealthRecords::from_resources(load_resources_from_str(&payload.to_string())).with_now(now())
}

pub fn sample_records() -> HealthRecords {
    records_of(&sample_bundle())
}

pub fn sample_bundle() -> Value {
    json!([
        {
            "resourceType": "Practitioner",
            "id": "pr-smith",
            "name": [{ "use": "official", "given": ["John"], "family": "Smith", "suffix": ["MD"] }],
            "telecom": [
                { "system": "phone", "value": "555-1000", "use": "work" },
                { "system": "email", "value": "smith@clinic.org" }
            ]
        },
        {
            "resourceType": "Practitioner",
            "id": "pr-lee",
            "name": [{ "text": "Susan Lee, M.D. - Cardiology" }]
        },
        {
            "resourceType": "Practitioner",
            "id": "pr-anon",
            "name": []
        },
        {
            "resourceType": "Practitioner",
            "id": "pr-garcia",
            "name": [{ "given": ["Maria"], "family": "Garcia", "suffix": ["NP"] }]
        },
        {
            "resourceType": "Observation",
            "id": "obs-glucose",
            "status": "final",
            "code": { "text": "Glucose" },
            "valueQuantity": { "value": 130, "unit": "mg/dL" }
        },
        {
            "resourceType": "Observation",
            "id": "obs-bp",
            "status": "final",
            "code": { "text": "Blood pressure" },
            "component": [
                { "code": { "text": "Systolic" }, "valueQuantity": { "value": 120, "unit": "mmHg" } },
                { "code": { "text": "Diastolic" }, "valueQuantity": { "value": 80, "unit": "mmHg" } }
            ]
        },
        {
            "resourceType": "Encounter",
            "id": "enc-1",
            "status": "finished",
            "type": [{ "text": "Office visit" }],
            "participant": [{ "individual": { "reference": "Practitioner/pr-garcia" } }],
            "location": [{ "location": { "display": "Main Street Clinic" } }]
        },
        {
            "resourceType": "Encounter",
            "id": "enc-2",
            "status": "finished",
            "class": { "code": "AMB", "display": "ambulatory" },
            "participant": [{ "individual": { "reference": "Practitioner/pr-smith" } }],
            "serviceProvider": { "reference": "Organization/org-1", "display": "Springfield Imaging Center" }
        },
        {
            "resourceType": "DiagnosticReport",
            "id": "dr-1",
            "status": "final",
            "identifier": [
                { "type": { "coding": [{ "code": "FILL" }] }, "value": "ACC-1001" },
                { "type": { "coding": [{ "code": "PLAC" }] }, "value": "ORD-2002" }
            ],
            "category": [{ "coding": [{ "code": "LAB", "display": "Laboratory" }] }],
            "code": { "text": "Metabolic panel" },
            "encounter": { "reference": "Encounter/enc-1" },
            "effectiveDateTime": "2024-11-20T09:15:00Z",
            "performer": [{ "reference": "Practitioner/pr-smith", "display": "Dr. John Smith" }],
            "resultsInterpreter": [{ "reference": "Practitioner/pr-lee" }],
            "result": [
                { "reference": "Observation/obs-glucose" },
                { "reference": "Observation/obs-missing" }
            ],
            "conclusionCode": [{ "text": "Type 2 diabetes" }],
            "presentedForm": [{ "contentType": "application/pdf", "url": "https://example.org/dr-1.pdf" }]
        },
        {
            "resourceType": "DiagnosticReport",
            "id": "dr-2",
            "status": "preliminary",
            "category": [{ "coding": [{ "code": "RAD", "display": "Radiology" }] }],
            "code": { "text": "Chest X-ray" },
            "encounter": { "reference": "Encounter/enc-2" },
            "effectiveDateTime": "2024-11-25T14:30:00Z",
            "performer": [{ "reference": "Practitioner/pr-smith" }],
            "result": [{ "reference": "Observation/obs-bp" }],
            "conclusion": "No acute findings"
        },
        {
            "resourceType": "DiagnosticReport",
            "id": "dr-3",
            "status": "registered",
            "category": [{ "text": "Cardiology" }],
            "code": { "text": "Echocardiogram" },
            "encounter": { "reference": "Encounter/enc-1" },
            "effectiveDateTime": "2025-01-10T10:00:00Z",
            "performer": [{ "reference": "Practitioner/pr-lee", "display": "Susan Lee" }]
        },
        {
            "resourceType": "DiagnosticReport",
            "id": "dr-4",
            "status": "amended",
            "code": { "coding": [{ "display": "Lipid panel" }] },
            "issued": "2024-06-01T08:00:00Z",
            "performer": [{ "reference": "Practitioner/pr-smith" }],
            "result": [{ "reference": "Observation/obs-missing" }],
            "conclusionCode": [{ "coding": [{ "display": "Hyperlipidemia" }] }]
        },
        {
            "resourceType": "MedicationStatement",
            "id": "ms-metformin",
            "status": "active",
            "medicationCodeableConcept": { "text": "Metformin 500 MG Oral Tablet" },
            "effectiveDateTime": "2024-01-15",
            "dosage": [{
                "timing": { "repeat": { "frequency": 2, "period": 1, "periodUnit": "d" } },
                "doseAndRate": [{ "doseQuantity": { "value": 500, "unit": "mg" } }]
            }]
        },
        {
            "resourceType": "MedicationStatement",
            "id": "ms-amoxicillin",
            "status": "completed",
            "medicationCodeableConcept": { "coding": [{ "display": "Amoxicillin 250 MG" }] },
            "dosage": [{ "text": "250 mg three times a day for 10 days" }],
            "reasonCode": [{ "text": "Sinus infection" }]
        },
        {
            "resourceType": "MedicationStatement",
            "id": "ms-aspirin",
            "status": "stopped",
            "medicationCodeableConcept": { "text": "Aspirin 81 MG" }
        },
        {
            "resourceType": "MedicationStatement",
            "id": "ms-lisinopril",
            "status": "active",
            "medicationReference": { "display": "Lisinopril 10 MG" }
        },
        {
            "resourceType": "MedicationStatement",
            "id": "ms-atorvastatin",
            "status": "active",
            "medicationCodeableConcept": { "text": "Atorvastatin 20 MG" }
        },
        {
            "resourceType": "MedicationStatement",
            "id": "ms-insulin",
            "status": "active",
            "medicationCodeableConcept": { "text": "Insulin glargine" }
        },
        {
            "resourceType": "Patient",
            "id": "pat-1",
            "name": [
                { "use": "nickname", "text": "Jen" },
                { "use": "official", "given": ["Jenny", "Ann"], "family": "Wilson" }
            ],
            "gender": "female",
            "birthDate": "1985-04-12",
            "telecom": [
                { "system": "phone", "value": "555-2000", "use": "work" },
                { "system": "phone", "value": "555-2001", "use": "home" },
                { "system": "email", "value": "jenny@example.com" }
            ],
            "address": [
                { "use": "work", "line": ["1 Office Park"], "city": "Springfield" },
                { "use": "home", "line": ["12 Elm St"], "city": "Springfield", "state": "IL", "postalCode": "62701", "country": "US" }
            ],
            "maritalStatus": { "coding": [{ "code": "M", "display": "Married" }] },
            "contact": [
                {
                    "relationship": [{ "coding": [{ "code": "N", "display": "Next-of-Kin" }] }],
                    "name": { "given": ["Ann"], "family": "Wilson" }
                },
                {
                    "relationship": [{ "coding": [{ "code": "C", "display": "Emergency Contact" }] }],
                    "name": { "given": ["Robert"], "family": "Wilson" },
                    "telecom": [{ "system": "phone", "value": "555-3000" }]
                }
            ]
        }
    ])
}
