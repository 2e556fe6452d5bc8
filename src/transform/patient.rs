use serde::{Deserialize, Serialize};

use crate::fhir::datatypes::{home_telecom, preferred_name, Address, CodeableConcept, HumanName};
use crate::fhir::resources::PatientContact;
use crate::fhir::Patient;
use crate::storage::ResourceIndex;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientAddress {
    pub line: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub id: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub address: PatientAddress,
    pub formatted_address: String,
    pub marital_status: String,
    pub emergency_contact: Option<EmergencyContact>,
}

/// The first Patient in the bundle, if any.
pub fn patient_profile(index: &ResourceIndex) -> Option<PatientProfile> {
    index.patients().first().map(to_profile)
}

pub fn to_profile(patient: &Patient) -> PatientProfile {
    let name = preferred_name(&patient.name);
    let address = patient
        .address
        .iter()
        .find(|a| a.address_use.as_deref() == Some("home"))
        .or_else(|| patient.address.first());

    PatientProfile {
        id: patient.id.clone(),
        name: name.map(HumanName::display).unwrap_or_default(),
        first_name: name.and_then(|n| n.given.first()).cloned().unwrap_or_default(),
        last_name: name.and_then(|n| n.family.clone()).unwrap_or_default(),
        phone: home_telecom(&patient.telecom, "phone").unwrap_or_default(),
        email: home_telecom(&patient.telecom, "email").unwrap_or_default(),
        gender: patient.gender.clone(),
        birth_date: patient.birth_date.clone(),
        address: address.map(address_parts).unwrap_or_default(),
        formatted_address: address.map(Address::one_line).unwrap_or_default(),
        marital_status: patient
            .marital_status
            .as_ref()
            .and_then(CodeableConcept::label)
            .unwrap_or_default()
            .to_string(),
        emergency_contact: patient
            .contact
            .iter()
            .find(|c| c.is_emergency())
            .map(emergency_contact),
    }
}

fn address_parts(address: &Address) -> PatientAddress {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    PatientAddress {
        line: address.line.join(", "),
        city: text(&address.city),
        state: text(&address.state),
        postal_code: text(&address.postal_code),
        country: text(&address.country),
    }
}

fn emergency_contact(contact: &PatientContact) -> EmergencyContact {
    EmergencyContact {
        name: contact.name.as_ref().map(HumanName::display).unwrap_or_default(),
        relationship: contact
            .relationship
            .iter()
            .find_map(CodeableConcept::label)
            .unwrap_or("Emergency Contact")
            .to_string(),
        phone: home_telecom(&contact.telecom, "phone").unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{index_of, sample_bundle};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_profile_from_sample() {
        let profile = patient_profile(&index_of(&sample_bundle())).unwrap();
        assert_eq!(profile.name, "Jenny Ann Wilson");
        assert_eq!(profile.first_name, "Jenny");
        assert_eq!(profile.last_name, "Wilson");
        assert_eq!(profile.phone, "555-2001");
        assert_eq!(profile.email, "jenny@example.com");
        assert_eq!(profile.marital_status, "Married");
        assert_eq!(profile.formatted_address, "12 Elm St, Springfield, IL 62701");
        assert_eq!(profile.address.postal_code, "62701");
        assert_eq!(
            profile.emergency_contact,
            Some(EmergencyContact {
                name: "Robert Wilson".to_string(),
                relationship: "Emergency Contact".to_string(),
                phone: "555-3000".to_string(),
            })
        );
    }

    #[test]
    fn test_patient_without_telecom() {
        let bundle = json!([{
            "resourceType": "Patient",
            "id": "p",
            "name": [{ "use": "official", "given": ["Jenny"], "family": "Wilson" }]
        }]);
        let profile = patient_profile(&index_of(&bundle)).unwrap();
        assert_eq!(profile.name, "Jenny Wilson");
        assert_eq!(profile.phone, "");
        assert_eq!(profile.email, "");
        assert_eq!(profile.emergency_contact, None);
        assert_eq!(profile.address, PatientAddress::default());
    }

    #[test]
    fn test_emergency_detected_by_display() {
        let bundle = json!([{
            "resourceType": "Patient",
            "id": "p",
            "contact": [{
                "relationship": [{ "text": "Emergency - neighbour" }],
                "name": { "text": "Pat Doe" }
            }]
        }]);
        let profile = patient_profile(&index_of(&bundle)).unwrap();
        let contact = profile.emergency_contact.unwrap();
        assert_eq!(contact.name, "Pat Doe");
        assert_eq!(contact.relationship, "Emergency - neighbour");
    }

    #[test]
    fn test_no_patient() {
        assert!(patient_profile(&index_of(&json!([]))).is_none());
    }
}
