//! Practitioner view models: provider list, single lookup and departments.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::fhir::datatypes::{first_telecom, preferred_name, HumanName};
use crate::fhir::reference::reference_id;
use crate::fhir::Practitioner;
use crate::storage::ResourceIndex;

/// Credentials recognised in a free-text name, in priority order.
const SNIFFED_QUALIFICATIONS: [&str; 4] = ["MD", "DO", "PA", "NP"];

const SPECIALTY_KEYWORDS: [(&str, &str); 4] = [
    ("cardiology", "Cardiology"),
    ("neurology", "Neurology"),
    ("pediatric", "Pediatrics"),
    ("ortho", "Orthopedics"),
];

pub const GENERAL_SPECIALTY: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub qualifications: String,
    pub specialty: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    /// References from reports and encounters; only set by [`list_practitioners`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub doctors: Vec<Provider>,
}

/// All practitioners, most engaged first. Ties keep source order.
pub fn list_practitioners(index: &ResourceIndex) -> Vec<Provider> {
    let counts = engagement_counts(index);

    let mut providers: Vec<Provider> = index
        .practitioners()
        .iter()
        .enumerate()
        .map(|(position, practitioner)| {
            let mut provider = provider_from(practitioner, position);
            provider.engagement_count = Some(counts.get(practitioner.id.as_str()).copied().unwrap_or(0));
            provider
        })
        .collect();

    // sort_by is stable
    providers.sort_by(|a, b| b.engagement_count.cmp(&a.engagement_count));
    providers
}

pub fn practitioner_by_id(index: &ResourceIndex, id: &str) -> Option<Provider> {
    index
        .practitioner(id)
        .map(|(position, practitioner)| provider_from(practitioner, position))
}

/// Display name for the practitioner a reference points at, if it resolves.
pub fn practitioner_name(index: &ResourceIndex, reference: Option<&str>) -> Option<String> {
    let id = reference.and_then(reference_id)?;
    practitioner_by_id(index, id).map(|p| p.name)
}

/// Groups providers by specialty, or by a credential-derived label for
/// generalists. Departments are sorted by name.
pub fn group_by_department(index: &ResourceIndex) -> Vec<Department> {
    let mut departments: BTreeMap<String, Vec<Provider>> = BTreeMap::new();

    for provider in list_practitioners(index) {
        let name = if provider.specialty != GENERAL_SPECIALTY {
            provider.specialty.clone()
        } else {
            qualification_group(&provider.qualifications).to_string()
        };
        departments.entry(name).or_default().push(provider);
    }

    departments
        .into_iter()
        .map(|(name, doctors)| Department {
            id: kebab_case(&name),
            name,
            doctors,
        })
        .collect()
}

fn provider_from(practitioner: &Practitioner, position: usize) -> Provider {
    let name_entry = preferred_name(&practitioner.name);
    let display = name_entry.map(HumanName::display).unwrap_or_default();
    let name = if display.is_empty() {
        format!("Provider {}", position + 1)
    } else {
        display
    };

    let qualifications = qualifications_for(name_entry, &name);
    let specialty = specialty_for(&name, &qualifications);

    Provider {
        id: practitioner.id.clone(),
        name,
        qualifications,
        specialty,
        phone: first_telecom(&practitioner.telecom, "phone").unwrap_or_default(),
        email: first_telecom(&practitioner.telecom, "email").unwrap_or_default(),
        address: practitioner
            .address
            .first()
            .map(|a| a.one_line())
            .filter(|a| !a.is_empty()),
        engagement_count: None,
    }
}

/// Tallies performer, resultsInterpreter and encounter participant references.
fn engagement_counts(index: &ResourceIndex) -> HashMap<&str, u32> {
    let report_refs = index
        .diagnostic_reports()
        .iter()
        .flat_map(|r| r.performer.iter().chain(r.results_interpreter.iter()));
    let encounter_refs = index
        .encounters()
        .values()
        .flat_map(|e| e.participant.iter().filter_map(|p| p.individual.as_ref()));

    let mut counts = HashMap::new();
    for id in report_refs
        .chain(encounter_refs)
        .filter_map(|r| r.reference.as_deref())
        .filter_map(reference_id)
    {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

fn qualifications_for(name: Option<&HumanName>, display: &str) -> String {
    if let Some(suffixes) = name.map(|n| &n.suffix).filter(|s| !s.is_empty()) {
        return suffixes.join(", ");
    }

    let tokens = credential_tokens(display);
    SNIFFED_QUALIFICATIONS
        .iter()
        .find(|credential| tokens.iter().any(|t| t == *credential))
        .map(|credential| credential.to_string())
        .unwrap_or_default()
}

fn specialty_for(name: &str, qualifications: &str) -> String {
    let haystack = format!("{} {}", name, qualifications).to_lowercase();
    SPECIALTY_KEYWORDS
        .iter()
        .find(|(keyword, _)| haystack.contains(keyword))
        .map(|(_, specialty)| specialty.to_string())
        .unwrap_or_else(|| GENERAL_SPECIALTY.to_string())
}

fn qualification_group(qualifications: &str) -> &'static str {
    let tokens: Vec<String> = credential_tokens(qualifications)
        .into_iter()
        .map(|t| t.to_uppercase())
        .collect();
    let has = |candidates: &[&str]| tokens.iter().any(|t| candidates.contains(&t.as_str()));

    if has(&["MD", "DO"]) {
        "Physicians"
    } else if has(&["PA", "PA-C"]) {
        "Physician Assistants"
    } else if has(&["NP", "FNP", "APRN", "DNP"]) {
        "Nurse Practitioners"
    } else if has(&["RN", "LPN", "LVN", "BSN"]) {
        "Nurses"
    } else {
        "Healthcare Providers"
    }
}

/// Splits on whitespace and commas and drops dots, so `M.D.` reads as `MD`.
fn credential_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .map(|t| t.replace('.', ""))
        .filter(|t| !t.is_empty())
        .collect()
}

pub(crate) fn kebab_case(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{index_of, sample_bundle};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_list_sorted_by_engagement() {
        let providers = list_practitioners(&index_of(&sample_bundle()));
        let ranking: Vec<_> = providers
            .iter()
            .map(|p| (p.id.as_str(), p.engagement_count))
            .collect();
        assert_eq!(
            ranking,
            vec![
                ("pr-smith", Some(4)),
                ("pr-lee", Some(2)),
                ("pr-garcia", Some(1)),
                ("pr-anon", Some(0)),
            ]
        );
    }

    #[test]
    fn test_equal_engagement_keeps_source_order() {
        let bundle = json!([
            { "resourceType": "Practitioner", "id": "a" },
            { "resourceType": "Practitioner", "id": "b" },
            { "resourceType": "Practitioner", "id": "c" },
            { "resourceType": "Practitioner", "id": "d" },
            { "resourceType": "DiagnosticReport", "id": "r1", "performer": [{ "reference": "Practitioner/c" }] },
            { "resourceType": "DiagnosticReport", "id": "r2", "resultsInterpreter": [{ "reference": "Practitioner/b" }] }
        ]);
        let ids: Vec<_> = list_practitioners(&index_of(&bundle))
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_derived_fields() {
        let index = index_of(&sample_bundle());

        let smith = practitioner_by_id(&index, "pr-smith").unwrap();
        assert_eq!(smith.name, "John Smith");
        assert_eq!(smith.qualifications, "MD");
        assert_eq!(smith.specialty, "General");
        assert_eq!(smith.phone, "555-1000");
        assert_eq!(smith.email, "smith@clinic.org");
        assert_eq!(smith.engagement_count, None);

        let lee = practitioner_by_id(&index, "pr-lee").unwrap();
        assert_eq!(lee.name, "Susan Lee, M.D. - Cardiology");
        assert_eq!(lee.qualifications, "MD");
        assert_eq!(lee.specialty, "Cardiology");
        assert_eq!(lee.phone, "");

        assert!(practitioner_by_id(&index, "nobody").is_none());
    }

    #[test]
    fn test_nameless_practitioner_gets_positional_name() {
        let bundle = json!([
            { "resourceType": "Practitioner", "id": "x", "name": [{ "given": ["Ada"] }] },
            { "resourceType": "Practitioner", "id": "y" },
            { "resourceType": "Practitioner", "id": "z", "name": [{ "text": "", "given": [], "use": "official" }] }
        ]);
        let index = index_of(&bundle);
        assert_eq!(practitioner_by_id(&index, "y").unwrap().name, "Provider 2");
        assert_eq!(practitioner_by_id(&index, "z").unwrap().name, "Provider 3");
        for provider in list_practitioners(&index) {
            assert!(!provider.name.is_empty());
        }
    }

    #[test]
    fn test_group_by_department() {
        let departments = group_by_department(&index_of(&sample_bundle()));
        let summary: Vec<_> = departments
            .iter()
            .map(|d| (d.id.as_str(), d.name.as_str(), d.doctors.len()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("cardiology", "Cardiology", 1),
                ("healthcare-providers", "Healthcare Providers", 1),
                ("nurse-practitioners", "Nurse Practitioners", 1),
                ("physicians", "Physicians", 1),
            ]
        );
    }

    #[test]
    fn test_qualification_group_labels() {
        assert_eq!(qualification_group("MD, PhD"), "Physicians");
        assert_eq!(qualification_group("PA-C"), "Physician Assistants");
        assert_eq!(qualification_group("FNP"), "Nurse Practitioners");
        assert_eq!(qualification_group("RN"), "Nurses");
        assert_eq!(qualification_group(""), "Healthcare Providers");
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("Physician Assistants"), "physician-assistants");
        assert_eq!(kebab_case("Social/Leisure"), "social-leisure");
    }
}
