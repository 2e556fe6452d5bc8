//! FHIR complex datatypes shared by the supported resources.
//!
//! Every field is optional: exports from patient portals are routinely
//! missing pieces, and absent data falls through to the next default.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Coding {
    pub system: Option<String>,
    pub code: Option<String>,
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeableConcept {
    pub coding: Vec<Coding>,
    pub text: Option<String>,
}

impl CodeableConcept {
    /// Human label: `text`, then the first coding's display.
    pub fn label(&self) -> Option<&str> {
        non_empty(self.text.as_deref())
            .or_else(|| self.coding.first().and_then(|c| non_empty(c.display.as_deref())))
    }

    /// Label used for keyword bucketing: first coding's display or code, then `text`.
    pub fn first_coding_or_text(&self) -> Option<&str> {
        self.coding
            .first()
            .and_then(|c| non_empty(c.display.as_deref()).or_else(|| non_empty(c.code.as_deref())))
            .or_else(|| non_empty(self.text.as_deref()))
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.coding.iter().any(|c| c.code.as_deref() == Some(code))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reference {
    pub reference: Option<String>,
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quantity {
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub system: Option<String>,
    pub code: Option<String>,
}

impl Quantity {
    /// Unit as written by the source system, falling back to the UCUM code.
    pub fn unit_label(&self) -> Option<&str> {
        non_empty(self.unit.as_deref()).or_else(|| non_empty(self.code.as_deref()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HumanName {
    #[serde(rename = "use")]
    pub name_use: Option<String>,
    pub text: Option<String>,
    pub family: Option<String>,
    pub given: Vec<String>,
    pub prefix: Vec<String>,
    pub suffix: Vec<String>,
}

impl HumanName {
    /// `given` names followed by `family`, single-space separated.
    pub fn given_family(&self) -> String {
        self.given
            .iter()
            .map(String::as_str)
            .chain(self.family.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `text` if present, otherwise the given+family join. May be empty.
    pub fn display(&self) -> String {
        match non_empty(self.text.as_deref()) {
            Some(text) => text.trim().to_string(),
            None => self.given_family(),
        }
    }
}

/// Picks the `official` name entry, else the first one.
pub fn preferred_name(names: &[HumanName]) -> Option<&HumanName> {
    names
        .iter()
        .find(|n| n.name_use.as_deref() == Some("official"))
        .or_else(|| names.first())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactPoint {
    pub system: Option<String>,
    pub value: Option<String>,
    #[serde(rename = "use")]
    pub contact_use: Option<String>,
}

/// Value of the first contact point with the given `system`.
pub fn first_telecom(telecom: &[ContactPoint], system: &str) -> Option<String> {
    telecom
        .iter()
        .filter(|t| t.system.as_deref() == Some(system))
        .find_map(|t| non_empty(t.value.as_deref()).map(str::to_string))
}

/// Like [`first_telecom`], but a `home` entry wins over earlier ones.
pub fn home_telecom(telecom: &[ContactPoint], system: &str) -> Option<String> {
    telecom
        .iter()
        .filter(|t| t.system.as_deref() == Some(system) && t.contact_use.as_deref() == Some("home"))
        .find_map(|t| non_empty(t.value.as_deref()).map(str::to_string))
        .or_else(|| first_telecom(telecom, system))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    #[serde(rename = "use")]
    pub address_use: Option<String>,
    pub text: Option<String>,
    pub line: Vec<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl Address {
    /// One-line rendering: `text`, else "line, city, state postal".
    pub fn one_line(&self) -> String {
        if let Some(text) = non_empty(self.text.as_deref()) {
            return text.to_string();
        }
        let state_zip = [self.state.as_deref(), self.postal_code.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        self.line
            .iter()
            .map(String::as_str)
            .chain(self.city.as_deref())
            .chain(Some(state_zip.as_str()))
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Identifier {
    #[serde(rename = "use")]
    pub identifier_use: Option<String>,
    #[serde(rename = "type")]
    pub identifier_type: Option<CodeableConcept>,
    pub system: Option<String>,
    pub value: Option<String>,
}

/// Value of the first identifier whose type carries `code` (e.g. `FILL`, `PLAC`).
pub fn identifier_by_type(identifiers: &[Identifier], code: &str) -> Option<String> {
    identifiers
        .iter()
        .filter(|i| i.identifier_type.as_ref().map_or(false, |t| t.has_code(code)))
        .find_map(|i| non_empty(i.value.as_deref()).map(str::to_string))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attachment {
    pub content_type: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub creation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Period {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Annotation {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingRepeat {
    pub frequency: Option<u32>,
    pub period: Option<f64>,
    pub period_unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timing {
    pub repeat: Option<TimingRepeat>,
    pub code: Option<CodeableConcept>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DoseAndRate {
    pub dose_quantity: Option<Quantity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dosage {
    pub text: Option<String>,
    pub timing: Option<Timing>,
    pub route: Option<CodeableConcept>,
    pub dose_and_rate: Vec<DoseAndRate>,
    pub as_needed_boolean: Option<bool>,
}

/// Treats `None`, `""` and whitespace-only strings alike.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
