//! Provider categorization.
//!
//! Assigns each provider exactly one [`ProviderCategory`] and a non-empty,
//! ordered list of subcategories by keyword matching over
//! `"{qualifications} {specialty} {name}"`. The first category with any
//! matching group wins; Medical is the fallback and always yields at least
//! `"Others"`. `sub_categories[0]` is the primary label.

pub mod rules;

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transform::practitioners::kebab_case;
use crate::transform::Provider;

use rules::{Haystack, CATEGORY_RULES, MEDICAL_RULES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderCategory {
    #[serde(rename = "Mental Health")]
    MentalHealth,
    Family,
    #[serde(rename = "Social/Leisure")]
    SocialLeisure,
    Faith,
    Services,
    Medical,
}

impl ProviderCategory {
    pub const ALL: [ProviderCategory; 6] = [
        ProviderCategory::MentalHealth,
        ProviderCategory::Family,
        ProviderCategory::SocialLeisure,
        ProviderCategory::Faith,
        ProviderCategory::Services,
        ProviderCategory::Medical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProviderCategory::MentalHealth => "Mental Health",
            ProviderCategory::Family => "Family",
            ProviderCategory::SocialLeisure => "Social/Leisure",
            ProviderCategory::Faith => "Faith",
            ProviderCategory::Services => "Services",
            ProviderCategory::Medical => "Medical",
        }
    }
}

impl fmt::Display for ProviderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown provider category: {0}")]
pub struct UnknownCategory(pub String);

/// Accepts the display label in any case, or its kebab form (`social-leisure`).
impl FromStr for ProviderCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = kebab_case(s);
        ProviderCategory::ALL
            .into_iter()
            .find(|category| kebab_case(category.label()) == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// The closed set of Medical subcategories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MedicalSubCategory {
    Pcp,
    AllSpecialists,
    SurgicalSpecialists,
    RegisteredNurses,
    NursePractitioners,
    PhysicianAssistants,
    Therapists,
    Others,
}

impl MedicalSubCategory {
    pub fn label(self) -> &'static str {
        match self {
            MedicalSubCategory::Pcp => "PCP",
            MedicalSubCategory::AllSpecialists => "All Specialists",
            MedicalSubCategory::SurgicalSpecialists => "Surgical Specialists",
            MedicalSubCategory::RegisteredNurses => "Registered Nurses",
            MedicalSubCategory::NursePractitioners => "Nurse Practitioners",
            MedicalSubCategory::PhysicianAssistants => "Physician Assistants",
            MedicalSubCategory::Therapists => "Physical/Occupational Therapists",
            MedicalSubCategory::Others => "Others",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCategorizationConfig {
    pub category: ProviderCategory,
    /// Same as `sub_categories[0]`.
    pub sub_category: String,
    pub sub_categories: Vec<String>,
}

impl ProviderCategorizationConfig {
    fn new(category: ProviderCategory, sub_categories: Vec<String>) -> Self {
        ProviderCategorizationConfig {
            category,
            sub_category: sub_categories.first().cloned().unwrap_or_default(),
            sub_categories,
        }
    }

    pub fn has_sub_category(&self, label: &str) -> bool {
        self.sub_categories.iter().any(|s| s == label)
    }
}

/// The free-text fields categorization looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderProfile {
    pub qualifications: Option<String>,
    pub specialty: Option<String>,
    pub name: Option<String>,
}

impl ProviderProfile {
    fn haystack(&self) -> Haystack {
        let field = |value: &Option<String>| value.as_deref().unwrap_or("").to_string();
        Haystack::new(&format!(
            "{} {} {}",
            field(&self.qualifications),
            field(&self.specialty),
            field(&self.name)
        ))
    }
}

impl From<&Provider> for ProviderProfile {
    fn from(provider: &Provider) -> Self {
        let field = |value: &str| Some(value.to_string()).filter(|v| !v.is_empty());
        ProviderProfile {
            qualifications: field(&provider.qualifications),
            specialty: field(&provider.specialty),
            name: field(&provider.name),
        }
    }
}

pub fn categorize(profile: &ProviderProfile) -> ProviderCategorizationConfig {
    let haystack = profile.haystack();

    for rules in CATEGORY_RULES.iter() {
        let matched: Vec<String> = rules
            .groups
            .iter()
            .filter(|group| haystack.matches_any(group.terms))
            .map(|group| group.label.to_string())
            .collect();
        if !matched.is_empty() {
            debug!("categorized {:?} as {} {:?}", profile.name, rules.category, matched);
            return ProviderCategorizationConfig::new(rules.category, matched);
        }
    }

    let labels = medical_sub_categories(&haystack)
        .into_iter()
        .map(|sub| sub.label().to_string())
        .collect();
    ProviderCategorizationConfig::new(ProviderCategory::Medical, labels)
}

fn medical_sub_categories(haystack: &Haystack) -> Vec<MedicalSubCategory> {
    let mut subs: Vec<MedicalSubCategory> = MEDICAL_RULES
        .iter()
        .filter(|rule| rule.fires(haystack))
        .map(|rule| rule.label)
        .collect();
    if subs.is_empty() {
        subs.push(MedicalSubCategory::Others);
    }
    subs
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedProvider {
    pub provider: Provider,
    pub config: ProviderCategorizationConfig,
}

pub fn categorize_providers(providers: &[Provider]) -> Vec<CategorizedProvider> {
    providers
        .iter()
        .map(|provider| CategorizedProvider {
            config: categorize(&provider.into()),
            provider: provider.clone(),
        })
        .collect()
}

/// Providers in `category`, optionally narrowed to those carrying
/// `sub_category` anywhere in their subcategory list. Order is preserved.
pub fn filter_by_category(
    providers: Vec<CategorizedProvider>,
    category: ProviderCategory,
    sub_category: Option<&str>,
) -> Vec<Provider> {
    providers
        .into_iter()
        .filter(|p| p.config.category == category)
        .filter(|p| sub_category.map_or(true, |sub| p.config.has_sub_category(sub)))
        .map(|p| p.provider)
        .collect()
}
