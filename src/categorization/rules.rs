//! Keyword rule tables for provider categorization.
//!
//! Order matters everywhere in this file: categories are tried top to
//! bottom and the first one with any matching group wins, and within
//! Medical the rule order decides which subcategory is primary.

use super::{MedicalSubCategory, ProviderCategory};

/// A keyword matched against the lowercased provider text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    /// Substring anywhere in the text ("cardio" hits "cardiology").
    Phrase(&'static str),
    /// Whole alphanumeric token only ("rn" hits "RN" but not "Arnold").
    Word(&'static str),
}

use Term::{Phrase, Word};

/// Lowercased `"{qualifications} {specialty} {name}"` plus its tokens.
#[derive(Debug, Clone)]
pub struct Haystack {
    text: String,
    words: Vec<String>,
}

impl Haystack {
    pub fn new(text: &str) -> Self {
        let text = text.to_lowercase();
        let words = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Haystack { text, words }
    }

    pub fn matches(&self, term: Term) -> bool {
        match term {
            Phrase(phrase) => self.text.contains(phrase),
            Word(word) => self.words.iter().any(|w| w == word),
        }
    }

    pub fn matches_any(&self, terms: &[Term]) -> bool {
        terms.iter().any(|term| self.matches(*term))
    }
}

#[derive(Debug)]
pub struct SubCategoryGroup {
    pub label: &'static str,
    pub terms: &'static [Term],
}

#[derive(Debug)]
pub struct CategoryRules {
    pub category: ProviderCategory,
    pub groups: &'static [SubCategoryGroup],
}

/// Non-medical categories in evaluation order. Medical is the fallback
/// and has its own gated rules below.
pub const CATEGORY_RULES: [CategoryRules; 5] = [
    CategoryRules {
        category: ProviderCategory::MentalHealth,
        groups: &[
            SubCategoryGroup { label: "Psychiatrist", terms: &[Phrase("psychiatr")] },
            SubCategoryGroup { label: "Psychologist", terms: &[Phrase("psycholog"), Word("psyd")] },
            SubCategoryGroup {
                label: "MFT",
                terms: &[Word("mft"), Word("lmft"), Phrase("marriage and family"), Phrase("family therapist")],
            },
            SubCategoryGroup {
                label: "LCSW",
                terms: &[Word("lcsw"), Word("lsw"), Word("msw"), Phrase("clinical social work"), Phrase("social worker")],
            },
            SubCategoryGroup { label: "AA", terms: &[Word("aa"), Phrase("alcoholics anonymous")] },
            SubCategoryGroup {
                label: "Substance Abuse Counselors",
                terms: &[
                    Phrase("substance abuse"),
                    Phrase("addiction"),
                    Word("cadc"),
                    Word("ladc"),
                    Phrase("drug counsel"),
                    Phrase("recovery coach"),
                ],
            },
        ],
    },
    CategoryRules {
        category: ProviderCategory::Family,
        groups: &[
            SubCategoryGroup {
                label: "Spouse",
                terms: &[Word("spouse"), Word("husband"), Word("wife"), Word("partner")],
            },
            SubCategoryGroup {
                label: "Children",
                terms: &[Word("son"), Word("daughter"), Word("child"), Word("children"), Word("kids")],
            },
            SubCategoryGroup {
                label: "Siblings",
                terms: &[Word("brother"), Word("sister"), Word("sibling"), Word("siblings")],
            },
            SubCategoryGroup {
                label: "Parents",
                terms: &[Word("mother"), Word("father"), Word("mom"), Word("dad"), Word("parent"), Word("parents")],
            },
            SubCategoryGroup { label: "Cousins", terms: &[Word("cousin"), Word("cousins")] },
            SubCategoryGroup { label: "Nephews", terms: &[Word("nephew"), Word("nephews")] },
            SubCategoryGroup { label: "Niece", terms: &[Word("niece"), Word("nieces")] },
        ],
    },
    CategoryRules {
        category: ProviderCategory::SocialLeisure,
        groups: &[
            SubCategoryGroup { label: "Friends", terms: &[Word("friend"), Word("friends")] },
            SubCategoryGroup { label: "Neighbors", terms: &[Phrase("neighbor"), Phrase("neighbour")] },
            SubCategoryGroup {
                label: "Coworkers",
                terms: &[Phrase("coworker"), Phrase("co-worker"), Phrase("colleague")],
            },
            SubCategoryGroup {
                label: "Coaches",
                terms: &[Word("coach"), Phrase("personal trainer")],
            },
            SubCategoryGroup {
                label: "Clubs & Groups",
                terms: &[Word("club"), Phrase("book club"), Phrase("hobby"), Phrase("support group")],
            },
            SubCategoryGroup {
                label: "Sports & Fitness",
                terms: &[Word("gym"), Phrase("yoga"), Phrase("fitness"), Word("sports")],
            },
            SubCategoryGroup {
                label: "Pets",
                terms: &[Word("pet"), Word("pets"), Phrase("dog walker"), Phrase("pet sitter")],
            },
        ],
    },
    CategoryRules {
        category: ProviderCategory::Faith,
        groups: &[
            SubCategoryGroup {
                label: "Pastor",
                terms: &[Phrase("pastor"), Phrase("minister"), Phrase("reverend"), Word("rev")],
            },
            SubCategoryGroup { label: "Priest", terms: &[Phrase("priest"), Word("fr"), Phrase("deacon")] },
            SubCategoryGroup { label: "Rabbi", terms: &[Phrase("rabbi")] },
            SubCategoryGroup { label: "Imam", terms: &[Word("imam")] },
            SubCategoryGroup {
                label: "Chaplain",
                terms: &[Phrase("chaplain"), Phrase("spiritual advisor"), Phrase("spiritual care")],
            },
        ],
    },
    CategoryRules {
        category: ProviderCategory::Services,
        groups: &[
            SubCategoryGroup {
                label: "Legal",
                terms: &[Phrase("attorney"), Phrase("lawyer"), Word("legal"), Phrase("paralegal")],
            },
            SubCategoryGroup {
                label: "Financial",
                terms: &[Phrase("financial"), Phrase("accountant"), Word("cpa"), Phrase("tax preparer")],
            },
            SubCategoryGroup { label: "Insurance", terms: &[Phrase("insurance")] },
            SubCategoryGroup {
                label: "Transportation",
                terms: &[Phrase("transport"), Word("driver"), Word("taxi"), Word("ride")],
            },
            SubCategoryGroup {
                label: "Home Care",
                terms: &[Phrase("home care"), Phrase("caregiver"), Phrase("home health aide"), Phrase("housekeep")],
            },
            SubCategoryGroup {
                label: "Meal Delivery",
                terms: &[Phrase("meal"), Phrase("food delivery"), Phrase("grocer")],
            },
            SubCategoryGroup {
                label: "Case Management",
                terms: &[Phrase("case manage"), Phrase("care coordinator"), Phrase("social services"), Phrase("navigator")],
            },
        ],
    },
];

/// Keyword families used by the medical rules, both as triggers and as guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordSet {
    NursePractitioner,
    RegisteredNurse,
    PhysicianAssistant,
    Therapist,
    Surgical,
    Specialist,
    PrimaryCare,
}

const SURGICAL_TERMS: &[Term] = &[Phrase("surgeon"), Phrase("surgery"), Phrase("surgical")];

impl KeywordSet {
    pub fn terms(self) -> &'static [Term] {
        match self {
            KeywordSet::NursePractitioner => &[
                Word("np"),
                Word("fnp"),
                Word("aprn"),
                Word("arnp"),
                Word("crnp"),
                Word("cnp"),
                Word("dnp"),
                Phrase("nurse practitioner"),
            ],
            KeywordSet::RegisteredNurse => &[
                Word("rn"),
                Word("bsn"),
                Word("lpn"),
                Word("lvn"),
                Phrase("registered nurse"),
                Phrase("nurse"),
            ],
            KeywordSet::PhysicianAssistant => &[
                Word("pa"),
                Phrase("physician assistant"),
                Phrase("physician associate"),
            ],
            KeywordSet::Therapist => &[
                Word("pt"),
                Word("dpt"),
                Word("ot"),
                Word("otr"),
                Phrase("physical therap"),
                Phrase("occupational therap"),
                Phrase("physiotherap"),
            ],
            KeywordSet::Surgical => SURGICAL_TERMS,
            KeywordSet::Specialist => &[
                Phrase("cardio"),
                Phrase("neuro"),
                Phrase("ortho"),
                Phrase("dermat"),
                Phrase("oncolog"),
                Phrase("gastro"),
                Phrase("endocrin"),
                Phrase("pulmon"),
                Phrase("nephro"),
                Phrase("urolog"),
                Phrase("rheumat"),
                Phrase("ophthalm"),
                Phrase("otolaryng"),
                Word("ent"),
                Phrase("allerg"),
                Phrase("hematol"),
                Phrase("radiolog"),
                Phrase("anesthes"),
                Phrase("patholog"),
                Phrase("obstet"),
                Phrase("gynec"),
                Phrase("podiatr"),
                Phrase("infectious disease"),
                Phrase("specialist"),
                Phrase("surgeon"),
                Phrase("surgery"),
                Phrase("surgical"),
            ],
            KeywordSet::PrimaryCare => &[
                Phrase("primary care"),
                Phrase("family medicine"),
                Phrase("family practice"),
                Phrase("internal medicine"),
                Phrase("internist"),
                Phrase("general practi"),
                Phrase("general medicine"),
                Phrase("pediatric"),
                Word("gp"),
                Word("pcp"),
            ],
        }
    }
}

/// A medical subcategory rule: fires when `requires` matches and none of
/// the `unless` guards do.
#[derive(Debug)]
pub struct MedicalRule {
    pub label: MedicalSubCategory,
    pub requires: KeywordSet,
    pub unless: &'static [KeywordSet],
}

/// Evaluation order of the medical subcategories. The first four are
/// mutually exclusive through their guards; the rest apply independently.
pub const MEDICAL_RULES: [MedicalRule; 7] = [
    MedicalRule {
        label: MedicalSubCategory::NursePractitioners,
        requires: KeywordSet::NursePractitioner,
        unless: &[KeywordSet::PhysicianAssistant, KeywordSet::Therapist],
    },
    MedicalRule {
        label: MedicalSubCategory::RegisteredNurses,
        requires: KeywordSet::RegisteredNurse,
        unless: &[KeywordSet::NursePractitioner, KeywordSet::PhysicianAssistant, KeywordSet::Therapist],
    },
    MedicalRule {
        label: MedicalSubCategory::PhysicianAssistants,
        requires: KeywordSet::PhysicianAssistant,
        unless: &[KeywordSet::RegisteredNurse, KeywordSet::NursePractitioner, KeywordSet::Therapist],
    },
    MedicalRule {
        label: MedicalSubCategory::Therapists,
        requires: KeywordSet::Therapist,
        unless: &[KeywordSet::RegisteredNurse, KeywordSet::NursePractitioner, KeywordSet::PhysicianAssistant],
    },
    MedicalRule {
        label: MedicalSubCategory::SurgicalSpecialists,
        requires: KeywordSet::Surgical,
        unless: &[],
    },
    MedicalRule {
        label: MedicalSubCategory::AllSpecialists,
        requires: KeywordSet::Specialist,
        unless: &[],
    },
    MedicalRule {
        label: MedicalSubCategory::Pcp,
        requires: KeywordSet::PrimaryCare,
        unless: &[],
    },
];

impl MedicalRule {
    pub fn fires(&self, haystack: &Haystack) -> bool {
        haystack.matches_any(self.requires.terms())
            && !self.unless.iter().any(|guard| haystack.matches_any(guard.terms()))
    }
}
