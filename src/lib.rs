//! CareLens: patient-facing views over an exported FHIR record
//!
//! CareLens reads a flat bundle of FHIR resources and derives the views a
//! personal health app needs: provider lists and departments, reports with
//! resolved findings, synthetic appointments and treatment plans, and a
//! keyword-driven categorization of every provider.

pub mod api;
pub mod categorization;
pub mod config;
pub mod error;
pub mod fhir;
pub mod storage;
pub mod transform;

#[cfg(test)]
mod fixtures;

pub use categorization::{categorize, ProviderCategorizationConfig, ProviderCategory, ProviderProfile};
pub use error::HealthError;
pub use storage::BundleStore;
pub use transform::HealthRecords;
