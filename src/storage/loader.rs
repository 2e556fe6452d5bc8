use std::path::Path;

use log::{debug, info, warn};
use serde_json::Value;

use super::StoreError;
use crate::fhir::Resource;

/// Reads the bundle file and decodes it with [`load_resources_from_slice`].
///
/// A missing or unreadable file is an error; malformed content is not.
pub async fn load_resources(path: impl AsRef<Path>) -> Result<Vec<Resource>, StoreError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;

    let resources = load_resources_from_slice(&bytes);
    info!("Loaded {} resources from {}", resources.len(), path.display());
    Ok(resources)
}

pub fn load_resources_from_slice(bytes: &[u8]) -> Vec<Resource> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(payload) => decode_payload(payload),
        Err(e) => {
            warn!("Bundle is not valid JSON, treating as empty: {}", e);
            Vec::new()
        }
    }
}

pub fn load_resources_from_str(json: &str) -> Vec<Resource> {
    load_resources_from_slice(json.as_bytes())
}

/// Accepts a top-level array, a FHIR `Bundle`, or a single resource object.
fn decode_payload(payload: Value) -> Vec<Resource> {
    let entries = match payload {
        Value::Array(items) => items,
        Value::Object(object) if object.get("resourceType").and_then(Value::as_str) == Some("Bundle") => {
            bundle_entries(Value::Object(object))
        }
        Value::Object(object) => vec![Value::Object(object)],
        other => {
            warn!("Bundle payload must be an array or object, got {}", kind_of(&other));
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(position, entry)| match serde_json::from_value::<Resource>(entry) {
            Ok(Resource::Other) => {
                debug!("Ignoring unsupported resource at position {}", position);
                None
            }
            Ok(resource) => Some(resource),
            Err(e) => {
                warn!("Skipping malformed resource at position {}: {}", position, e);
                None
            }
        })
        .collect()
}

fn bundle_entries(bundle: Value) -> Vec<Value> {
    match bundle {
        Value::Object(mut object) => match object.remove("entry") {
            Some(Value::Array(entries)) => entries
                .into_iter()
                .filter_map(|mut entry| entry.get_mut("resource").map(Value::take))
                .collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_payload() {
        let payload = json!([
            { "resourceType": "Practitioner", "id": "pr-1" },
            { "resourceType": "Observation", "id": "obs-1" }
        ]);
        let resources = load_resources_from_str(&payload.to_string());
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[1].resource_type(), "Observation");
    }

    #[test]
    fn test_single_object_is_wrapped() {
        let resources = load_resources_from_str(r#"{"resourceType":"Patient","id":"p1"}"#);
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].id(), Some("p1"));
    }

    #[test]
    fn test_bundle_entries_are_flattened() {
        let payload = json!({
            "resourceType": "Bundle",
            "type": "collection",
            "entry": [
                { "resource": { "resourceType": "Patient", "id": "p1" } },
                { "fullUrl": "urn:uuid:no-resource" },
                { "resource": { "resourceType": "Encounter", "id": "e1" } }
            ]
        });
        let resources = load_resources_from_str(&payload.to_string());
        let types: Vec<_> = resources.iter().map(Resource::resource_type).collect();
        assert_eq!(types, vec!["Patient", "Encounter"]);
    }

    #[test]
    fn test_malformed_input_is_empty() {
        assert!(load_resources_from_str("{not json").is_empty());
        assert!(load_resources_from_str("42").is_empty());
        assert!(load_resources_from_str("").is_empty());
    }

    #[test]
    fn test_bad_entries_are_skipped_individually() {
        let payload = json!([
            { "resourceType": "Practitioner" },
            { "resourceType": "Practitioner", "id": "pr-2", "name": "not-a-list" },
            { "resourceType": "Condition", "id": "c1" },
            { "resourceType": "Practitioner", "id": "pr-3" }
        ]);
        let resources = load_resources_from_str(&payload.to_string());
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].id(), Some("pr-3"));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let result = load_resources("/definitely/not/here.json").await;
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }
}
