//! Resolution of `"<ResourceType>/<id>"` reference strings.

use std::collections::HashMap;

use crate::fhir::datatypes::Reference;

/// Returns the id segment of a `"Type/id"` reference.
///
/// Only the second `/`-separated segment is taken, so `"Practitioner/abc"`
/// yields `"abc"`. A reference without a separator or with an empty id
/// segment yields `None`.
pub fn reference_id(reference: &str) -> Option<&str> {
    reference.split('/').nth(1).filter(|id| !id.is_empty())
}

/// Returns the resource type segment of a `"Type/id"` reference.
pub fn reference_type(reference: &str) -> Option<&str> {
    let mut parts = reference.split('/');
    let kind = parts.next()?;
    parts.next().map(|_| kind)
}

/// Id segment of an optional [`Reference`] element.
pub fn target_id(reference: Option<&Reference>) -> Option<&str> {
    reference
        .and_then(|r| r.reference.as_deref())
        .and_then(reference_id)
}

/// Looks a reference up in a type-indexed map. Misses are `None`, never a panic.
pub fn resolve<'a, T>(index: &'a HashMap<String, T>, reference: Option<&Reference>) -> Option<&'a T> {
    target_id(reference).and_then(|id| index.get(id))
}
