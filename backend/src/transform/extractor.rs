//! Value extractor
//!
//! Resolves one target field from a raw payload by trying its rules in order.

use serde_json::Value;

use crate::error::TransformError;
use crate::mapping::MappingRule;

/// Outcome of extracting one field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Resolved value, `None` when the field stays absent
    pub value: Option<Value>,
    /// Errors recorded while trying rules
    pub errors: Vec<TransformError>,
}

/// Resolve a dot-separated path.
///
/// Each segment descends into an object key, or into an array when the
/// segment is an index. Any other value, or a missing key, ends the lookup.
pub fn resolve_path<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(payload, |current, key| match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// `null` and `""` count as not found; `0` and `false` are values.
pub fn is_found(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn is_scalar_found(value: &Value) -> bool {
    is_found(value) && !value.is_array() && !value.is_object()
}

/// Extract one field.
///
/// The first rule whose source resolves and whose transform succeeds wins.
/// A failing transform records an error and the next rule is tried. A rule
/// whose template names a payload path that does not resolve to a scalar is
/// skipped like an unresolved source. When no
/// rule produces a value, a `required` rule anywhere in the list records a
/// missing-field error, and the first rule default (if any) is still returned
/// alongside that error.
pub fn extract_field(payload: &Value, field: &str, rules: &[MappingRule]) -> Extraction {
    let mut extraction = Extraction::default();

    for rule in rules {
        let raw = match resolve_path(payload, &rule.source) {
            Some(v) if is_found(v) => v,
            _ => continue,
        };

        let Some(transform) = &rule.transform else {
            extraction.value = Some(raw.clone());
            return extraction;
        };

        let context_found = transform
            .context_paths()
            .into_iter()
            .all(|path| resolve_path(payload, path).is_some_and(is_scalar_found));
        if !context_found {
            continue;
        }

        match transform.apply_in(raw, payload) {
            Ok(value) => {
                extraction.value = Some(value);
                return extraction;
            }
            Err(err) => extraction.errors.push(TransformError::transform_failed(
                field,
                transform.expected_type(),
                raw,
                &err,
            )),
        }
    }

    if rules.iter().any(|r| r.required) {
        extraction.errors.push(TransformError::required_missing(field));
    }
    extraction.value = rules.iter().find_map(|r| r.default.clone());

    extraction
}
