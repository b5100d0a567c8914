//! JSON Schema validation for normalized records.
//!
//! Checks records that were produced elsewhere (or stored and reloaded)
//! against the profile and video shapes, using JSON Schema Draft 7.
//!
//! # Embedded Schemas
//!
//! Schemas are embedded at compile time from the `schemas/` directory:
//! - `profile.json`
//! - `video.json`
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use creator_analytics::{validate_record, RecordKind};
//!
//! let errors = validate_record(RecordKind::Profile, &json!({ "platform": "tiktok" }));
//! assert!(errors.is_err());
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::models::RecordKind;

static PROFILE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/profile.json"))
        .expect("Invalid embedded profile schema")
});

static VIDEO_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/video.json"))
        .expect("Invalid embedded video schema")
});

/// Validate a JSON value against a JSON schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with every error message otherwise
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick check returning only true/false.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Embedded schema for a record kind.
pub fn schema_for(kind: RecordKind) -> &'static Value {
    match kind {
        RecordKind::Profile => &PROFILE_SCHEMA,
        RecordKind::Video => &VIDEO_SCHEMA,
    }
}

/// Validate a normalized record of the given kind.
pub fn validate_record(kind: RecordKind, data: &Value) -> Result<(), Vec<String>> {
    validate(schema_for(kind), data)
}

/// Quick check of a normalized record of the given kind.
pub fn is_valid_record(kind: RecordKind, data: &Value) -> bool {
    is_valid(schema_for(kind), data)
}
