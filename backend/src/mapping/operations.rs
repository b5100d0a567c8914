//! Transform functions available to mapping rules.
//!
//! Transforms are a closed set of named coercions so that mappings stay plain
//! data and can be stored as JSON.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoercionError, CoercionResult};
use crate::transform::coerce;
use crate::transform::extractor::resolve_path;

/// Named template placeholder: `{author.uniqueId}`. The bare `{}` is not one.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("valid placeholder regex"));

/// All available transforms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transform {
    /// Non-negative integer, digits extracted from strings
    ToNumber,

    /// Truthiness coercion
    ToBoolean,

    /// Scalar rendered as a string
    ToString,

    /// Unix or date string to ISO-8601
    ParseTimestamp,

    /// `PT#H#M#S` string to seconds
    ParseDuration,

    /// Build a string (usually a URL) by substituting the value for `{}` and
    /// other payload values for `{path}`
    Template { template: String },

    /// Hashtags found in free text
    ExtractHashtags,

    /// Array of strings, non-strings dropped
    StringList,

    /// Array of objects to the list of one string key
    PluckList { key: String },

    /// Remove a leading prefix when present
    StripPrefix { prefix: String },
}

impl Transform {
    /// Apply this transform to a found value.
    ///
    /// Errors mean the value cannot be handled by this transform; the caller
    /// moves on to the next rule.
    pub fn apply(&self, value: &Value) -> CoercionResult<Value> {
        match self {
            Transform::ToNumber => Ok(Value::from(coerce::to_number(value))),
            Transform::ToBoolean => Ok(Value::Bool(coerce::to_boolean(value))),
            Transform::ToString => Self::scalar_string(value).map(Value::String),
            Transform::ParseTimestamp => Ok(Value::String(coerce::parse_timestamp(value))),
            Transform::ParseDuration => {
                let s = Self::expect_str(value)?;
                Ok(Value::from(coerce::parse_duration(s)))
            }
            Transform::Template { template } => {
                let s = Self::scalar_string(value)?;
                Ok(Value::String(coerce::fill_template(template, &s)))
            }
            Transform::ExtractHashtags => {
                let s = Self::expect_str(value)?;
                Ok(Self::string_array(coerce::extract_hashtags(s)))
            }
            Transform::StringList => {
                let items = Self::expect_array(value)?;
                Ok(Self::string_array(coerce::string_tags(items)))
            }
            Transform::PluckList { key } => {
                let items = Self::expect_array(value)?;
                Ok(Self::string_array(coerce::pluck_tags(items, key)))
            }
            Transform::StripPrefix { prefix } => {
                let s = Self::expect_str(value)?;
                Ok(Value::String(s.strip_prefix(prefix.as_str()).unwrap_or(s).to_string()))
            }
        }
    }

    /// Apply with access to the whole payload.
    ///
    /// Only templates read it, to fill their named placeholders.
    pub fn apply_in(&self, value: &Value, payload: &Value) -> CoercionResult<Value> {
        let Transform::Template { template } = self else {
            return self.apply(value);
        };
        let mut filled = coerce::fill_template(template, &Self::scalar_string(value)?);
        for path in self.context_paths() {
            let part = resolve_path(payload, path).unwrap_or(&Value::Null);
            filled = filled.replace(&format!("{{{}}}", path), &Self::scalar_string(part)?);
        }
        Ok(Value::String(filled))
    }

    /// Payload paths a template names besides the rule's own source.
    pub fn context_paths(&self) -> Vec<&str> {
        match self {
            Transform::Template { template } => PLACEHOLDER_RE
                .captures_iter(template)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Type name reported when this transform fails.
    pub fn expected_type(&self) -> &'static str {
        match self {
            Transform::ToNumber => "number",
            Transform::ToBoolean => "boolean",
            Transform::ToString | Transform::StripPrefix { .. } => "string",
            Transform::ParseTimestamp => "timestamp",
            Transform::ParseDuration => "duration",
            Transform::Template { .. } => "url",
            Transform::ExtractHashtags | Transform::StringList | Transform::PluckList { .. } => {
                "array"
            }
        }
    }

    fn scalar_string(value: &Value) -> CoercionResult<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(CoercionError::wrong_type("string or number", other)),
        }
    }

    fn expect_str(value: &Value) -> CoercionResult<&str> {
        value
            .as_str()
            .ok_or_else(|| CoercionError::wrong_type("string", value))
    }

    fn expect_array(value: &Value) -> CoercionResult<&[Value]> {
        value
            .as_array()
            .map(|a| a.as_slice())
            .ok_or_else(|| CoercionError::wrong_type("array", value))
    }

    fn string_array(items: Vec<String>) -> Value {
        Value::Array(items.into_iter().map(Value::String).collect())
    }
}

/// Get a description of all available transforms
pub fn transforms_description() -> String {
    r#"Available rule transforms:

| Transform | Description | Parameters |
|-----------|-------------|------------|
| to_number | Non-negative integer (digits only for strings) | - |
| to_boolean | Truthiness | - |
| to_string | Scalar to string | - |
| parse_timestamp | Unix seconds/millis or date string to ISO-8601 | - |
| parse_duration | PT#H#M#S to seconds | - |
| template | Substitute value for {}, other payload paths for {a.b} | template: string |
| extract_hashtags | Hashtags from text | - |
| string_list | Array of strings | - |
| pluck_list | Array of objects to list of one key | key: string |
| strip_prefix | Remove leading prefix | prefix: string |

Example rule in JSON:
{"source": "stats.playCount", "required": true, "transform": {"type": "to_number"}}"#
        .to_string()
}
