//! Mapping rule definitions
//!
//! A platform mapping defines, per record kind, how each normalized target
//! field is pulled out of a raw platform payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::operations::Transform;
use crate::error::{RegistryError, RegistryResult};
use crate::models::RecordKind;

/// One candidate source for a target field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRule {
    /// Dot-separated path into the raw payload (`stats.followerCount`, `thumbnails.0.url`)
    pub source: String,

    /// Whether the field must resolve from some rule of its list
    #[serde(default)]
    pub required: bool,

    /// Value used when no rule of the list resolves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Coercion applied to the found value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

impl MappingRule {
    /// Create a rule reading `path`
    pub fn from_path(path: &str) -> Self {
        Self {
            source: path.to_string(),
            required: false,
            default: None,
            transform: None,
        }
    }

    /// Set the transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Set the default value
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Target field name → ordered candidate rules.
pub type FieldMapping = BTreeMap<String, Vec<MappingRule>>;

/// Both record mappings of one platform; the unit stored in mapping files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformMapping {
    /// Platform identifier (`tiktok`, `youtube`, ...)
    pub platform: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub profile: FieldMapping,

    #[serde(default)]
    pub video: FieldMapping,
}

impl PlatformMapping {
    /// Create an empty mapping for `platform`
    pub fn new(platform: &str) -> Self {
        Self {
            platform: platform.to_string(),
            description: String::new(),
            profile: FieldMapping::new(),
            video: FieldMapping::new(),
        }
    }

    /// Parse a mapping from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Mapping for one record kind
    pub fn get(&self, kind: RecordKind) -> &FieldMapping {
        match kind {
            RecordKind::Profile => &self.profile,
            RecordKind::Video => &self.video,
        }
    }

    /// Add a field to the profile mapping
    pub fn profile_field(mut self, field: &str, rules: Vec<MappingRule>) -> Self {
        self.profile.insert(field.to_string(), rules);
        self
    }

    /// Add a field to the video mapping
    pub fn video_field(mut self, field: &str, rules: Vec<MappingRule>) -> Self {
        self.video.insert(field.to_string(), rules);
        self
    }

    /// Reject mappings that cannot be evaluated.
    pub fn validate(&self) -> RegistryResult<()> {
        if self.platform.trim().is_empty() {
            return Err(RegistryError::InvalidMapping("platform id is empty".to_string()));
        }
        for kind in [RecordKind::Profile, RecordKind::Video] {
            for (field, rules) in self.get(kind) {
                if rules.is_empty() {
                    return Err(RegistryError::InvalidMapping(format!(
                        "{}.{}.{} has no rules",
                        self.platform, kind, field
                    )));
                }
                if let Some(rule) = rules.iter().find(|r| r.source.trim().is_empty()) {
                    return Err(RegistryError::InvalidMapping(format!(
                        "{}.{}.{} has a rule with an empty source path ({:?})",
                        self.platform, kind, field, rule
                    )));
                }
            }
        }
        Ok(())
    }

    /// All source paths referenced by one record mapping, deduplicated
    pub fn source_paths(&self, kind: RecordKind) -> Vec<String> {
        let mut paths: Vec<String> = self
            .get(kind)
            .values()
            .flat_map(|rules| rules.iter().map(|r| r.source.clone()))
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }
}
