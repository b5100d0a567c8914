//! Mapping Registry - Per-platform field mappings
//!
//! Starts from the built-in platforms and optionally loads extra mapping files
//! (`<anything>.json`, one [`PlatformMapping`] each) from a directory. A file
//! for an already registered platform replaces it.
//!
//! The registry is built once and only read afterwards.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::api::logs::{log_info, log_warning_with};
use crate::error::{RegistryError, RegistryResult};
use crate::mapping::{builtin_mappings, FieldMapping, PlatformMapping};
use crate::models::RecordKind;

/// Registry of platform mappings
#[derive(Debug, Clone, Default)]
pub struct MappingRegistry {
    /// Platform id (lowercase) -> mapping
    platforms: HashMap<String, PlatformMapping>,
}

impl MappingRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in platforms
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for mapping in builtin_mappings() {
            registry.insert(mapping);
        }
        registry
    }

    /// Built-in platforms plus every mapping file found in `dir`
    pub fn with_dir(dir: impl AsRef<Path>) -> RegistryResult<Self> {
        let mut registry = Self::builtin();
        registry.load_dir(dir.as_ref())?;
        Ok(registry)
    }

    /// Load all mapping files from a directory.
    ///
    /// A missing directory is not an error; an unreadable or invalid file is.
    pub fn load_dir(&mut self, dir: &Path) -> RegistryResult<usize> {
        if !dir.exists() {
            log_warning_with(
                "Mappings directory not found, using built-in platforms only",
                json!({ "dir": dir.display().to_string() }),
            );
            return Ok(0);
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "json"))
            .collect();
        paths.sort();

        for path in &paths {
            let mapping = Self::load_file(path)?;
            log_info(format!(
                "Loaded mapping for '{}' from {}",
                mapping.platform,
                path.display()
            ));
            self.insert(mapping);
        }

        Ok(paths.len())
    }

    /// Read and validate one mapping file
    pub fn load_file(path: &Path) -> RegistryResult<PlatformMapping> {
        let content = fs::read_to_string(path)?;
        let mapping =
            PlatformMapping::from_json(&content).map_err(|source| RegistryError::InvalidFile {
                path: path.display().to_string(),
                source,
            })?;
        mapping.validate()?;
        Ok(mapping)
    }

    /// Register a mapping, returning the one it replaced
    pub fn insert(&mut self, mut mapping: PlatformMapping) -> Option<PlatformMapping> {
        mapping.platform = normalize_platform(&mapping.platform);
        self.platforms.insert(mapping.platform.clone(), mapping)
    }

    /// Get a platform's mapping
    pub fn get(&self, platform: &str) -> Option<&PlatformMapping> {
        self.platforms.get(&normalize_platform(platform))
    }

    /// Get the field mapping for a platform and record kind.
    ///
    /// `None` when the platform is unknown or defines no fields for `kind`;
    /// callers decide how to report it.
    pub fn get_mapping(&self, platform: &str, kind: RecordKind) -> Option<&FieldMapping> {
        self.get(platform)
            .map(|m| m.get(kind))
            .filter(|fields| !fields.is_empty())
    }

    /// Registered platform ids, sorted
    pub fn platforms(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.platforms.keys().map(|k| k.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

fn normalize_platform(platform: &str) -> String {
    platform.trim().to_lowercase()
}
