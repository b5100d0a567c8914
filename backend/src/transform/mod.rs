//! Transformation module.
//!
//! This module turns raw platform payloads into normalized records:
//! - Coerce: pure coercion helpers used by rule transforms
//! - Extractor: per-field rule evaluation
//! - Record: profile/video assembly and validation
//! - Batch: many payloads at once

pub mod batch;
pub mod coerce;
pub mod extractor;
pub mod record;
pub mod result;

pub use batch::{transform_profiles, transform_videos, BatchFailure, BatchResult, ProfileInput};
pub use extractor::{extract_field, resolve_path, Extraction};
pub use record::{transform_profile, transform_video, DataTransformer, DEFAULT_TRANSFORMER};
pub use result::TransformResult;
