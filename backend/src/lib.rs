//! # Creator Analytics - Social platform payload normalization
//!
//! Turns raw TikTok, Instagram and YouTube API payloads into two normalized
//! record shapes, [`ProfileData`] and [`VideoData`], driven by declarative
//! per-platform field mappings.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Raw payload │────▶│  Registry   │────▶│  Extractor  │────▶│  Normalized │
//! │   (JSON)    │     │ (mappings)  │     │  (rules)    │     │   record    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use creator_analytics::transform_video;
//!
//! let result = transform_video("youtube", &payload);
//! match result.into_result() {
//!     Ok(video) => println!("{}", video.title),
//!     Err(errors) => eprintln!("{} error(s)", errors.len()),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Normalized records and record kinds
//! - [`mapping`] - Mapping rules, transforms and built-in platforms
//! - [`registry`] - Platform lookup and mapping files
//! - [`transform`] - Extraction, record assembly and batches
//! - [`validation`] - JSON Schema validation of normalized records
//! - [`api`] - HTTP API server and log broadcasting

// Core modules
pub mod error;
pub mod models;

// Mappings
pub mod mapping;
pub mod registry;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CoercionError, ErrorKind, RegistryError, ServerError, TransformError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{ProfileData, RecordKind, VideoData, BUILTIN_PLATFORMS};

// =============================================================================
// Re-exports - Mappings
// =============================================================================

pub use mapping::{
    builtin_mappings, transforms_description, FieldMapping, MappingRule, PlatformMapping,
    Transform,
};
pub use registry::MappingRegistry;

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    extract_field, resolve_path, transform_profile, transform_profiles, transform_video,
    transform_videos, BatchFailure, BatchResult, DataTransformer, Extraction, ProfileInput,
    TransformResult, DEFAULT_TRANSFORMER,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{is_valid, is_valid_record, validate, validate_record};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{
    error_response, BatchRequest, BatchResponse, ProfileRequest, TransformResponse, VideoRequest,
};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
