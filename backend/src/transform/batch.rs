//! Batch transformation.
//!
//! Applies the record transformer to many payloads of one platform and keeps
//! per-item failures next to the successful records.
//!
//! # Example
//!
//! ```rust,ignore
//! use creator_analytics::{transform_videos, DEFAULT_TRANSFORMER};
//!
//! let batch = transform_videos(&DEFAULT_TRANSFORMER, "youtube", &payloads);
//! println!("{}", batch.summary());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::record::DataTransformer;
use super::result::TransformResult;
use crate::api::logs::{log_info_with, log_success, log_warning};
use crate::error::TransformError;
use crate::models::{ProfileData, RecordKind, VideoData};

/// A profile payload with the caller-supplied identity fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub username: String,
    pub profile_url: String,
    pub data: Value,
}

/// Result of transforming a batch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult<T> {
    /// Successfully normalized records, in input order
    pub records: Vec<T>,
    /// Items that failed, with their position in the input
    pub failures: Vec<BatchFailure>,
    /// Number of input items
    pub total: usize,
}

/// A failed batch item
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub index: usize,
    pub errors: Vec<TransformError>,
}

impl<T> BatchResult<T> {
    fn new(total: usize) -> Self {
        Self {
            records: Vec::new(),
            failures: Vec::new(),
            total,
        }
    }

    fn push(&mut self, index: usize, result: TransformResult<T>) {
        match result {
            TransformResult::Success(record) => self.records.push(record),
            TransformResult::Failure(errors) => self.failures.push(BatchFailure { index, errors }),
        }
    }

    /// Check if every item transformed
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        format!(
            "Transformed: {} of {} records, {} failed",
            self.records.len(),
            self.total,
            self.failures.len()
        )
    }
}

/// Transform a list of video payloads
pub fn transform_videos(
    transformer: &DataTransformer,
    platform: &str,
    items: &[Value],
) -> BatchResult<VideoData> {
    log_batch_start(platform, RecordKind::Video, items.len());
    let mut batch = BatchResult::new(items.len());
    for (index, raw) in items.iter().enumerate() {
        batch.push(index, transformer.transform_video(platform, raw));
    }
    log_batch_result(&batch);
    batch
}

/// Transform a list of profile payloads
pub fn transform_profiles(
    transformer: &DataTransformer,
    platform: &str,
    items: &[ProfileInput],
) -> BatchResult<ProfileData> {
    log_batch_start(platform, RecordKind::Profile, items.len());
    let mut batch = BatchResult::new(items.len());
    for (index, item) in items.iter().enumerate() {
        batch.push(
            index,
            transformer.transform_profile(platform, &item.data, &item.username, &item.profile_url),
        );
    }
    log_batch_result(&batch);
    batch
}

fn log_batch_start(platform: &str, kind: RecordKind, count: usize) {
    log_info_with(
        format!("⚙️  Transforming {} {} payloads...", count, kind),
        json!({ "platform": platform, "kind": kind.as_str() }),
    );
}

fn log_batch_result<T>(batch: &BatchResult<T>) {
    if batch.is_ok() {
        log_success(batch.summary());
        return;
    }
    log_warning(batch.summary());
    for failure in batch.failures.iter().take(3) {
        let fields: Vec<&str> = failure.errors.iter().map(|e| e.field.as_str()).collect();
        log_warning(format!("• item {}: {}", failure.index, fields.join(", ")));
    }
}
