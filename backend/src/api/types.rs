//! REST API types.
//!
//! Request bodies carry already-decoded platform payloads; responses wrap the
//! transformer's result with a request id.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::transform::{BatchResult, ProfileInput};

/// Body of `POST /api/transform/profile`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub platform: String,
    pub username: String,
    pub profile_url: String,
    /// Raw platform payload
    pub data: Value,
}

/// Body of `POST /api/transform/video`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    pub platform: String,
    /// Raw platform payload
    pub data: Value,
}

/// Body of `POST /api/transform/batch`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BatchRequest {
    Profile {
        platform: String,
        items: Vec<ProfileInput>,
    },
    Video {
        platform: String,
        items: Vec<Value>,
    },
}

/// Response envelope: request id plus the flattened result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse<T> {
    /// Unique request identifier
    pub request_id: String,
    #[serde(flatten)]
    pub result: T,
}

impl<T> TransformResponse<T> {
    pub fn new(result: T) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            result,
        }
    }
}

/// Batch response body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse<T> {
    pub status: String,
    pub summary: String,
    #[serde(flatten)]
    pub batch: BatchResult<T>,
}

impl<T> From<BatchResult<T>> for BatchResponse<T> {
    fn from(batch: BatchResult<T>) -> Self {
        let status = if batch.is_ok() {
            "ok"
        } else if batch.records.is_empty() {
            "error"
        } else {
            "partial"
        };
        Self {
            status: status.to_string(),
            summary: batch.summary(),
            batch,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "requestId": Uuid::new_v4().to_string(),
        "success": false,
        "error": error,
    })
}
