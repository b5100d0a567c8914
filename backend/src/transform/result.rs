//! Transform outcome type.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::TransformError;

/// Outcome of one transform call: a complete record or every error found.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformResult<T> {
    Success(T),
    Failure(Vec<TransformError>),
}

impl<T> TransformResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    /// Errors of a failed transform, empty on success
    pub fn errors(&self) -> &[TransformError] {
        match self {
            Self::Success(_) => &[],
            Self::Failure(errors) => errors,
        }
    }

    pub fn into_result(self) -> Result<T, Vec<TransformError>> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(errors) => Err(errors),
        }
    }
}

/// Serializes as `{ "success": true, "data": ... }` or
/// `{ "success": false, "errors": [...] }`.
impl<T: Serialize> Serialize for TransformResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TransformResult", 2)?;
        match self {
            Self::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure(errors) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("errors", errors)?;
            }
        }
        state.end()
    }
}
