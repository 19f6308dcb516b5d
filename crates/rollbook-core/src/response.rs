//! The response envelope used by list, get-one, create and import responses.
//!
//! ```json
//! { "status": "success", "message": "Data Found", "error": false, "data": [...] }
//! { "status": "fail", "message": "...", "error": { "kind": "conflict", "message": "..." }, "data": false }
//! ```

use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Fail,
}

#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "T: Serialize"))]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub message: String,
    /// `false` on success, an error detail object on failure.
    pub error: Value,
    /// The payload, or `false` when there is none.
    #[serde(serialize_with = "data_or_false")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            error: Value::Bool(false),
            data: Some(data),
        }
    }

    pub fn fail(message: impl Into<String>, kind: &str) -> Self {
        let message = message.into();
        Self {
            status: ResponseStatus::Fail,
            error: json!({ "kind": kind, "message": message }),
            message,
            data: None,
        }
    }
}

fn data_or_false<T, S>(data: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match data {
        Some(value) => value.serialize(serializer),
        None => serializer.serialize_bool(false),
    }
}
