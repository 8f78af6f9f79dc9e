//! JSON envelope returned by every API endpoint
//!
//! Every response body, success or failure, has the same outer shape:
//!
//! ```json
//! { "success": true, "data": [...], "pagination": { "total": 41, "page": 1, "limit": 20, "pages": 3 } }
//! { "success": false, "message": "Endpoint not found" }
//! ```
//!
//! Optional members are omitted rather than serialized as `null`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::listing::pagination::page_count;

/// Pagination block attached to list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Matching records, ignoring pagination
    pub total: u64,
    /// Current page (1-indexed)
    pub page: u32,
    /// Page size actually applied
    pub limit: u32,
    /// Number of pages, `ceil(total / limit)`
    pub pages: u64,
}

impl PaginationMeta {
    /// Build the block, deriving `pages` from `total` and `limit`
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        Self {
            total,
            page,
            limit,
            pages: page_count(total, limit),
        }
    }
}

/// The outer `{success, data?, message?, pagination?}` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,

    /// Endpoint-specific top-level members (e.g. `version` on the health probe)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    fn success() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
            pagination: None,
            extra: Map::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            pagination: None,
            extra: Map::new(),
        }
    }
}

/// A status code paired with an [`Envelope`]
///
/// Handlers build a `Reply`; the HTTP layer turns it into a response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    status: StatusCode,
    envelope: Envelope,
}

impl Reply {
    /// 200 with a `data` payload
    pub fn ok(data: Value) -> Self {
        let mut envelope = Envelope::success();
        envelope.data = Some(data);
        Self {
            status: StatusCode::OK,
            envelope,
        }
    }

    /// 200 with a `data` payload and a pagination block
    pub fn paginated(data: Value, pagination: PaginationMeta) -> Self {
        let mut reply = Self::ok(data);
        reply.envelope.pagination = Some(pagination);
        reply
    }

    /// 200 carrying only a message
    pub fn message(message: impl Into<String>) -> Self {
        let mut envelope = Envelope::success();
        envelope.message = Some(message.into());
        Self {
            status: StatusCode::OK,
            envelope,
        }
    }

    /// 404 failure envelope
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure(StatusCode::NOT_FOUND, message)
    }

    /// 501 failure envelope for endpoints that exist but do nothing yet
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::failure(StatusCode::NOT_IMPLEMENTED, message)
    }

    /// 500 failure envelope
    pub fn internal(message: impl Into<String>) -> Self {
        Self::failure(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Failure envelope with an arbitrary status
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            envelope: Envelope::failure(message),
        }
    }

    /// Add an extra top-level member to the envelope
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.envelope.extra.insert(key.into(), value.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_envelope_omits_empty_members() {
        let reply = Reply::not_found("Endpoint not found");
        assert_eq!(reply.status(), StatusCode::NOT_FOUND);

        let body = serde_json::to_value(reply.envelope()).unwrap();
        assert_eq!(
            body,
            json!({ "success": false, "message": "Endpoint not found" })
        );
    }

    #[test]
    fn test_paginated_envelope() {
        let reply = Reply::paginated(json!([{ "id": 1 }]), PaginationMeta::new(41, 1, 20));
        let body = serde_json::to_value(reply.envelope()).unwrap();

        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"], json!([{ "id": 1 }]));
        assert_eq!(
            body["pagination"],
            json!({ "total": 41, "page": 1, "limit": 20, "pages": 3 })
        );
        assert!(body.get("message").is_none());
    }

    #[test]
    fn test_extra_fields_are_flattened() {
        let reply = Reply::message("up").with_field("version", "1.0.0");
        let body = serde_json::to_value(reply.envelope()).unwrap();
        assert_eq!(
            body,
            json!({ "success": true, "message": "up", "version": "1.0.0" })
        );
    }

    #[test]
    fn test_envelope_deserializes_back() {
        let raw = r#"{"success":false,"message":"Not implemented yet"}"#;
        let envelope: Envelope = serde_json::from_str(raw).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("Not implemented yet"));
        assert!(envelope.extra.is_empty());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Reply::not_implemented("x").status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(Reply::internal("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(Reply::ok(Value::Null).status(), StatusCode::OK);
    }
}
