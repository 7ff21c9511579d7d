// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiErrorCode {
    InvalidBody,
    ValidationFailed,
    InvalidQueryParameter,
    Unauthenticated,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn invalid_body(reason: impl Into<String>) -> Self {
        Self::new(
            ApiErrorCode::InvalidBody,
            "request body is not valid",
            json!({"reason": reason.into()}),
        )
    }

    #[must_use]
    pub fn validation_failed(field: &str, reason: impl Into<String>) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            "validation failed",
            json!({"field_errors": [{"field": field, "reason": reason.into()}]}),
        )
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("invalid query parameter: {name}"),
            json!({"field_errors": [{"parameter": name, "reason": "invalid", "value": value}]}),
        )
    }

    #[must_use]
    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Self::new(
            ApiErrorCode::Unauthenticated,
            "authentication required",
            json!({"reason": reason.into()}),
        )
    }

    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NotFound, "not found", json!({"what": what.into()}))
    }

    #[must_use]
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::new(
            ApiErrorCode::Conflict,
            "conflict with existing data",
            json!({"reason": reason.into()}),
        )
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(ApiErrorCode::Internal, "internal error", json!({}))
    }
}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiErrorCode>();
    assert_traits::<ApiError>();
};
