//! Application-level failures and the JSON envelope clients receive for them.
//!
//! Two layers live here:
//!
//! - [`DomainError`] is what a handler or middleware raises when it detects an
//!   expected, classifiable fault (bad input, missing credentials, ...).
//! - [`ApiErrorEnvelope`] is the wire shape written back to the client. It is
//!   built fresh for every failed response by [`handle_error`](crate::dispatch::handle_error).
//!
//! [`HandlerError`] is the closed sum type that crosses the boundary between
//! a route handler and error dispatch. Dispatch matches on it; nothing is
//! downcast at runtime.

use serde::{Deserialize, Serialize};

/// One validation violation, always carried inside a [`DomainError`] or an
/// [`ApiErrorEnvelope`].
///
/// `value` and `expected` are empty strings when not applicable, so the
/// serialised object always has all five keys.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
    pub value: String,
    pub expected: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// A violation that also reports the offending and the expected value.
    pub fn detailed(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }
}

/// An expected failure carrying the HTTP status it should map to.
///
/// The status is not range-checked. Statuses that error dispatch does not
/// know about are reported to the client as `500 err.internal`.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{cause}")]
pub struct DomainError {
    status: u16,
    cause: String,
    details: Vec<FieldError>,
}

impl DomainError {
    pub fn new(status: u16, cause: impl Into<String>) -> Self {
        Self { status, cause: cause.into(), details: Vec::new() }
    }

    pub fn with_details(status: u16, cause: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self { status, cause: cause.into(), details }
    }

    /// `401 Unauthorized`, no details.
    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized")
    }

    /// `400` carrying the given violations.
    pub fn validation(details: Vec<FieldError>) -> Self {
        Self::with_details(400, "Validation Failed", details)
    }

    /// `406 Not Acceptable`, no details.
    pub fn not_acceptable() -> Self {
        Self::new(406, "Not Acceptable")
    }

    pub fn status(&self) -> u16 { self.status }
    pub fn cause(&self) -> &str { &self.cause }
    pub fn details(&self) -> &[FieldError] { &self.details }

    pub(crate) fn into_details(self) -> Vec<FieldError> {
        self.details
    }
}

/// Boxed error for anything that is not a [`DomainError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every way a route handler can fail.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Classified failure; dispatch picks the envelope from its status.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Anything else. Always surfaces as `500 err.internal`.
    #[error("{0}")]
    Unexpected(BoxError),
}

impl HandlerError {
    pub fn unexpected(err: impl Into<BoxError>) -> Self {
        Self::Unexpected(err.into())
    }
}

impl From<std::io::Error> for HandlerError {
    fn from(e: std::io::Error) -> Self {
        Self::Unexpected(Box::new(e))
    }
}

impl From<crate::error::Error> for HandlerError {
    fn from(e: crate::error::Error) -> Self {
        Self::Unexpected(Box::new(e))
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Unexpected(Box::new(e))
    }
}

/// The JSON body of every error response.
///
/// `details` serialises as `[]` when empty, never `null` and never absent.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ApiErrorEnvelope {
    pub timestamp: String,
    pub code: String,
    pub message: String,
    pub details: Vec<FieldError>,
}

impl ApiErrorEnvelope {
    /// Stamps the current UTC time (RFC 3339, second precision, `Z` suffix).
    pub fn new(code: impl Into<String>, message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn to_json(&self) -> Vec<u8> {
        // Only strings and vectors of strings: serialisation cannot fail.
        serde_json::to_vec(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_details_serialise_as_empty_array() {
        let json = String::from_utf8(ApiErrorEnvelope::new("err.internal", "Internal Server Error", Vec::new()).to_json())
            .unwrap();
        assert!(json.contains(r#""details":[]"#), "{json}");
    }

    #[test]
    fn envelope_has_fixed_keys() {
        let env = ApiErrorEnvelope::new(
            "err.validation",
            "Validation Failed",
            vec![FieldError::new("name", "required", "name is required")],
        );
        let v: serde_json::Value = serde_json::from_slice(&env.to_json()).unwrap();
        let obj = v.as_object().unwrap();
        for key in ["timestamp", "code", "message", "details"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        let detail = v["details"][0].as_object().unwrap();
        assert_eq!(detail.len(), 5);
        assert_eq!(detail["value"], "");
        assert_eq!(detail["expected"], "");
    }

    #[test]
    fn timestamp_is_rfc3339_utc() {
        let env = ApiErrorEnvelope::new("c", "m", Vec::new());
        assert!(env.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&env.timestamp).is_ok());
    }

    #[test]
    fn domain_error_defaults_to_no_details() {
        let err = DomainError::new(403, "Forbidden");
        assert!(err.details().is_empty());
        assert_eq!(err.to_string(), "Forbidden");
    }

    #[test]
    fn detailed_field_error_keeps_value_and_expected() {
        let fe = FieldError::detailed("size", "range", "too big", "500", "<=100");
        assert_eq!(fe.value, "500");
        assert_eq!(fe.expected, "<=100");
    }
}
