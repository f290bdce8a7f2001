//! Error dispatch: turns a terminal [`HandlerError`] into exactly one status
//! line and one JSON envelope.

use tracing::error;

use crate::api_error::{ApiErrorEnvelope, HandlerError};
use crate::response::ContentType;
use crate::sink::ResponseSink;

/// Writes the envelope for `err` to `res`.
///
/// Only `401`, `400` and `406` domain errors keep their status. Every other
/// failure, including a domain error with any other status, is reported as
/// `500 err.internal` without leaking the original status.
pub fn handle_error(err: HandlerError, res: &mut dyn ResponseSink) {
    res.set_header("content-type", ContentType::Json.as_str());

    let err = match err {
        HandlerError::Domain(domain) if matches!(domain.status(), 400 | 401 | 406) => {
            error!(status = domain.status(), err = %domain, "handling expected API error");
            let status = domain.status();
            let envelope = match status {
                401 => ApiErrorEnvelope::new("auth.unauthorized", "Unauthorized", Vec::new()),
                400 => ApiErrorEnvelope::new("err.validation", "Validation Failed", domain.into_details()),
                _ => ApiErrorEnvelope::new("err.not-acceptable", "Not Acceptable", Vec::new()),
            };
            return write_envelope(res, status, &envelope);
        }
        other => other,
    };

    error!(err = %err, "handling unexpected API error");
    let envelope = ApiErrorEnvelope::new("err.internal", "Internal Server Error", Vec::new());
    write_envelope(res, 500, &envelope);
}

fn write_envelope(res: &mut dyn ResponseSink, status: u16, envelope: &ApiErrorEnvelope) {
    res.write_status(status);
    res.write(&envelope.to_json());
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::api_error::{DomainError, FieldError};
    use crate::response::Response;

    fn dispatch(err: HandlerError) -> (Response, Value) {
        let mut res = Response::new();
        handle_error(err, &mut res);
        let body = serde_json::from_slice(res.body()).unwrap();
        (res, body)
    }

    #[rstest]
    #[case(401, 401, "auth.unauthorized", "Unauthorized")]
    #[case(400, 400, "err.validation", "Validation Failed")]
    #[case(406, 406, "err.not-acceptable", "Not Acceptable")]
    #[case(403, 500, "err.internal", "Internal Server Error")]
    #[case(404, 500, "err.internal", "Internal Server Error")]
    #[case(503, 500, "err.internal", "Internal Server Error")]
    fn maps_domain_status(
        #[case] status: u16,
        #[case] sent: u16,
        #[case] code: &str,
        #[case] message: &str,
    ) {
        let (res, body) = dispatch(DomainError::new(status, "boom").into());
        assert_eq!(res.status_code(), sent);
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert_eq!(body["code"], code);
        assert_eq!(body["message"], message);
    }

    #[test]
    fn validation_details_pass_through_in_order() {
        let details = vec![
            FieldError::new("name", "required", "name is required"),
            FieldError::detailed("age", "min", "too young", "3", ">=18"),
        ];
        let (res, body) = dispatch(DomainError::validation(details.clone()).into());
        assert_eq!(res.status_code(), 400);
        let sent: Vec<FieldError> = serde_json::from_value(body["details"].clone()).unwrap();
        assert_eq!(sent, details);
    }

    #[rstest]
    #[case(401)]
    #[case(406)]
    fn unauthorized_and_not_acceptable_drop_details(#[case] status: u16) {
        let err = DomainError::with_details(status, "x", vec![FieldError::new("f", "c", "m")]);
        let (_, body) = dispatch(err.into());
        assert_eq!(body["details"], Value::Array(Vec::new()));
    }

    #[test]
    fn unexpected_error_is_internal() {
        let io = std::io::Error::other("disk on fire");
        let (res, body) = dispatch(io.into());
        assert_eq!(res.status_code(), 500);
        assert_eq!(body["code"], "err.internal");
        assert_eq!(body["details"], Value::Array(Vec::new()));
    }
}
