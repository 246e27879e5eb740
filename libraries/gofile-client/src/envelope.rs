//! The `{status, data}` wrapper every Gofile response uses.

use crate::error::{GofileError, Result};
use serde::Deserialize;
use serde_json::Value;

/// Code reported when a status string carries no usable reason.
pub const UNKNOWN_ERROR_CODE: &str = "unknown";

const STATUS_OK: &str = "ok";
const ERROR_PREFIX: &str = "error-";

/// Raw API response envelope.
///
/// Deserialization is lenient: a missing `status` reads as an empty string
/// (and therefore an unknown failure), a missing `data` as `null`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Value,
}

/// Parsed form of the envelope `status` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiStatus {
    Ok,
    /// Reason after `error-`, or [`UNKNOWN_ERROR_CODE`]
    Error(String),
}

impl ApiStatus {
    /// Parse a status string.
    ///
    /// `"ok"` is success. `"error-<reason>"` yields everything after the
    /// first `-`. An empty reason or any other string is `unknown`.
    pub fn parse(status: &str) -> Self {
        if status == STATUS_OK {
            return Self::Ok;
        }

        match status.strip_prefix(ERROR_PREFIX) {
            Some(reason) if !reason.is_empty() => Self::Error(reason.to_string()),
            _ => Self::Error(UNKNOWN_ERROR_CODE.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl Envelope {
    pub fn status(&self) -> ApiStatus {
        ApiStatus::parse(&self.status)
    }

    /// Turn the envelope into its payload or a [`GofileError::ResponseError`].
    pub fn into_result(self) -> Result<Value> {
        match self.status() {
            ApiStatus::Ok => Ok(self.data),
            ApiStatus::Error(code) => Err(GofileError::ResponseError(code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> Envelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_ok_status() {
        assert_eq!(ApiStatus::parse("ok"), ApiStatus::Ok);
        assert!(ApiStatus::parse("ok").is_ok());
    }

    #[test]
    fn test_error_status_extracts_reason() {
        assert_eq!(
            ApiStatus::parse("error-wrongToken"),
            ApiStatus::Error("wrongToken".into())
        );
        assert_eq!(
            ApiStatus::parse("error-notFound"),
            ApiStatus::Error("notFound".into())
        );
    }

    #[test]
    fn test_error_reason_keeps_later_dashes() {
        assert_eq!(
            ApiStatus::parse("error-rate-limit"),
            ApiStatus::Error("rate-limit".into())
        );
    }

    #[test]
    fn test_malformed_status_is_unknown() {
        for status in ["", "error-", "error", "OK", "noServer", "fail-x"] {
            assert_eq!(
                ApiStatus::parse(status),
                ApiStatus::Error(UNKNOWN_ERROR_CODE.into()),
                "status {:?}",
                status
            );
        }
    }

    #[test]
    fn test_ok_passes_data_through_unchanged() {
        let data = json!({"server": "store1", "nested": {"a": [1, 2, 3]}});
        let env = envelope(json!({"status": "ok", "data": data.clone()}));
        assert_eq!(env.into_result().unwrap(), data);
    }

    #[test]
    fn test_ok_with_null_data() {
        let env = envelope(json!({"status": "ok", "data": null}));
        assert_eq!(env.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_error_envelope_becomes_response_error() {
        let env = envelope(json!({"status": "error-notPremium", "data": {}}));
        match env.into_result() {
            Err(GofileError::ResponseError(code)) => assert_eq!(code, "notPremium"),
            other => panic!("Expected ResponseError, got: {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_are_lenient() {
        let env = envelope(json!({}));
        assert_eq!(env.data, Value::Null);
        match env.into_result() {
            Err(GofileError::ResponseError(code)) => assert_eq!(code, UNKNOWN_ERROR_CODE),
            other => panic!("Expected ResponseError, got: {:?}", other),
        }
    }
}
