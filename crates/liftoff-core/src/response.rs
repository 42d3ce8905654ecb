//! Upload response classification.
//!
//! The service body is followed by a `thrust_testflight_status_code:<code>`
//! marker. Whatever precedes the marker is the service's message.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{CoreError, CoreResult};

/// Marker separating the response body from the HTTP status code.
pub const STATUS_MARKER: &str = "thrust_testflight_status_code:";

static STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?s)^(.*){}(\d+)\s*$", regex::escape(STATUS_MARKER)))
        .expect("invalid regex")
});

/// Outcome of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    /// The service accepted the build.
    Success,
    /// The service answered with a non-200 status.
    Failure {
        /// Reported status code.
        status: u16,
        /// Body text preceding the marker, trimmed.
        message: String,
    },
}

impl UploadResult {
    /// Returns whether the upload succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Classifies a response body carrying the status marker.
///
/// # Errors
///
/// Returns [`CoreError::MalformedResponse`] if the marker or its code is
/// missing.
pub fn parse_response(body: &str) -> CoreResult<UploadResult> {
    let caps = STATUS_RE
        .captures(body)
        .ok_or_else(|| CoreError::MalformedResponse(body.to_string()))?;

    let status: u16 = caps[2]
        .parse()
        .map_err(|_| CoreError::MalformedResponse(body.to_string()))?;
    debug!(status, "classified upload response");

    if status == 200 {
        return Ok(UploadResult::Success);
    }

    Ok(UploadResult::Failure {
        status,
        message: caps[1].trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let result = parse_response("Upload Succeeded! thrust_testflight_status_code:200").unwrap();
        assert_eq!(result, UploadResult::Success);
        assert!(result.is_success());
    }

    #[test]
    fn test_parse_failure_message() {
        let result = parse_response("Invalid ipa.thrust_testflight_status_code:401").unwrap();
        assert_eq!(
            result,
            UploadResult::Failure {
                status: 401,
                message: "Invalid ipa.".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_failure_multiline_body() {
        let body = "{\n  \"error\": \"bad token\"\n}\nthrust_testflight_status_code:403\n";
        let UploadResult::Failure { status, message } = parse_response(body).unwrap() else {
            panic!("expected failure");
        };
        assert_eq!(status, 403);
        assert_eq!(message, "{\n  \"error\": \"bad token\"\n}");
    }

    #[test]
    fn test_parse_empty_message() {
        let result = parse_response("thrust_testflight_status_code:500").unwrap();
        assert_eq!(
            result,
            UploadResult::Failure {
                status: 500,
                message: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_without_marker() {
        let err = parse_response("<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, CoreError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_marker_without_code() {
        assert!(parse_response("oops thrust_testflight_status_code:").is_err());
    }

    #[test]
    fn test_parse_out_of_range_code() {
        assert!(parse_response("x thrust_testflight_status_code:99999999").is_err());
    }

    #[test]
    fn test_parse_body_built_with_marker() {
        let body = format!("Invalid ipa.{STATUS_MARKER}401\n");
        assert_eq!(
            parse_response(&body).unwrap(),
            UploadResult::Failure {
                status: 401,
                message: "Invalid ipa.".to_string(),
            }
        );
        assert_eq!(
            parse_response(&format!("{STATUS_MARKER}200")).unwrap(),
            UploadResult::Success
        );
    }
}
