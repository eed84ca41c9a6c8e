//! Diagnostic messages and status classification for failed responses.
//!
//! Everything here is pure: nothing touches the network, so the
//! exact message format is testable without a server.

use reqwest::StatusCode;

use crate::error::ErrorKind;

/// Prefix of every operation name in a diagnostic message.
pub const CLIENT_NAMESPACE: &str = "PreservationClient";

/// Name of the remote service in diagnostic messages.
pub const SERVICE_NAME: &str = "Preservation Catalog";

/// Stand-in for an empty response body.
pub const DEFAULT_BODY: &str = "Response from preservation-catalog did not contain a body. \
     Check the preservation-catalog logs for backtraces, and consider having \
     preservation-catalog return more detail to the client in the future.";

/// The parts of an HTTP response a diagnostic message is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSummary {
    pub url: String,
    pub status: u16,
    pub reason: Option<String>,
    pub body: String,
}

impl ResponseSummary {
    /// Summarize a response using the canonical reason phrase for `status`.
    ///
    /// A custom phrase on the server's status line is not reported; a status
    /// with no canonical phrase (such as 599) is reported as the bare code.
    pub fn new(url: impl Into<String>, status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_owned),
            body: body.into(),
        }
    }
}

/// Format the diagnostic for a failed call.
///
/// `PreservationClient.{operation}[ for {object_id}] got {reason} ({status}) from Preservation Catalog at {url}: {body}`
///
/// The ` for …` part is omitted when `object_id` is absent or blank, the
/// reason is omitted when absent or blank, and an empty body is replaced by
/// [`DEFAULT_BODY`].
pub fn format(response: &ResponseSummary, object_id: Option<&str>, operation: &str) -> String {
    let status_info = match response.reason.as_deref().map(str::trim) {
        Some(reason) if !reason.is_empty() => format!("{reason} ({})", response.status),
        _ => response.status.to_string(),
    };
    let object_id_info = match object_id.map(str::trim) {
        Some(id) if !id.is_empty() => format!(" for {id}"),
        _ => String::new(),
    };
    let body = if response.body.trim().is_empty() {
        DEFAULT_BODY
    } else {
        response.body.as_str()
    };

    format!(
        "{CLIENT_NAMESPACE}.{operation}{object_id_info} got {status_info} from {SERVICE_NAME} at {}: {body}",
        response.url
    )
}

/// Format the diagnostic for a 2xx response whose body could not be decoded.
pub fn format_parse_failure(
    url: &str,
    object_id: Option<&str>,
    operation: &str,
    detail: &str,
) -> String {
    let object_id_info = match object_id.map(str::trim) {
        Some(id) if !id.is_empty() => format!(" for {id}"),
        _ => String::new(),
    };
    format!(
        "{CLIENT_NAMESPACE}.{operation}{object_id_info} could not parse response from {SERVICE_NAME} at {url}: {detail}"
    )
}

/// Format the diagnostic for a request that never got a response.
pub fn format_connection_failure(kind: &str, detail: &str) -> String {
    format!("Unable to reach {SERVICE_NAME} - failed with {kind}: {detail}")
}

/// Map a response status to the failure it represents, or `None` for 2xx.
pub fn classify_status(status: StatusCode) -> Option<ErrorKind> {
    match status {
        s if s.is_success() => None,
        StatusCode::NOT_FOUND => Some(ErrorKind::NotFound),
        StatusCode::LOCKED => Some(ErrorKind::Locked),
        StatusCode::CONFLICT => Some(ErrorKind::Conflict),
        _ => Some(ErrorKind::UnexpectedResponse),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DRUID: &str = "oo666aa1234";
    const URL: &str = "https://example.org/prezcat";

    fn response() -> ResponseSummary {
        ResponseSummary {
            url: URL.to_string(),
            status: 500,
            reason: Some("Internal Server Error".to_string()),
            body: "Something is terribly wrong".to_string(),
        }
    }

    #[test]
    fn test_full_message() {
        assert_eq!(
            format(&response(), Some(DRUID), "current_version"),
            "PreservationClient.current_version for oo666aa1234 got Internal Server Error (500) \
             from Preservation Catalog at https://example.org/prezcat: Something is terribly wrong"
        );
    }

    #[test]
    fn test_blank_object_id_is_omitted() {
        assert_eq!(
            format(&response(), Some(""), "whatever"),
            "PreservationClient.whatever got Internal Server Error (500) \
             from Preservation Catalog at https://example.org/prezcat: Something is terribly wrong"
        );
        assert_eq!(
            format(&response(), None, "whatever"),
            format(&response(), Some("  "), "whatever")
        );
    }

    #[test]
    fn test_missing_reason_uses_bare_status() {
        let mut response = response();
        response.reason = None;
        let message = format(&response, Some(DRUID), "current_version");
        assert!(message.contains(" got 500 from "), "{message}");

        response.reason = Some(String::new());
        assert_eq!(format(&response, Some(DRUID), "current_version"), message);
    }

    #[test]
    fn test_empty_body_uses_default() {
        let mut response = response();
        response.body = String::new();
        let message = format(&response, Some(DRUID), "current_version");
        assert!(message.ends_with(&format!(": {DEFAULT_BODY}")), "{message}");
    }

    #[test]
    fn test_format_is_deterministic() {
        let response = response();
        assert_eq!(
            format(&response, Some(DRUID), "checksums"),
            format(&response, Some(DRUID), "checksums")
        );
    }

    #[test]
    fn test_summary_uses_canonical_reason() {
        let summary = ResponseSummary::new(URL, StatusCode::LOCKED, "");
        assert_eq!(summary.status, 423);
        assert_eq!(summary.reason.as_deref(), Some("Locked"));

        let unknown = StatusCode::from_u16(599).unwrap();
        let summary = ResponseSummary::new(URL, unknown, "boom");
        assert!(summary.reason.is_none());
        assert!(format(&summary, None, "lookup").contains(" got 599 from "));
    }

    #[test]
    fn test_parse_failure_message() {
        assert_eq!(
            format_parse_failure(
                URL,
                Some(DRUID),
                "current_version",
                "expected value at line 1"
            ),
            "PreservationClient.current_version for oo666aa1234 could not parse response \
             from Preservation Catalog at https://example.org/prezcat: expected value at line 1"
        );
    }

    #[test]
    fn test_connection_failure_message() {
        assert_eq!(
            format_connection_failure("Timeout", "operation timed out"),
            "Unable to reach Preservation Catalog - failed with Timeout: operation timed out"
        );
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(StatusCode::OK), None);
        assert_eq!(classify_status(StatusCode::NO_CONTENT), None);
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND),
            Some(ErrorKind::NotFound)
        );
        assert_eq!(
            classify_status(StatusCode::LOCKED),
            Some(ErrorKind::Locked)
        );
        assert_eq!(
            classify_status(StatusCode::CONFLICT),
            Some(ErrorKind::Conflict)
        );
        for status in [
            StatusCode::MOVED_PERMANENTLY,
            StatusCode::IM_A_TEAPOT,
            StatusCode::UNAUTHORIZED,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
        ] {
            assert_eq!(
                classify_status(status),
                Some(ErrorKind::UnexpectedResponse),
                "{status}"
            );
        }
    }
}
