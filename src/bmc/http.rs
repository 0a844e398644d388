//! Transport selection and HTTP utilities
//!
//! The transport is fixed at session configuration time. The default
//! honors the standard proxy environment variables with full certificate
//! verification; the insecure variant exists for internal test rigs only
//! and is reachable solely through the `allow_insecure_tls` environment
//! setting.

use reqwest::Client;
use serde::Deserialize;

use crate::error::{ApiError, ProviderError, Result};

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// How the session client reaches the API endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportConfig {
    /// Verify certificates and honor `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY`
    #[default]
    ProxyFromEnvironment,
    /// Skip certificate verification; proxies ignored. Internal test rigs only.
    InsecureSkipVerify,
}

impl TransportConfig {
    /// Map the `allow_insecure_tls` setting to a transport.
    ///
    /// Only the literal string `"true"` selects the insecure transport.
    /// Anything else, including `"TRUE"` and `"1"`, keeps verification on.
    pub fn from_insecure_flag(flag: Option<&str>) -> Self {
        if flag == Some("true") {
            Self::InsecureSkipVerify
        } else {
            Self::ProxyFromEnvironment
        }
    }

    /// Build the reqwest client for this transport.
    pub(crate) fn build_http_client(self, user_agent: &str) -> Result<Client> {
        let builder = Client::builder().user_agent(user_agent);

        let builder = match self {
            Self::ProxyFromEnvironment => builder,
            Self::InsecureSkipVerify => {
                // This line must appear in the logs whenever verification is off
                tracing::warn!("USING INSECURE TLS: certificate verification is disabled");
                builder.danger_accept_invalid_certs(true).no_proxy()
            }
        };

        builder.build().map_err(|e| {
            ProviderError::client_construction(format!("Failed to create HTTP client: {}", e))
        })
    }
}

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Shape of the service's JSON error bodies
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Build an [`ApiError`] from a non-success response.
///
/// The service reports errors as `{"code": ..., "message": ...}`; when the
/// body is not that shape (proxies, HTML error pages) the sanitized body
/// text stands in for the message.
pub(crate) fn parse_error_body(status: u16, body: &str, request_id: Option<String>) -> ApiError {
    if let Ok(parsed) = serde_json::from_str::<ServiceErrorBody>(body) {
        if parsed.code.is_some() || parsed.message.is_some() {
            return ApiError {
                status: Some(status),
                code: parsed.code,
                message: parsed
                    .message
                    .unwrap_or_else(|| format!("HTTP {}", status)),
                request_id,
            };
        }
    }

    ApiError {
        status: Some(status),
        code: None,
        message: if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            sanitize_for_log(body)
        },
        request_id,
    }
}

/// Append URL-encoded query parameters to a path or URL.
pub fn with_query(url: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    if url.contains('?') {
        format!("{}&{}", url, query)
    } else {
        format!("{}?{}", url, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insecure_flag_requires_exact_literal() {
        assert_eq!(
            TransportConfig::from_insecure_flag(Some("true")),
            TransportConfig::InsecureSkipVerify
        );
        for other in [None, Some("TRUE"), Some("1"), Some("yes"), Some("")] {
            assert_eq!(
                TransportConfig::from_insecure_flag(other),
                TransportConfig::ProxyFromEnvironment,
                "{:?}",
                other
            );
        }
    }

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated, 500 bytes total"));
        assert!(sanitized.len() < body.len());
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("ab\x1b[31mcd\n"), "ab[31mcd");
    }

    #[test]
    fn test_parse_service_error_body() {
        let body = r#"{"code": "NotAuthorizedOrNotFound", "message": "resource does not exist"}"#;
        let err = parse_error_body(404, body, Some("req-1".to_string()));
        assert_eq!(err.status, Some(404));
        assert_eq!(err.code.as_deref(), Some("NotAuthorizedOrNotFound"));
        assert_eq!(err.message, "resource does not exist");
        assert_eq!(err.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_parse_unstructured_error_body() {
        let err = parse_error_body(502, "<html>Bad Gateway</html>", None);
        assert_eq!(err.status, Some(502));
        assert!(err.code.is_none());
        assert!(err.message.contains("Bad Gateway"));
    }

    #[test]
    fn test_parse_empty_error_body() {
        let err = parse_error_body(500, "", None);
        assert_eq!(err.message, "HTTP 500");
    }

    #[test]
    fn test_with_query() {
        assert_eq!(with_query("/instances", &[]), "/instances");
        assert_eq!(
            with_query("/instances", &[("compartmentId", "ocid1.c..a"), ("limit", "50")]),
            "/instances?compartmentId=ocid1.c..a&limit=50"
        );
        assert_eq!(
            with_query("/objects?fields=name", &[("prefix", "a b")]),
            "/objects?fields=name&prefix=a%20b"
        );
    }
}
