//! Request and response models for the FlareSolverr-compatible wire protocol

use crate::cookies::Cookie;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default overall deadline in seconds when the request does not supply one
pub const DEFAULT_MAX_TIMEOUT: u64 = 60;

/// Known-good URL resolved by the health check
pub const HEALTH_CHECK_URL: &str = "https://google.com";

/// A request to fetch one URL through the browser
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest {
    /// FlareSolverr command name; accepted for compatibility, unused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,

    pub url: String,

    /// Overall deadline for the whole resolution, in seconds
    #[serde(default = "default_max_timeout")]
    pub max_timeout: u64,
}

fn default_max_timeout() -> u64 {
    DEFAULT_MAX_TIMEOUT
}

/// The assembled result of a successful resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub user_agent: String,

    /// Final page URL after any redirects
    pub url: String,

    pub status: u16,

    /// Reconciled cookie set (browser jar merged with Set-Cookie header)
    pub cookies: Vec<Cookie>,

    /// Response headers of the navigation response, empty if none existed
    pub headers: IndexMap<String, String>,

    /// Raw response body, or rendered page content as fallback
    pub response: String,
}

/// Envelope returned for every successful request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub message: String,
    pub solution: Solution,

    /// Milliseconds since epoch, captured at request entry
    pub start_timestamp: i64,
}

/// Body returned by the health endpoint on success
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthcheckResponse {
    pub user_agent: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_request_defaults() {
        let request: LinkRequest =
            serde_json::from_value(serde_json::json!({ "url": "https://example.com" })).unwrap();

        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.max_timeout, 60);
        assert!(request.cmd.is_none());
    }

    #[test]
    fn test_link_request_camel_case_fields() {
        let request: LinkRequest = serde_json::from_value(serde_json::json!({
            "cmd": "request.get",
            "url": "https://example.com",
            "maxTimeout": 30
        }))
        .unwrap();

        assert_eq!(request.cmd.as_deref(), Some("request.get"));
        assert_eq!(request.max_timeout, 30);
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let response = LinkResponse {
            message: "Success".to_string(),
            solution: Solution {
                user_agent: "Mozilla/5.0".to_string(),
                url: "https://example.com/".to_string(),
                status: 200,
                cookies: Vec::new(),
                headers: IndexMap::new(),
                response: "<html></html>".to_string(),
            },
            start_timestamp: 1_700_000_000_000,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["startTimestamp"], 1_700_000_000_000i64);
        assert_eq!(json["solution"]["userAgent"], "Mozilla/5.0");
        assert_eq!(json["solution"]["status"], 200);
    }
}
