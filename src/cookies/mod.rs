//! Cookie records, Set-Cookie parsing and jar/header reconciliation
//!
//! Two independent cookie sources exist per request: the browser's live
//! cookie jar and the raw `Set-Cookie` header of the navigation response.
//! This module parses the latter ([`parse_set_cookie`]) and merges both
//! sets into one canonical list ([`merge_cookies`]).

pub mod merge;
pub mod parse;

pub use merge::merge_cookies;
pub use parse::parse_set_cookie;

use headless_chrome::protocol::cdp::Network;
use serde::{Deserialize, Serialize};

/// Expiry sentinel for cookies without a persisted expiration
pub const SESSION_EXPIRY: f64 = -1.0;

/// A single cookie in the shape clients of the FlareSolverr protocol expect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// Absolute expiry in epoch seconds, or [`SESSION_EXPIRY`]
    pub expires: f64,
    pub http_only: bool,
    pub secure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
    /// Length of name plus length of value
    pub size: u64,
    /// True iff the cookie has no persisted expiry
    pub session: bool,
}

impl Cookie {
    /// Compound identity used for reconciliation. Two records sharing this
    /// key are the same cookie regardless of value.
    pub fn identity(&self) -> (String, String, String) {
        (self.name.clone(), self.domain.clone(), self.path.clone())
    }
}

impl From<Network::Cookie> for Cookie {
    fn from(cookie: Network::Cookie) -> Self {
        let expires = if cookie.session { SESSION_EXPIRY } else { cookie.expires };
        let same_site = cookie.same_site.map(|s| {
            match s {
                Network::CookieSameSite::Strict => "Strict",
                Network::CookieSameSite::Lax => "Lax",
                Network::CookieSameSite::None => "None",
            }
            .to_string()
        });

        Self {
            size: (cookie.name.len() + cookie.value.len()) as u64,
            session: cookie.session,
            name: cookie.name,
            value: cookie.value,
            domain: cookie.domain,
            path: cookie.path,
            expires,
            http_only: cookie.http_only,
            secure: cookie.secure,
            same_site,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_cookie(name: &str, value: &str, domain: &str, path: &str) -> Cookie {
    Cookie {
        name: name.to_string(),
        value: value.to_string(),
        domain: domain.to_string(),
        path: path.to_string(),
        expires: SESSION_EXPIRY,
        http_only: false,
        secure: false,
        same_site: None,
        size: (name.len() + value.len()) as u64,
        session: true,
    }
}
