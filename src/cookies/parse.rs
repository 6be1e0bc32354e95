//! Best-effort parsing of raw `Set-Cookie` header strings

use crate::cookies::{Cookie, SESSION_EXPIRY};
use url::Url;

/// Parse a raw `Set-Cookie` header into cookie records.
///
/// The header may contain several newline-joined cookie definitions and may
/// be partially malformed; fragments that fail to parse are dropped. This
/// never fails: the worst outcome is an empty list.
///
/// Cookies without their own `Domain` attribute default to the hostname of
/// `fallback_url` (the page's final URL); `Path` defaults to `/`.
pub fn parse_set_cookie(header: Option<&str>, fallback_url: &str) -> Vec<Cookie> {
    let raw = match header {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Vec::new(),
    };

    let fallback_domain = Url::parse(fallback_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_default();

    parse_records(raw)
        .into_iter()
        .map(|parsed| to_record(parsed, &fallback_domain))
        .collect()
}

/// Whole-string parse with a per-line fallback.
///
/// A newline means the header holds several records, which a single parse
/// would swallow into the first record's attributes; in that case (or when
/// the whole-string parse fails) each trimmed non-empty line is parsed
/// independently and unparseable lines are dropped.
fn parse_records(raw: &str) -> Vec<cookie::Cookie<'static>> {
    if !raw.contains('\n') {
        if let Ok(parsed) = cookie::Cookie::parse(raw.trim().to_owned()) {
            return vec![parsed];
        }
    }

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| cookie::Cookie::parse(line.to_owned()).ok())
        .collect()
}

fn to_record(parsed: cookie::Cookie<'static>, fallback_domain: &str) -> Cookie {
    let domain = parsed
        .domain()
        .filter(|d| !d.is_empty())
        .unwrap_or(fallback_domain)
        .to_string();
    let path = parsed.path().filter(|p| !p.is_empty()).unwrap_or("/").to_string();

    // Malformed or absent expiry dates both land on the session sentinel
    let expires = parsed
        .expires()
        .and_then(|e| e.datetime())
        .map(|dt| dt.unix_timestamp() as f64)
        .unwrap_or(SESSION_EXPIRY);

    let same_site = parsed.same_site().map(|s| s.to_string());

    Cookie {
        size: (parsed.name().len() + parsed.value().len()) as u64,
        session: expires == SESSION_EXPIRY,
        name: parsed.name().to_string(),
        value: parsed.value().to_string(),
        domain,
        path,
        expires,
        http_only: parsed.http_only().unwrap_or(false),
        secure: parsed.secure().unwrap_or(false),
        same_site,
    }
}
