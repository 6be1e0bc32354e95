//! Reconciliation of jar-sourced and header-sourced cookies

use crate::cookies::Cookie;
use indexmap::IndexMap;

/// Merge the browser jar's cookies with cookies parsed from the terminal
/// response's `Set-Cookie` header.
///
/// Identity is the compound key (name, domain, path). On collision the
/// header cookie wins: the jar is authoritative for everything JavaScript
/// and redirects touched, but the raw header carries the freshest directives
/// for cookies set on the final response. Jar cookies the header does not
/// mention pass through unchanged.
pub fn merge_cookies(jar: Vec<Cookie>, header: Vec<Cookie>) -> Vec<Cookie> {
    if header.is_empty() {
        return jar;
    }

    let mut index: IndexMap<(String, String, String), Cookie> =
        jar.into_iter().map(|c| (c.identity(), c)).collect();

    for cookie in header {
        index.insert(cookie.identity(), cookie);
    }

    index.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::test_cookie;

    #[test]
    fn test_empty_header_returns_jar_unchanged() {
        let jar = vec![
            test_cookie("a", "1", "example.com", "/"),
            test_cookie("b", "2", "example.com", "/api"),
        ];
        let merged = merge_cookies(jar.clone(), Vec::new());
        assert_eq!(merged, jar);
    }

    #[test]
    fn test_jar_only_cookie_preserved() {
        let jar = vec![test_cookie("keep", "me", "example.com", "/")];
        let header = vec![test_cookie("fresh", "new", "example.com", "/")];

        let merged = merge_cookies(jar, header);
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().any(|c| c.name == "keep" && c.value == "me"));
        assert!(merged.iter().any(|c| c.name == "fresh" && c.value == "new"));
    }

    #[test]
    fn test_header_wins_on_identity_collision() {
        let jar = vec![test_cookie("sid", "stale", "example.com", "/")];
        let header = vec![test_cookie("sid", "fresh", "example.com", "/")];

        let merged = merge_cookies(jar, header);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].value, "fresh");
    }

    #[test]
    fn test_same_name_different_path_both_survive() {
        let jar = vec![test_cookie("sid", "root", "example.com", "/")];
        let header = vec![test_cookie("sid", "scoped", "example.com", "/api")];

        let merged = merge_cookies(jar, header);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_at_most_one_record_per_identity() {
        let jar = vec![
            test_cookie("sid", "one", "example.com", "/"),
            test_cookie("sid", "other-domain", "other.com", "/"),
        ];
        let header = vec![
            test_cookie("sid", "two", "example.com", "/"),
            test_cookie("sid", "three", "example.com", "/"),
        ];

        let merged = merge_cookies(jar, header);
        let matching: Vec<_> = merged
            .iter()
            .filter(|c| c.name == "sid" && c.domain == "example.com" && c.path == "/")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].value, "three");
        assert_eq!(merged.len(), 2);
    }
}
