//! Browser and solver capability boundaries
//!
//! The resolution pipeline only ever talks to a [`PageDriver`] and a
//! [`ChallengeSolver`]. The default implementations ([`DriverSession`],
//! [`InterstitialSolver`]) drive a real Chrome via CDP, while tests plug in
//! scripted fakes.

pub mod config;
pub mod session;
pub mod solver;

pub use config::{CHALLENGE_TITLES, LaunchOptions, SolvePolicy, is_challenge_title};
pub use session::DriverSession;
pub use solver::InterstitialSolver;

use crate::cookies::Cookie;
use crate::error::Result;
use indexmap::IndexMap;
use std::time::Duration;

/// Page readiness states a driver can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// The DOM has been parsed (readyState left "loading")
    DomContentLoaded,
    /// No resource activity for a quiescence interval
    NetworkIdle,
}

/// Kinds of interstitial challenge the solver knows how to attack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeKind {
    CloudflareInterstitial,
}

/// Status and headers of the navigation response.
///
/// Absent for navigations that produce no network response (same-document
/// or cached pages). The raw body is read separately through
/// [`PageDriver::response_body`] since that read can fail independently.
#[derive(Debug, Clone, Default)]
pub struct NavigationRecord {
    pub status: u16,
    pub headers: IndexMap<String, String>,
}

impl NavigationRecord {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// One browser page plus its session cookie jar, as consumed by the pipeline.
///
/// Every blocking operation takes an explicit timeout; implementations are
/// expected to abort their underlying work at that boundary and report it as
/// [`SolverError::Timeout`](crate::SolverError::Timeout).
pub trait PageDriver {
    /// Navigate to `url`, returning the navigation response if one exists
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<Option<NavigationRecord>>;

    /// Block until the page reaches `state` or the timeout elapses
    fn wait_for_load_state(&mut self, state: LoadState, timeout: Duration) -> Result<()>;

    /// Evaluate a JavaScript expression in the page
    fn evaluate(&self, script: &str) -> Result<serde_json::Value>;

    /// The page's current URL
    fn current_url(&self) -> String;

    /// The page's current title
    fn title(&self) -> Result<String>;

    /// Rendered page content (outer HTML)
    fn content(&self) -> Result<String>;

    /// The session-wide cookie jar
    fn cookies(&self) -> Result<Vec<Cookie>>;

    /// Raw transport-level body of the last navigation response.
    ///
    /// May fail even when a [`NavigationRecord`] exists; callers fall back
    /// to [`content`](Self::content).
    fn response_body(&self) -> Result<String>;
}

/// External challenge-bypass capability
pub trait ChallengeSolver {
    /// Attempt to get the page past an interstitial challenge.
    ///
    /// `attempts` and `delay` parameterize the checkbox-wait policy; the
    /// whole attempt is bounded by `timeout`.
    fn solve(
        &self,
        page: &mut dyn PageDriver,
        kind: ChallengeKind,
        attempts: u32,
        delay: Duration,
        timeout: Duration,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_case_insensitive() {
        let mut headers = IndexMap::new();
        headers.insert("Set-Cookie".to_string(), "a=1".to_string());
        headers.insert("content-type".to_string(), "text/html".to_string());
        let record = NavigationRecord { status: 200, headers };

        assert_eq!(record.header("set-cookie"), Some("a=1"));
        assert_eq!(record.header("SET-COOKIE"), Some("a=1"));
        assert_eq!(record.header("Content-Type"), Some("text/html"));
        assert_eq!(record.header("x-missing"), None);
    }
}
