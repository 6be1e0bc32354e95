//! Browser launch options and challenge-solving policy

use std::path::PathBuf;
use std::time::Duration;

/// Page titles served by known bot-challenge interstitials.
///
/// Detection is an exact match against this list. Localized or versioned
/// challenge pages are not covered.
pub const CHALLENGE_TITLES: &[&str] = &[
    "Just a moment...",
    "DDoS-Guard",
    "Attention Required! | Cloudflare",
    "Verifying you are human",
];

/// Whether a page title identifies a challenge interstitial
pub fn is_challenge_title(title: &str) -> bool {
    CHALLENGE_TITLES.contains(&title)
}

/// Options for launching a browser instance
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run the browser in headless mode
    pub headless: bool,

    /// Browser window width in pixels
    pub window_width: u32,

    /// Browser window height in pixels
    pub window_height: u32,

    /// Path to the Chrome/Chromium binary (auto-detected when `None`)
    pub chrome_path: Option<PathBuf>,

    /// Persistent user data directory
    pub user_data_dir: Option<PathBuf>,

    /// Whether to run Chrome with its sandbox enabled
    pub sandbox: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            chrome_path: None,
            user_data_dir: None,
            sandbox: true,
        }
    }
}

impl LaunchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    pub fn user_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_data_dir = Some(dir.into());
        self
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }
}

/// Checkbox-wait policy handed to the challenge solver
#[derive(Debug, Clone, Copy)]
pub struct SolvePolicy {
    /// Number of checkbox click attempts
    pub checkbox_attempts: u32,

    /// Delay between checkbox attempts
    pub checkbox_delay: Duration,
}

impl Default for SolvePolicy {
    fn default() -> Self {
        Self { checkbox_attempts: 1, checkbox_delay: Duration::from_millis(500) }
    }
}
