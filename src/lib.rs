//! # unflare
//!
//! A FlareSolverr-compatible proxy that fetches URLs through a real browser,
//! defeating bot-challenge interstitials, and returns the resulting page plus
//! cookies in the shape classic scrape clients expect (status, headers,
//! cookies, body).
//!
//! ## How it works
//!
//! One incoming request gets a single deadline. The resolution pipeline
//! spends it across a strict sequence of blocking steps: navigate, wait for
//! DOM content, wait for network idle, detect and solve a challenge page.
//! Each step receives the *remaining* budget, so slow early steps shrink
//! what later ones get. At the end, cookies from the browser's live jar and
//! from the raw `Set-Cookie` response header are reconciled into one
//! de-duplicated set.
//!
//! ## Running the server
//!
//! ```bash
//! # Headless browser, FlareSolverr default port
//! cargo run --bin unflare
//!
//! # Visible browser (useful for debugging)
//! cargo run --bin unflare -- --headed
//! ```
//!
//! Then POST a FlareSolverr-style request:
//!
//! ```bash
//! curl -X POST http://localhost:8191/v1 \
//!   -H 'Content-Type: application/json' \
//!   -d '{"cmd": "request.get", "url": "https://example.com", "maxTimeout": 60}'
//! ```
//!
//! ## Library usage
//!
//! ```rust,no_run
//! use unflare::browser::{DriverSession, InterstitialSolver, LaunchOptions};
//! use unflare::pipeline::ChallengePipeline;
//!
//! # fn main() -> unflare::Result<()> {
//! let session = DriverSession::launch(LaunchOptions::default())?;
//! let mut pipeline = ChallengePipeline::new(session, InterstitialSolver);
//!
//! let response = pipeline.resolve("https://example.com", 60)?;
//! println!("status {}, {} cookies", response.solution.status, response.solution.cookies.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`pipeline`]: the challenge-resolution pipeline - **start here**
//! - [`browser`]: browser/solver capability traits and the CDP-backed driver
//! - [`budget`]: deadline budgeting across sequential blocking steps
//! - [`cookies`]: Set-Cookie parsing and jar/header reconciliation
//! - [`api`]: FlareSolverr-compatible request/response models
//! - [`error`]: error types and result alias
//! - [`server`]: axum HTTP service (requires the `server` feature)

pub mod api;
pub mod browser;
pub mod budget;
pub mod cookies;
pub mod error;
pub mod pipeline;

#[cfg(feature = "server")]
pub mod server;

pub use api::{HealthcheckResponse, LinkRequest, LinkResponse, Solution};
pub use browser::{
    ChallengeKind, ChallengeSolver, DriverSession, InterstitialSolver, LaunchOptions, LoadState,
    NavigationRecord, PageDriver, SolvePolicy,
};
pub use budget::DeadlineBudget;
pub use cookies::{Cookie, merge_cookies, parse_set_cookie};
pub use error::{Result, SolverError};
pub use pipeline::{ChallengeOutcome, ChallengePipeline};
