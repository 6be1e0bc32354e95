//! Error types and result alias for the crate

use thiserror::Error;

/// Errors that can occur while resolving a URL through the browser
#[derive(Debug, Error)]
pub enum SolverError {
    /// Failed to launch the browser process
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Tab creation or lookup failed
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// Navigation to a URL failed for a non-timeout reason
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// JavaScript evaluation in the page failed
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    /// Raw transport body could not be read for the last navigation
    #[error("Response body unavailable: {0}")]
    BodyUnavailable(String),

    /// A bounded step exceeded its share of the request deadline
    #[error("Timed out while solving the challenge: {0}")]
    Timeout(String),

    /// The solver could not get past the challenge page within budget
    #[error("Challenge could not be solved: {0}")]
    ChallengeUnsolved(String),

    /// The health probe resolved but the final status was not OK
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

impl SolverError {
    /// Whether this error should surface to callers as a timeout.
    ///
    /// Budget exhaustion anywhere in the sequential chain is reported as a
    /// single failure kind, so an unsolved challenge counts as a timeout too.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::ChallengeUnsolved(_))
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SolverError>;
