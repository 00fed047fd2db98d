//! Error types shared by the genome operators and the evolution engine.

use thiserror::Error;

/// Boxed error returned by caller-supplied fitness functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by this crate.
#[derive(Error, Debug)]
pub enum EvolveError {
    /// A construction or run parameter is malformed.
    ///
    /// Raised before the violating operation has any effect; values are
    /// never silently clamped.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The injected fitness capability failed.
    ///
    /// Carries the caller's error unchanged. The engine does not retry.
    #[error("fitness evaluation failed: {0}")]
    FitnessEvaluation(#[source] BoxError),

    /// A translator could not decode a gene.
    #[error("translation failed: {0}")]
    Translation(String),

    /// An injected policy broke its contract.
    #[error("policy violation: {0}")]
    Policy(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EvolveError>;

pub(crate) fn invalid(msg: impl Into<String>) -> EvolveError {
    EvolveError::InvalidArgument(msg.into())
}

/// Checks that `p` is a probability in `[0, 1]` (NaN is rejected).
pub(crate) fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be in [0, 1], got {p}")))
    }
}
