use crate::factor::FactorId;
use crate::history::MomentId;
use crate::transition::TransitionId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building a universe or navigating a session.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A factor with the same label already exists.
    #[error("factor already declared: \"{0}\"")]
    DuplicateFactor(String),

    /// A factor was declared without any possible values.
    #[error("factor \"{0}\" declares no values")]
    EmptyFactor(String),

    /// A condition or effect refers to a factor that is not part of the universe.
    #[error("unknown factor: {0}")]
    UnknownFactor(FactorId),

    /// The requested transition ID does not exist in the universe.
    #[error("unknown transition: {0}")]
    UnknownTransition(TransitionId),

    /// The moment is not (or no longer) part of the session history.
    #[error("moment {0} is not part of this history")]
    UnknownMoment(MomentId),
}
