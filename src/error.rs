use thiserror::Error;

/// Reasons a puzzle description is rejected before any search begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("puzzle has no tubes")]
    NoTubes,
    #[error("tube {tube} has zero capacity")]
    ZeroCapacity { tube: usize },
    #[error("tube {tube} holds {size} units but its capacity is {capacity}")]
    Overfilled {
        tube: usize,
        size: usize,
        capacity: usize,
    },
    #[error("tube {tube}: invalid token {token:?}")]
    InvalidToken { tube: usize, token: String },
    #[error("tube {tube}: free slot below liquid")]
    Gap { tube: usize },
    #[error("color {color} has {count} units, which no set of tubes can hold exactly")]
    InconsistentColors { color: String, count: usize },
}

pub type Result<T> = std::result::Result<T, PuzzleError>;

/// Returned by [`crate::model::Tube::pour`] when the pour is illegal.
/// This is an ordinary outcome used to filter candidate moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not pourable")]
pub struct NotPourable;
