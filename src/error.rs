use thiserror::Error;

/// Errors surfaced by the search core and the bundled game adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MctsError {
    /// A non-terminal state offered no legal moves (broken game implementation).
    #[error("no legal moves in a non-terminal state")]
    NoLegalMoves,

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

/// Convenience Result type for search operations.
pub type Result<T> = std::result::Result<T, MctsError>;
