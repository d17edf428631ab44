//! Error taxonomy shared by the board, the agents and the match controller
//!
//! Wins, draws and ongoing rounds are ordinary `GameResult` values, never
//! errors. Everything here is local to the caller and recoverable.

use crate::board::Mark;

/// Why a move was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMove {
    #[error("cell {0} is out of range, expected 0..=8")]
    OutOfRange(usize),
    #[error("cell {0} is already occupied")]
    Occupied(usize),
    #[error("the round is already over")]
    RoundOver,
    #[error("it is {expected}'s turn")]
    WrongTurn { expected: Mark },
}

/// Error type for engine operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid move: {0}")]
    InvalidMove(#[from] InvalidMove),
    /// An agent was asked to move on a board with no empty cell or a decided
    /// result. This is a caller contract violation.
    #[error("No legal move: the board is terminal")]
    NoLegalMove,
    #[error("Invalid difficulty: {0:?}")]
    InvalidDifficulty(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(&'static str),
}

/// Error type for building a board from text or from raw cells
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseBoardError {
    #[error("Invalid board length: expected 9 cells but got {0}")]
    InvalidLength(usize),
    #[error("Invalid board cell: {0:?}")]
    InvalidCell(char),
    #[error("Impossible mark counts: {x} X against {o} O")]
    TurnOrder { x: usize, o: usize },
    #[error("Impossible position: both sides have a line")]
    BothWon,
    #[error("Impossible position: a move was made after {0} won")]
    MoveAfterWin(Mark),
}
