//! Stateless round API for a presentation layer
//!
//! Every call takes a board by reference and hands back a new one together
//! with its freshly computed result. Rejected calls return an error and no
//! board, so the caller's copy is never touched.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use xo_core::{evaluate, Board, EngineError, GameResult, InvalidMove, Mark};

use crate::difficulty::Difficulty;

/// Board after a move plus the result it implies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub board: Board,
    /// Cell that was just played
    pub cell: usize,
    pub result: GameResult,
}

/// Fresh empty board for a new round
pub fn new_round() -> Board {
    Board::new()
}

/// Apply the human player's X at `cell`
pub fn submit_player_move(board: &Board, cell: usize) -> Result<MoveOutcome, EngineError> {
    apply(board, cell, Mark::X)
}

/// Let the computer place its O according to `difficulty`
///
/// `rng` is only drawn from at `Difficulty::Weak`.
pub fn computer_move<R: Rng + ?Sized>(
    board: &Board,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<MoveOutcome, EngineError> {
    if board.is_terminal() {
        return Err(EngineError::NoLegalMove);
    }
    if board.side_to_move() != Mark::O {
        return Err(InvalidMove::WrongTurn { expected: Mark::X }.into());
    }

    let cell = difficulty.select_move(board, rng)?;
    debug!(%difficulty, cell, "computer selected move");
    apply(board, cell, Mark::O)
}

fn apply(board: &Board, cell: usize, mark: Mark) -> Result<MoveOutcome, EngineError> {
    let mut next = *board;
    next.place(cell, mark)?;
    Ok(MoveOutcome {
        board: next,
        cell,
        result: evaluate(&next),
    })
}
