//! Stateless game rules: win detection, draw detection, legal moves
//!
//! Every function here is a pure read over a borrowed board.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Mark, CELLS};

/// Winning positions (rows, columns, diagonals)
pub const WIN_LINES: [[usize; 3]; 8] = [
    // rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Outcome of a round as seen from the human player (X)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    InProgress,
    PlayerWin,
    ComputerWin,
    Draw,
}

impl GameResult {
    pub fn is_terminal(self) -> bool {
        self != GameResult::InProgress
    }
}

/// True iff some line holds `mark` in all three cells
pub fn has_won(board: &Board, mark: Mark) -> bool {
    let cell = Cell::from(mark);
    let cells = board.cells();
    WIN_LINES
        .iter()
        .any(|line| line.iter().all(|&index| cells[index] == cell))
}

/// The side holding a complete line, if any
pub fn winner(board: &Board) -> Option<Mark> {
    [Mark::X, Mark::O]
        .into_iter()
        .find(|&mark| has_won(board, mark))
}

/// True iff the board is full and nobody has won
pub fn is_draw(board: &Board) -> bool {
    winner(board).is_none() && board.is_full()
}

/// Empty cell indices in ascending order
pub fn empty_cells(board: &Board) -> Vec<usize> {
    (0..CELLS)
        .filter(|&index| board.cells()[index].is_empty())
        .collect()
}

/// Classify the board. A completed line always wins over a full board.
pub fn evaluate(board: &Board) -> GameResult {
    match winner(board) {
        Some(Mark::X) => GameResult::PlayerWin,
        Some(Mark::O) => GameResult::ComputerWin,
        None if board.is_full() => GameResult::Draw,
        None => GameResult::InProgress,
    }
}
