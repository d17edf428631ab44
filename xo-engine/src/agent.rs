//! Move-selection strategies for the computer
//!
//! Agents always move for `board.side_to_move()` and refuse terminal boards
//! with `EngineError::NoLegalMove`.

use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use xo_core::{empty_cells, has_won, Board, EngineError, Mark, CENTER, CORNERS};

use crate::search::Minimax;

/// Trait for move-selection strategies
pub trait Agent: Send + Sync {
    /// Select a cell index for the side to move
    fn select_move(&mut self, board: &Board) -> Result<usize, EngineError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Empty cells of a board that is still in play
fn legal_cells(board: &Board) -> Result<Vec<usize>, EngineError> {
    if board.is_terminal() {
        return Err(EngineError::NoLegalMove);
    }
    Ok(empty_cells(board))
}

/// Uniformly random empty cell
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Result<usize, EngineError> {
    let cells = legal_cells(board)?;
    cells.choose(rng).copied().ok_or(EngineError::NoLegalMove)
}

/// Priority cascade: win, block, center, first free corner, first free cell
pub fn greedy_move(board: &Board) -> Result<usize, EngineError> {
    let cells = legal_cells(board)?;
    let me = board.side_to_move();

    if let Some(cell) = winning_cell(board, &cells, me) {
        return Ok(cell);
    }
    if let Some(cell) = winning_cell(board, &cells, me.opponent()) {
        return Ok(cell);
    }
    if cells.contains(&CENTER) {
        return Ok(CENTER);
    }
    if let Some(&corner) = CORNERS.iter().find(|corner| cells.contains(corner)) {
        return Ok(corner);
    }
    cells.first().copied().ok_or(EngineError::NoLegalMove)
}

/// First cell in `cells` that completes a line for `mark`
fn winning_cell(board: &Board, cells: &[usize], mark: Mark) -> Option<usize> {
    let mut scratch = *board;
    cells.iter().copied().find(|&cell| {
        scratch.put(cell, mark);
        let wins = has_won(&scratch, mark);
        scratch.take(cell);
        wins
    })
}

/// Minimax-optimal cell
pub fn perfect_move(board: &Board) -> Result<usize, EngineError> {
    legal_cells(board)?;
    let mut scratch = *board;
    Minimax::new()
        .best_move(&mut scratch, board.side_to_move())
        .ok_or(EngineError::NoLegalMove)
}

/// Agent that plays uniformly at random among empty cells
pub struct RandomAgent {
    rng: ChaCha20Rng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Deterministic agent for tests and reproducible self-play
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_move(&mut self, board: &Board) -> Result<usize, EngineError> {
        random_move(board, &mut self.rng)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Agent following the win/block/center/corner cascade
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyAgent;

impl Agent for GreedyAgent {
    fn select_move(&mut self, board: &Board) -> Result<usize, EngineError> {
        greedy_move(board)
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}

/// Agent backed by the full minimax search
#[derive(Debug, Default, Clone, Copy)]
pub struct PerfectAgent;

impl Agent for PerfectAgent {
    fn select_move(&mut self, board: &Board) -> Result<usize, EngineError> {
        perfect_move(board)
    }

    fn name(&self) -> &'static str {
        "perfect"
    }
}
