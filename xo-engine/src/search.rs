//! Minimax search with alpha-beta pruning
//!
//! Scores are always relative to O, the computer: O maximizes, X minimizes.
//! A win for O found `depth` plies below the root scores `10 - depth`, a win
//! for X scores `depth - 10` and a draw scores `0`, so the search prefers
//! the quickest win and the slowest loss.

use tracing::debug;
use xo_core::{empty_cells, winner, Board, Mark};

/// Base score of a decided game before the depth adjustment
pub const WIN_SCORE: i32 = 10;

const INFINITY: i32 = i32::MAX;

/// Depth-first minimax searcher
///
/// The board is explored in place: each ply places a mark, recurses, then
/// takes the mark back, so siblings always see the same position.
#[derive(Debug, Default)]
pub struct Minimax {
    nodes: u64,
}

impl Minimax {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes visited since this searcher was created
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Optimal cell for `side`, or `None` when the board has no empty cell
    ///
    /// Each candidate is searched with a full window, and only a strictly
    /// better score replaces the current pick, so ties go to the lowest
    /// index. The board is restored before returning.
    pub fn best_move(&mut self, board: &mut Board, side: Mark) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;

        for cell in empty_cells(board) {
            board.put(cell, side);
            let score = self.minimax(board, 0, -INFINITY, INFINITY, side.opponent() == Mark::O);
            board.take(cell);

            let improves = match best {
                None => true,
                Some((_, best_score)) => match side {
                    Mark::O => score > best_score,
                    Mark::X => score < best_score,
                },
            };
            if improves {
                best = Some((cell, score));
            }
        }

        if let Some((cell, score)) = best {
            debug!(%side, cell, score, nodes = self.nodes, "search finished");
        }
        best.map(|(cell, _)| cell)
    }

    /// Minimax value of `board` with `board.side_to_move()` to play
    pub fn value(&mut self, board: &mut Board) -> i32 {
        let maximizing = board.side_to_move() == Mark::O;
        self.minimax(board, 0, -INFINITY, INFINITY, maximizing)
    }

    /// Recursive alpha-beta search
    ///
    /// `alpha` is the best score O can already guarantee on this path and
    /// `beta` the best X can guarantee. Remaining siblings are cut once
    /// `beta <= alpha`.
    pub fn minimax(
        &mut self,
        board: &mut Board,
        depth: i32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;

        if let Some(score) = terminal_score(board, depth) {
            return score;
        }

        if maximizing {
            let mut max_eval = -INFINITY;
            for cell in empty_cells(board) {
                board.put(cell, Mark::O);
                let eval = self.minimax(board, depth + 1, alpha, beta, false);
                board.take(cell);
                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
            max_eval
        } else {
            let mut min_eval = INFINITY;
            for cell in empty_cells(board) {
                board.put(cell, Mark::X);
                let eval = self.minimax(board, depth + 1, alpha, beta, true);
                board.take(cell);
                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
            min_eval
        }
    }
}

/// Score of a decided position, `None` while play continues
fn terminal_score(board: &Board, depth: i32) -> Option<i32> {
    match winner(board) {
        Some(Mark::O) => Some(WIN_SCORE - depth),
        Some(Mark::X) => Some(depth - WIN_SCORE),
        None if board.is_full() => Some(0),
        None => None,
    }
}

/// Optimal cell for `side` on a copy of `board`
pub fn best_move(board: &Board, side: Mark) -> Option<usize> {
    let mut scratch = *board;
    Minimax::new().best_move(&mut scratch, side)
}

/// Minimax value of `board` for the side to move, relative to O
pub fn value(board: &Board) -> i32 {
    let mut scratch = *board;
    Minimax::new().value(&mut scratch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_board_opening_is_corner_or_center() {
        let cell = best_move(&Board::new(), Mark::O).unwrap();
        assert!([0, 2, 4, 6, 8].contains(&cell), "opened on edge {cell}");
    }

    #[test]
    fn test_empty_board_is_a_draw() {
        assert_eq!(value(&Board::new()), 0);
    }

    #[test]
    fn test_takes_immediate_win() {
        // O completes the middle row instead of blocking X's top row
        let b = board("XX./OO./X..");
        assert_eq!(best_move(&b, Mark::O), Some(5));
    }

    #[test]
    fn test_blocks_immediate_threat() {
        let b = board("XX./.O./...");
        assert_eq!(best_move(&b, Mark::O), Some(2));
    }

    #[test]
    fn test_x_side_takes_win() {
        let b = board("XX./OO./...");
        assert_eq!(best_move(&b, Mark::X), Some(2));
    }

    #[test]
    fn test_answers_corner_opening_with_center() {
        // Every other reply to a corner opening loses
        let b = board("X../.../...");
        assert_eq!(best_move(&b, Mark::O), Some(4));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let b = board("XOX/XOO/OXX");
        assert_eq!(best_move(&b, Mark::O), None);
    }

    #[test]
    fn test_board_restored_after_search() {
        let mut b = board("X...O...X");
        let before = b;
        let mut search = Minimax::new();
        search.best_move(&mut b, Mark::O);
        assert_eq!(b, before);
        assert!(search.nodes() > 0);
    }

    #[test]
    fn test_terminal_scores_depend_on_depth() {
        let o_wins = board("XX./OOO/X..");
        assert_eq!(terminal_score(&o_wins, 2), Some(8));
        let x_wins = board("XXX/OO./...");
        assert_eq!(terminal_score(&x_wins, 3), Some(-7));
        assert_eq!(terminal_score(&board("XOX/XOO/OXX"), 9), Some(0));
        assert_eq!(terminal_score(&Board::new(), 0), None);
    }
}
