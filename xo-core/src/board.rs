//! 3x3 board state
//!
//! Cells are indexed 0-8 in row-major order (row = index / 3, col = index % 3).
//! X always moves first and turns alternate, so the X count is either equal
//! to the O count or exactly one more.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidMove, ParseBoardError};
use crate::rules;

/// Number of cells on the board
pub const CELLS: usize = 9;

/// Index of the center cell
pub const CENTER: usize = 4;

/// Corner indices in ascending order
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// The symbol a side places. X is the human player, O the computer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The other side
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => f.write_str("X"),
            Mark::O => f.write_str("O"),
        }
    }
}

/// Contents of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Mark::X),
            Cell::O => Some(Mark::O),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

/// The 3x3 grid
///
/// Plain data: results are always recomputed from the cells through
/// [`rules`], never stored next to them. Deserialization goes through the
/// same checks as parsing, so a decoded board is always reachable by play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "[Cell; 9]", into = "[Cell; 9]")]
pub struct Board {
    cells: [Cell; CELLS],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELLS],
        }
    }

    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    /// Get the cell at `index`, or `None` when out of range
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Number of cells holding `mark`
    pub fn count(&self, mark: Mark) -> usize {
        let cell = Cell::from(mark);
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Side whose turn it is, derived from the mark counts
    pub fn side_to_move(&self) -> Mark {
        if self.count(Mark::X) == self.count(Mark::O) {
            Mark::X
        } else {
            Mark::O
        }
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Whether a win or draw has been reached
    pub fn is_terminal(&self) -> bool {
        rules::evaluate(self).is_terminal()
    }

    /// Place `mark` at `index` after checking every board invariant
    ///
    /// On error the board is left untouched.
    pub fn place(&mut self, index: usize, mark: Mark) -> Result<(), InvalidMove> {
        if index >= CELLS {
            return Err(InvalidMove::OutOfRange(index));
        }
        if self.is_terminal() {
            return Err(InvalidMove::RoundOver);
        }
        if !self.cells[index].is_empty() {
            return Err(InvalidMove::Occupied(index));
        }
        let expected = self.side_to_move();
        if mark != expected {
            return Err(InvalidMove::WrongTurn { expected });
        }

        self.cells[index] = mark.into();
        Ok(())
    }

    /// Set an empty cell without validation. Paired with [`Board::take`] by
    /// backtracking search; everything else should go through [`Board::place`].
    ///
    /// The caller must pass an empty cell. Release builds do not check this
    /// and an occupied cell is overwritten.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range, or in debug builds if the cell is
    /// occupied.
    pub fn put(&mut self, index: usize, mark: Mark) {
        debug_assert!(self.cells[index].is_empty(), "put on occupied cell {index}");
        self.cells[index] = mark.into();
    }

    /// Clear a cell set by [`Board::put`]
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn take(&mut self, index: usize) {
        self.cells[index] = Cell::Empty;
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, cell) in cells.iter().enumerate() {
                if col > 0 {
                    f.write_str("|")?;
                }
                let symbol = match cell {
                    Cell::Empty => ".",
                    Cell::X => "X",
                    Cell::O => "O",
                };
                f.write_str(symbol)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parse nine cells from `X`, `O` and one of `.`, `_`, `-` for empty.
    /// Whitespace, `|` and `/` are ignored, so `Display` output parses back.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::with_capacity(CELLS);
        for ch in s.chars() {
            let cell = match ch {
                'X' | 'x' => Cell::X,
                'O' | 'o' => Cell::O,
                '.' | '_' | '-' => Cell::Empty,
                '|' | '/' => continue,
                c if c.is_whitespace() => continue,
                other => return Err(ParseBoardError::InvalidCell(other)),
            };
            cells.push(cell);
        }

        let cells: [Cell; CELLS] = cells
            .try_into()
            .map_err(|cells: Vec<Cell>| ParseBoardError::InvalidLength(cells.len()))?;
        Board::try_from(cells)
    }
}

impl TryFrom<[Cell; CELLS]> for Board {
    type Error = ParseBoardError;

    /// Accept only positions reachable by alternating play from the empty
    /// board. A completed line must be the last move made.
    fn try_from(cells: [Cell; CELLS]) -> Result<Self, Self::Error> {
        let board = Board { cells };

        let x = board.count(Mark::X);
        let o = board.count(Mark::O);
        if x != o && x != o + 1 {
            return Err(ParseBoardError::TurnOrder { x, o });
        }

        match (rules::has_won(&board, Mark::X), rules::has_won(&board, Mark::O)) {
            (true, true) => Err(ParseBoardError::BothWon),
            // X's winning mark is always the last one, so X must lead
            (true, false) if x == o => Err(ParseBoardError::MoveAfterWin(Mark::X)),
            (false, true) if x != o => Err(ParseBoardError::MoveAfterWin(Mark::O)),
            _ => Ok(board),
        }
    }
}

impl From<Board> for [Cell; CELLS] {
    fn from(board: Board) -> Self {
        board.cells
    }
}
