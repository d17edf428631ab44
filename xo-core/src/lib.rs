//! Core board types and rules for 3x3 tic-tac-toe
//!
//! This crate provides the pieces every strategy and controller builds on:
//! - `Board`: the grid plus turn bookkeeping
//! - `rules`: win, draw and legal-move predicates
//! - `EngineError`: the error taxonomy shared across the workspace

pub mod board;
pub mod error;
pub mod rules;

// Re-export main types for convenience
pub use board::{Board, Cell, Mark, CELLS, CENTER, CORNERS};
pub use error::{EngineError, InvalidMove, ParseBoardError};
pub use rules::{empty_cells, evaluate, has_won, is_draw, winner, GameResult, WIN_LINES};
