//! Move-selection engine and match controller for tic-tac-toe
//!
//! - `search`: minimax with alpha-beta pruning
//! - `agent`: random, greedy and perfect strategies behind the `Agent` trait
//! - `difficulty`: `Weak | Medium | Perfect` dispatch
//! - `engine`: stateless round API for a presentation layer
//! - `controller`: rounds, score and match winner

pub mod agent;
pub mod controller;
pub mod difficulty;
pub mod engine;
pub mod search;

// Re-export main types for convenience
pub use agent::{Agent, GreedyAgent, PerfectAgent, RandomAgent};
pub use controller::{Champion, MatchConfig, MatchController, MatchState, Score};
pub use difficulty::Difficulty;
pub use engine::{computer_move, new_round, submit_player_move, MoveOutcome};
pub use search::{best_move, Minimax};

pub use xo_core::{Board, Cell, EngineError, GameResult, InvalidMove, Mark};
