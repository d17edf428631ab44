//! Difficulty levels and their bound strategies

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use xo_core::{Board, EngineError};

use crate::agent::{self, Agent, GreedyAgent, PerfectAgent, RandomAgent};

/// Which strategy plays the computer's turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random empty cell
    Weak,
    /// Win, block, center, corner cascade
    Medium,
    /// Full minimax search, never loses
    #[default]
    Perfect,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Weak, Difficulty::Medium, Difficulty::Perfect];

    /// Build the agent bound to this level. `seed` only affects `Weak`.
    pub fn agent(self, seed: Option<u64>) -> Box<dyn Agent> {
        match self {
            Difficulty::Weak => match seed {
                Some(seed) => Box::new(RandomAgent::with_seed(seed)),
                None => Box::new(RandomAgent::new()),
            },
            Difficulty::Medium => Box::new(GreedyAgent),
            Difficulty::Perfect => Box::new(PerfectAgent),
        }
    }

    /// Select a move for the side to move with a caller-owned random source
    pub fn select_move<R: Rng + ?Sized>(self, board: &Board, rng: &mut R) -> Result<usize, EngineError> {
        match self {
            Difficulty::Weak => agent::random_move(board, rng),
            Difficulty::Medium => agent::greedy_move(board),
            Difficulty::Perfect => agent::perfect_move(board),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Weak => "weak",
            Difficulty::Medium => "medium",
            Difficulty::Perfect => "perfect",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weak" | "easy" => Ok(Difficulty::Weak),
            "medium" | "normal" => Ok(Difficulty::Medium),
            "perfect" | "hard" => Ok(Difficulty::Perfect),
            _ => Err(EngineError::InvalidDifficulty(s.to_string())),
        }
    }
}
