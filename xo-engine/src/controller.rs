//! Match controller
//!
//! Owns the board and the score for one match and is the only thing that
//! mutates them. The human plays X and always opens a round; the computer
//! answers in the same call, synchronously.
//!
//! ```text
//! AwaitingPlayerMove -> AwaitingComputerMove -> AwaitingPlayerMove
//!         |                     |
//!         +------> RoundOver <--+
//!                     |
//!       start_next_round / threshold reached
//!                     |
//!   AwaitingPlayerMove  or  MatchOver
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use xo_core::{evaluate, Board, EngineError, GameResult, InvalidMove, Mark};

use crate::agent::Agent;
use crate::difficulty::Difficulty;
use crate::engine;

/// Rounds a side must win to take the match
pub const DEFAULT_WIN_THRESHOLD: u32 = 3;

/// Where the controller is in the round/match cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchState {
    AwaitingPlayerMove,
    AwaitingComputerMove,
    RoundOver,
    MatchOver,
}

/// Winner of a whole match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Champion {
    Player,
    Computer,
}

/// Rounds won by each side in the current match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub player: u32,
    pub computer: u32,
}

/// Match settings, loadable from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub difficulty: Difficulty,
    pub win_threshold: u32,
    /// Seed for the weak agent's RNG; entropy when absent
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            win_threshold: DEFAULT_WIN_THRESHOLD,
            seed: None,
        }
    }
}

/// Round and score state machine for one human against one agent
pub struct MatchController {
    config: MatchConfig,
    agent: Box<dyn Agent>,
    board: Board,
    state: MatchState,
    score: Score,
    champion: Option<Champion>,
    last_result: GameResult,
    round: u32,
}

impl MatchController {
    /// Create a controller whose computer plays the configured difficulty
    pub fn new(config: MatchConfig) -> Self {
        let agent = config.difficulty.agent(config.seed);
        Self::with_agent(config, agent)
    }

    /// Create a controller around an arbitrary computer strategy
    pub fn with_agent(mut config: MatchConfig, agent: Box<dyn Agent>) -> Self {
        config.win_threshold = config.win_threshold.max(1);
        info!(
            difficulty = %config.difficulty,
            agent = agent.name(),
            win_threshold = config.win_threshold,
            "starting match"
        );
        Self {
            config,
            agent,
            board: engine::new_round(),
            state: MatchState::AwaitingPlayerMove,
            score: Score::default(),
            champion: None,
            last_result: GameResult::InProgress,
            round: 1,
        }
    }

    /// Play X at `cell`, then let the computer answer if the round goes on
    ///
    /// Rejected moves leave the board, score and state unchanged.
    pub fn submit_player_move(&mut self, cell: usize) -> Result<GameResult, EngineError> {
        match self.state {
            MatchState::AwaitingPlayerMove => {}
            MatchState::AwaitingComputerMove => {
                return Err(InvalidMove::WrongTurn { expected: Mark::O }.into());
            }
            MatchState::RoundOver | MatchState::MatchOver => {
                return Err(InvalidMove::RoundOver.into());
            }
        }

        let outcome = engine::submit_player_move(&self.board, cell)?;
        self.board = outcome.board;
        debug!(round = self.round, cell, "player moved");

        if outcome.result.is_terminal() {
            return Ok(self.finish_round(outcome.result));
        }

        self.state = MatchState::AwaitingComputerMove;
        self.play_computer_turn()
    }

    /// Run the computer's move. Only valid while awaiting the computer,
    /// which `submit_player_move` normally resolves on its own; exposed so a
    /// caller can retry after an agent error.
    pub fn play_computer_turn(&mut self) -> Result<GameResult, EngineError> {
        if self.state != MatchState::AwaitingComputerMove {
            return Err(EngineError::InvalidTransition("not the computer's turn"));
        }

        let cell = self.agent.select_move(&self.board)?;
        self.board.place(cell, Mark::O)?;
        debug!(round = self.round, cell, agent = self.agent.name(), "computer moved");

        let result = evaluate(&self.board);
        if result.is_terminal() {
            return Ok(self.finish_round(result));
        }

        self.state = MatchState::AwaitingPlayerMove;
        self.last_result = result;
        Ok(result)
    }

    fn finish_round(&mut self, result: GameResult) -> GameResult {
        self.last_result = result;
        match result {
            GameResult::PlayerWin => self.score.player += 1,
            GameResult::ComputerWin => self.score.computer += 1,
            GameResult::Draw | GameResult::InProgress => {}
        }

        let threshold = self.config.win_threshold;
        self.champion = if self.score.player >= threshold {
            Some(Champion::Player)
        } else if self.score.computer >= threshold {
            Some(Champion::Computer)
        } else {
            None
        };

        info!(
            round = self.round,
            ?result,
            player = self.score.player,
            computer = self.score.computer,
            "round over"
        );

        match self.champion {
            Some(champion) => {
                info!(?champion, "match over");
                self.state = MatchState::MatchOver;
            }
            None => self.state = MatchState::RoundOver,
        }
        result
    }

    /// Clear the board after a finished round, keeping the score
    pub fn start_next_round(&mut self) -> Result<(), EngineError> {
        match self.state {
            MatchState::RoundOver => {
                self.board = engine::new_round();
                self.last_result = GameResult::InProgress;
                self.round += 1;
                self.state = MatchState::AwaitingPlayerMove;
                debug!(round = self.round, "next round");
                Ok(())
            }
            MatchState::MatchOver => Err(EngineError::InvalidTransition("the match is over")),
            MatchState::AwaitingPlayerMove | MatchState::AwaitingComputerMove => {
                Err(EngineError::InvalidTransition("the round is still in progress"))
            }
        }
    }

    /// Reset board and score from any state
    pub fn start_new_match(&mut self) {
        self.board = engine::new_round();
        self.state = MatchState::AwaitingPlayerMove;
        self.score = Score::default();
        self.champion = None;
        self.last_result = GameResult::InProgress;
        self.round = 1;
        info!(difficulty = %self.config.difficulty, "starting new match");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn player_points(&self) -> u32 {
        self.score.player
    }

    pub fn computer_points(&self) -> u32 {
        self.score.computer
    }

    pub fn match_over(&self) -> bool {
        self.state == MatchState::MatchOver
    }

    pub fn champion(&self) -> Option<Champion> {
        self.champion
    }

    /// Result of the current round so far
    pub fn last_result(&self) -> GameResult {
        self.last_result
    }

    /// One-based round number within the match
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xo_core::empty_cells;

    /// Plays the first empty cell of a fixed preference list
    struct ScriptedAgent {
        preference: Vec<usize>,
    }

    impl ScriptedAgent {
        fn boxed(preference: &[usize]) -> Box<dyn Agent> {
            Box::new(Self {
                preference: preference.to_vec(),
            })
        }
    }

    impl Agent for ScriptedAgent {
        fn select_move(&mut self, board: &Board) -> Result<usize, EngineError> {
            let empty = empty_cells(board);
            self.preference
                .iter()
                .copied()
                .find(|cell| empty.contains(cell))
                .ok_or(EngineError::NoLegalMove)
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn play(controller: &mut MatchController, cells: &[usize]) -> GameResult {
        let mut result = GameResult::InProgress;
        for &cell in cells {
            result = controller.submit_player_move(cell).unwrap();
        }
        result
    }

    /// O walks the bottom rows while X takes the top row
    fn losing_computer() -> MatchController {
        MatchController::with_agent(MatchConfig::default(), ScriptedAgent::boxed(&[8, 7, 6, 5, 4, 3]))
    }

    #[test]
    fn test_initial_state() {
        let controller = MatchController::new(MatchConfig::default());
        assert_eq!(controller.state(), MatchState::AwaitingPlayerMove);
        assert_eq!(controller.board(), &Board::new());
        assert_eq!(controller.score(), Score::default());
        assert_eq!(controller.difficulty(), Difficulty::Perfect);
        assert_eq!(controller.round(), 1);
        assert!(!controller.match_over());
        assert_eq!(controller.champion(), None);
    }

    #[test]
    fn test_computer_answers_in_same_turn() {
        let mut controller = MatchController::new(MatchConfig::default());
        let result = controller.submit_player_move(0).unwrap();

        assert_eq!(result, GameResult::InProgress);
        assert_eq!(controller.state(), MatchState::AwaitingPlayerMove);
        assert_eq!(controller.board().count(Mark::X), 1);
        assert_eq!(controller.board().count(Mark::O), 1);
        // The only non-losing reply to a corner opening
        assert_eq!(controller.board().get(4), Some(xo_core::Cell::O));
    }

    #[test]
    fn test_player_win_scores_without_computer_turn() {
        let mut controller = losing_computer();
        let result = play(&mut controller, &[0, 1, 2]);

        assert_eq!(result, GameResult::PlayerWin);
        assert_eq!(controller.state(), MatchState::RoundOver);
        assert_eq!(controller.score(), Score { player: 1, computer: 0 });
        assert_eq!(controller.board().count(Mark::O), 2);
    }

    #[test]
    fn test_three_player_wins_end_the_match() {
        let mut controller = losing_computer();

        for round in 1..=3 {
            assert_eq!(controller.round(), round);
            assert_eq!(play(&mut controller, &[0, 1, 2]), GameResult::PlayerWin);
            if round < 3 {
                assert_eq!(controller.state(), MatchState::RoundOver);
                controller.start_next_round().unwrap();
            }
        }

        assert!(controller.match_over());
        assert_eq!(controller.champion(), Some(Champion::Player));
        assert_eq!(controller.player_points(), 3);
        assert_eq!(
            controller.start_next_round(),
            Err(EngineError::InvalidTransition("the match is over"))
        );
        assert_eq!(
            controller.submit_player_move(4),
            Err(EngineError::InvalidMove(InvalidMove::RoundOver))
        );
    }

    #[test]
    fn test_medium_computer_wins_match() {
        let config = MatchConfig {
            difficulty: Difficulty::Medium,
            ..MatchConfig::default()
        };
        let mut controller = MatchController::new(config);

        for round in 1..=3 {
            // O takes the center, then corner 0, then completes the diagonal at 8
            assert_eq!(play(&mut controller, &[1, 3, 5]), GameResult::ComputerWin);
            if round < 3 {
                controller.start_next_round().unwrap();
            }
        }

        assert_eq!(controller.computer_points(), 3);
        assert_eq!(controller.player_points(), 0);
        assert_eq!(controller.champion(), Some(Champion::Computer));
        assert_eq!(controller.state(), MatchState::MatchOver);
    }

    #[test]
    fn test_draw_leaves_score_unchanged() {
        let mut controller =
            MatchController::with_agent(MatchConfig::default(), ScriptedAgent::boxed(&[4, 1, 6, 5]));
        let result = play(&mut controller, &[0, 2, 7, 3, 8]);

        assert_eq!(result, GameResult::Draw);
        assert_eq!(controller.last_result(), GameResult::Draw);
        assert_eq!(controller.state(), MatchState::RoundOver);
        assert_eq!(controller.score(), Score::default());
    }

    #[test]
    fn test_invalid_moves_change_nothing() {
        let mut controller = losing_computer();
        controller.submit_player_move(0).unwrap();
        let board = *controller.board();

        assert_eq!(
            controller.submit_player_move(0),
            Err(EngineError::InvalidMove(InvalidMove::Occupied(0)))
        );
        assert_eq!(
            controller.submit_player_move(8),
            Err(EngineError::InvalidMove(InvalidMove::Occupied(8)))
        );
        assert_eq!(
            controller.submit_player_move(9),
            Err(EngineError::InvalidMove(InvalidMove::OutOfRange(9)))
        );
        assert_eq!(controller.board(), &board);
        assert_eq!(controller.state(), MatchState::AwaitingPlayerMove);
    }

    #[test]
    fn test_round_transitions_are_guarded() {
        let mut controller = losing_computer();
        assert_eq!(
            controller.start_next_round(),
            Err(EngineError::InvalidTransition("the round is still in progress"))
        );
        assert_eq!(
            controller.play_computer_turn(),
            Err(EngineError::InvalidTransition("not the computer's turn"))
        );

        play(&mut controller, &[0, 1, 2]);
        assert_eq!(
            controller.submit_player_move(5),
            Err(EngineError::InvalidMove(InvalidMove::RoundOver))
        );

        controller.start_next_round().unwrap();
        assert_eq!(controller.board(), &Board::new());
        assert_eq!(controller.last_result(), GameResult::InProgress);
        assert_eq!(controller.round(), 2);
        assert_eq!(controller.player_points(), 1);
    }

    #[test]
    fn test_new_match_resets_from_any_state() {
        let mut controller = losing_computer();
        play(&mut controller, &[0, 1, 2]);
        controller.start_next_round().unwrap();
        controller.submit_player_move(4).unwrap();

        controller.start_new_match();
        assert_eq!(controller.state(), MatchState::AwaitingPlayerMove);
        assert_eq!(controller.score(), Score::default());
        assert_eq!(controller.board(), &Board::new());
        assert_eq!(controller.champion(), None);
        assert_eq!(controller.round(), 1);
    }

    #[test]
    fn test_custom_threshold() {
        let config = MatchConfig {
            win_threshold: 1,
            ..MatchConfig::default()
        };
        let mut controller = MatchController::with_agent(config, ScriptedAgent::boxed(&[8, 7, 6]));
        play(&mut controller, &[0, 1, 2]);
        assert_eq!(controller.champion(), Some(Champion::Player));
    }

    #[test]
    fn test_zero_threshold_is_raised_to_one() {
        let config = MatchConfig {
            win_threshold: 0,
            ..MatchConfig::default()
        };
        let controller = MatchController::new(config);
        assert_eq!(controller.config().win_threshold, 1);
    }

    #[test]
    fn test_config_from_toml() {
        let config: MatchConfig = toml::from_str("difficulty = \"medium\"\nseed = 7\n").unwrap();
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert_eq!(config.win_threshold, DEFAULT_WIN_THRESHOLD);
        assert_eq!(config.seed, Some(7));

        let empty: MatchConfig = toml::from_str("").unwrap();
        assert_eq!(empty, MatchConfig::default());
    }
}
