use anyhow::Result;
use std::fmt;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};
use xo_engine::{Champion, Difficulty, GameResult, MatchConfig, MatchController, MatchState};

/// Rounds after which a self-play match is abandoned as undecided
pub const MAX_ROUNDS_PER_MATCH: u32 = 100;

const HELP: &str = "Enter a cell 0-8 (row-major), 'n' for the next round, 'new' for a new match, 'q' to quit.";

/// Read moves from `input` and report to `output` until quit or end of input
pub fn run_interactive<R: BufRead, W: Write>(config: MatchConfig, input: R, mut output: W) -> Result<()> {
    let mut controller = MatchController::new(config);

    writeln!(output, "You play X, the computer plays O ({}).", controller.difficulty())?;
    writeln!(output, "{HELP}")?;
    writeln!(output, "{}", controller.board())?;

    for line in input.lines() {
        let line = line?;
        let command = line.trim();
        debug!(command, "input");

        match command {
            "" => continue,
            "q" | "quit" => break,
            "n" | "next" => match controller.start_next_round() {
                Ok(()) => writeln!(output, "Round {}\n{}", controller.round(), controller.board())?,
                Err(e) => writeln!(output, "{e}")?,
            },
            "new" => {
                controller.start_new_match();
                writeln!(output, "New match\n{}", controller.board())?;
            }
            other => match other.parse::<usize>() {
                Ok(cell) => match controller.submit_player_move(cell) {
                    Ok(result) => {
                        writeln!(output, "{}", controller.board())?;
                        report_result(&controller, result, &mut output)?;
                    }
                    Err(e) => writeln!(output, "{e}")?,
                },
                Err(_) => writeln!(output, "{HELP}")?,
            },
        }
    }

    Ok(())
}

fn report_result<W: Write>(controller: &MatchController, result: GameResult, output: &mut W) -> Result<()> {
    let message = match result {
        GameResult::InProgress => return Ok(()),
        GameResult::PlayerWin => "You won!",
        GameResult::ComputerWin => "Computer wins!",
        GameResult::Draw => "It's a draw!",
    };
    writeln!(
        output,
        "{message} Score: you {} - computer {}",
        controller.player_points(),
        controller.computer_points()
    )?;

    match controller.champion() {
        Some(Champion::Player) => writeln!(output, "Match over: you take it. Type 'new' to play again.")?,
        Some(Champion::Computer) => writeln!(output, "Match over: the computer takes it. Type 'new' to play again.")?,
        None => writeln!(output, "Type 'n' for the next round.")?,
    }
    Ok(())
}

/// Totals over a self-play run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SelfplayReport {
    pub matches: u32,
    pub rounds: u32,
    pub player_rounds: u32,
    pub computer_rounds: u32,
    pub draws: u32,
    pub player_champions: u32,
    pub computer_champions: u32,
    pub undecided: u32,
}

impl SelfplayReport {
    fn record_round(&mut self, result: GameResult) {
        match result {
            GameResult::PlayerWin => self.player_rounds += 1,
            GameResult::ComputerWin => self.computer_rounds += 1,
            GameResult::Draw => self.draws += 1,
            GameResult::InProgress => return,
        }
        self.rounds += 1;
    }
}

impl fmt::Display for SelfplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "matches: {} (player {}, computer {}, undecided {})",
            self.matches, self.player_champions, self.computer_champions, self.undecided
        )?;
        write!(
            f,
            "rounds: {} (player {}, computer {}, draws {})",
            self.rounds, self.player_rounds, self.computer_rounds, self.draws
        )
    }
}

/// Play `matches` matches with `opponent` standing in for the human
pub fn run_selfplay(config: MatchConfig, matches: u32, opponent: Difficulty) -> Result<SelfplayReport> {
    let mut player = opponent.agent(config.seed.map(|seed| seed.wrapping_add(1)));
    let mut controller = MatchController::new(config);
    let mut report = SelfplayReport::default();

    info!(matches, %opponent, difficulty = %controller.difficulty(), "starting self-play");

    for _ in 0..matches {
        while !controller.match_over() {
            if controller.state() == MatchState::RoundOver {
                if controller.round() >= MAX_ROUNDS_PER_MATCH {
                    break;
                }
                controller.start_next_round()?;
            }

            let cell = player.select_move(controller.board())?;
            let result = controller.submit_player_move(cell)?;
            report.record_round(result);
        }

        match controller.champion() {
            Some(Champion::Player) => report.player_champions += 1,
            Some(Champion::Computer) => report.computer_champions += 1,
            None => {
                warn!(rounds = controller.round(), "match abandoned without a champion");
                report.undecided += 1;
            }
        }
        report.matches += 1;
        if report.matches % 10 == 0 {
            info!("Completed {} matches", report.matches);
        }
        controller.start_new_match();
    }

    Ok(report)
}
