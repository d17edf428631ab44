use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::Level;
use xo_engine::{Difficulty, MatchConfig};

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "xo")]
#[command(about = "Tic-tac-toe against a minimax engine")]
#[command(long_about = "Play tic-tac-toe as X against the computer (O).

Rounds continue until one side reaches the win threshold. With --selfplay
the human is replaced by an automated opponent and a summary is printed.")]
pub struct Config {
    /// TOML file with match settings (difficulty, win_threshold, seed)
    #[arg(long, env = "XO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Computer difficulty (weak, medium, perfect)
    #[arg(long, env = "XO_DIFFICULTY")]
    pub difficulty: Option<Difficulty>,

    /// Rounds needed to win the match
    #[arg(long, env = "XO_WIN_THRESHOLD")]
    pub win_threshold: Option<u32>,

    /// Seed for the random agents
    #[arg(long, env = "XO_SEED")]
    pub seed: Option<u64>,

    /// Play this many matches automatically instead of reading stdin
    #[arg(long, env = "XO_SELFPLAY")]
    pub selfplay: Option<u32>,

    /// Strategy playing X in self-play
    #[arg(long, env = "XO_OPPONENT", default_value = "weak")]
    pub opponent: Difficulty,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "XO_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.log_level()?;

        if self.win_threshold == Some(0) {
            return Err(anyhow!("win_threshold must be greater than 0"));
        }

        if self.selfplay == Some(0) {
            return Err(anyhow!("selfplay must be greater than 0"));
        }

        Ok(())
    }

    pub fn log_level(&self) -> Result<Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow!("invalid log level: {}", self.log_level))
    }

    /// Match settings from the config file, overridden by explicit flags
    pub fn match_config(&self) -> Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                toml::from_str::<MatchConfig>(&text)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => MatchConfig::default(),
        };

        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(win_threshold) = self.win_threshold {
            config.win_threshold = win_threshold;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        if config.win_threshold == 0 {
            return Err(anyhow!("win_threshold must be greater than 0"));
        }

        Ok(config)
    }
}
