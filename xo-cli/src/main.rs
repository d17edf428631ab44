use anyhow::Result;
use clap::Parser;
use std::io;
use tracing::{error, info};

mod config;
mod session;

use crate::config::Config;
use crate::session::{run_interactive, run_selfplay};

fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Validate configuration
    config.validate()?;

    // Initialize tracing on stderr so the board keeps stdout to itself
    tracing_subscriber::fmt()
        .with_max_level(config.log_level()?)
        .with_writer(io::stderr)
        .init();

    let match_config = config.match_config()?;
    info!(
        difficulty = %match_config.difficulty,
        win_threshold = match_config.win_threshold,
        seed = ?match_config.seed,
        "configuration loaded"
    );

    let run_result = match config.selfplay {
        Some(matches) => run_selfplay(match_config, matches, config.opponent).map(|report| {
            println!("{report}");
        }),
        None => run_interactive(match_config, io::stdin().lock(), io::stdout().lock()),
    };

    match run_result {
        Ok(()) => {
            info!("Session finished");
            Ok(())
        }
        Err(e) => {
            error!("Session failed: {}", e);
            Err(e)
        }
    }
}
