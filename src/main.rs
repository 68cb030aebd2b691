mod apple_log;
mod config;
mod field;
mod food;
mod game;
mod input;
mod snake;
mod term;

use std::{fs::File, path::Path, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use apple_log::AppleLog;
use config::Config;
use game::{Outcome, SnakeGame};
use input::TermKeys;
use term::TermManager;

/// A `(row, column)` cell on the screen.
pub type Coords = (i16, i16);

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.log_file.as_deref())?;

    let apples = AppleLog::open(&config.apple_log)?;
    let term = TermManager::stdout(!config.no_color)?;
    let mut game = SnakeGame::new(term, TermKeys, apples, config, StdRng::from_entropy())?;
    game.initialize()?;

    // Dropping the game restores the terminal, whichever way we leave
    if game.show_intro()? == Outcome::PlayAgain {
        while game.play()? == Outcome::PlayAgain {}
    }

    info!("bye");
    Ok(())
}

/// The screen belongs to the game, so logs only go to a file when asked for.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
