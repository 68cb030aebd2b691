use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum, value_parser};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Snake in the terminal", long_about = None)]
pub struct Config {
    /// File that collects a sample of food placements, one `row column` per line.
    #[arg(long, default_value = "apples")]
    pub apple_log: PathBuf,

    /// Milliseconds between input polls.
    #[arg(long, default_value_t = 5, value_parser = value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Polls per snake step at the start of a round; fewer as the score goes up.
    #[arg(long, default_value_t = 10, value_parser = value_parser!(u64).range(1..))]
    pub step_ticks: u64,

    /// Whether the snake moves on a timer or only when a key is pressed.
    #[arg(long, value_enum, default_value_t = Pacing::Timed)]
    pub pacing: Pacing,

    #[arg(long, default_value_t = 3, value_parser = value_parser!(u16).range(2..))]
    pub initial_length: u16,

    /// Draw the snake without color.
    #[arg(long)]
    pub no_color: bool,

    /// Write logs here. Filtered by RUST_LOG, `info` by default.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pacing {
    Timed,
    Keypress,
}

impl Config {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
