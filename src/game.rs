use std::{cmp::max, io::{Stdout, Write}, thread::sleep};

use anyhow::{Context, Result, ensure};
use crossterm::event::KeyEvent;
use crossterm::style::Color;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::Coords;
use crate::apple_log::AppleLog;
use crate::config::{Config, Pacing};
use crate::field::Field;
use crate::food;
use crate::input::{self, Command, KeySource, TermKeys};
use crate::snake::{Snake, Direction::{*, self}, MoveResult::{*, self}};
use crate::term::{TermError, TermManager, TermResult};

const SNAKE_BODY_CHAR: char = '█';
const APPLE_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';
const SNAKE_COLOR: Color = Color::Green;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    PlayAgain,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Step {
    Moved,
    GameOver { won: bool },
}

#[derive(Debug, PartialEq, Eq)]
enum RoundEnd {
    Quit,
    Over { won: bool },
}

pub struct SnakeGame<W: Write = Stdout, K: KeySource = TermKeys> {
    field: Field,
    paused: bool,
    term: TermManager<W>,
    keys: K,
    apples: AppleLog,
    config: Config,
    rng: StdRng,
    snake: Snake,
    apple: Coords,
    dir_change: Option<Direction>,
}

impl<W: Write, K: KeySource> SnakeGame<W, K> {
    pub fn new(term: TermManager<W>, keys: K, apples: AppleLog, config: Config, mut rng: StdRng) -> Result<Self> {
        let (width, height) = term.size();
        let field = Field::new(width, height)?;
        let (snake, apple) = new_round(&field, config.initial_length, &mut rng)?;

        Ok(SnakeGame {
            field,
            paused: false,
            term,
            keys,
            apples,
            config,
            rng,
            snake,
            apple,
            dir_change: None,
        })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup().context("failed to set up terminal")?;

        let records = self.apples.records()?;
        info!(path = %self.apples.path().display(), apples = records.len(), "loaded apple log");
        for &(row, col) in &records {
            debug!(row, col, "logged apple");
        }

        Ok(())
    }

    pub fn show_intro(&mut self) -> Result<Outcome> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "q or CTRL+C to quit",
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines)?;
        let key = self.keys.read_key_blocking()?;
        self.term.hide_message()?;

        Ok(if input::is_quit(&key) { Outcome::Quit } else { Outcome::PlayAgain })
    }

    pub fn play(&mut self) -> Result<Outcome> {
        let (snake, apple) = new_round(&self.field, self.config.initial_length, &mut self.rng)?;
        self.snake = snake;
        self.apple = apple;
        self.dir_change = None;
        self.paused = false;

        self.term.clear()?;
        self.term.draw_borders()?;
        self.render(None)?;
        info!(pacing = ?self.config.pacing, cells = self.field.cell_count(), head = ?self.snake.head(), apple = ?self.apple, "round started");

        let end = match self.config.pacing {
            Pacing::Timed => self.run_timed()?,
            Pacing::Keypress => self.run_keypress()?,
        };

        match end {
            RoundEnd::Quit => return Ok(Outcome::Quit),
            RoundEnd::Over { won } => self.game_over(won)?,
        }

        let key = self.keys.read_key_blocking()?;
        Ok(if input::is_quit(&key) { Outcome::Quit } else { Outcome::PlayAgain })
    }

    ///////////////////////////////////////////////////////////////////////////

    fn run_timed(&mut self) -> Result<RoundEnd> {
        let mut ticks_until_step = self.config.step_ticks;

        loop {
            sleep(self.config.tick_interval());

            for key_ev in self.keys.read_key_events_queue()? {
                if self.handle_key(&key_ev)? == Command::Quit {
                    return Ok(RoundEnd::Quit);
                }
            }

            if self.paused { continue; }

            // Not paused, count down til the next game update
            ticks_until_step -= 1;
            if ticks_until_step > 0 { continue; }

            if let Step::GameOver { won } = self.step()? {
                return Ok(RoundEnd::Over { won });
            }
            ticks_until_step = self.step_interval();
        }
    }

    fn run_keypress(&mut self) -> Result<RoundEnd> {
        loop {
            let key_ev = self.keys.read_key_blocking()?;

            match self.handle_key(&key_ev)? {
                Command::Quit => return Ok(RoundEnd::Quit),
                Command::Pause => continue,
                Command::Steer(_) if self.paused => continue,
                Command::Steer(_) => {}
            }

            if let Step::GameOver { won } = self.step()? {
                return Ok(RoundEnd::Over { won });
            }
        }
    }

    fn handle_key(&mut self, ev: &KeyEvent) -> Result<Command> {
        let command = input::command_for(ev);

        match command {
            Command::Quit => info!(score = self.score(), "quit requested"),
            Command::Pause => self.toggle_pause()?,
            Command::Steer(code) => {
                let current = self.snake.get_direction();
                let resolved = input::resolve_direction(code, current);
                if resolved != current {
                    self.dir_change = Some(resolved);
                }
            }
        }

        Ok(command)
    }

    fn step(&mut self) -> Result<Step> {
        if let Some(dir) = self.dir_change.take() {
            self.snake.set_direction(dir);
        }

        let move_res = self.snake.move_step(&self.field, self.apple);

        match &move_res {
            Crashed(crash) => {
                info!(?crash, score = self.score(), "snake crashed");
                return Ok(Step::GameOver { won: false });
            },
            Moved { new_head, .. } if move_res.ate() => {
                debug!(row = new_head.0, col = new_head.1, length = self.snake.len(), "ate apple");

                match food::relocate(&self.field, &self.snake, &mut self.apples, &mut self.rng)? {
                    Some(apple) => self.apple = apple,
                    None => {
                        // No more apples to spawn
                        info!(score = self.score(), "field filled");
                        self.render(Some(&move_res))?;
                        return Ok(Step::GameOver { won: true });
                    }
                }
            },
            Moved { .. } => {},
        }

        self.render(Some(&move_res))?;
        Ok(Step::Moved)
    }

    /// Ticks until the next step: fewer as the score grows, more when moving
    /// vertically since terminal cells are taller than they are wide.
    fn step_interval(&self) -> u64 {
        let ticks = max(self.config.step_ticks.saturating_sub(self.score() / 7), 1);

        if matches!(self.snake.get_direction(), Up | Down) {
            (ticks as f64 * 1.35).ceil() as u64
        } else {
            ticks
        }
    }

    fn score(&self) -> u64 {
        (self.snake.len() as u64).saturating_sub(self.config.initial_length as u64)
    }

    fn render(&mut self, mov: Option<&MoveResult>) -> Result<()> {
        if let Some(Moved { old_tail: Some(tail), .. }) = mov {
            skip_off_screen(self.term.print_at(*tail, ' '))?;
        }

        let head_char = self.snake.head_char();
        for (i, pos) in self.snake.body().iter().enumerate() {
            let ch = if i == 0 { head_char } else { SNAKE_BODY_CHAR };
            skip_off_screen(self.term.print_colored_at(*pos, ch, SNAKE_COLOR))?;
        }

        self.term.print_at(self.apple, APPLE_CHAR).context("failed to draw food")?;
        self.term.flush()?;
        Ok(())
    }

    fn game_over(&mut self, won: bool) -> Result<()> {
        let s = if won {"You won!"} else {"Game over!"};

        if !won {
            for pos in self.snake.body().iter() {
                skip_off_screen(self.term.print_at(*pos, DEAD_SNAKE_CHAR))?;
            }
        }

        self.term.show_message(&[
            s,
            &*format!("Score: {}", self.score()),
            "",
            "Press any key to play again,",
            "or q to quit."
        ])?;
        Ok(())
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or q to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        debug!(paused = self.paused, "pause toggled");
        Ok(())
    }
}

/// Snake segments may sit off screen; those are just not drawn.
fn skip_off_screen(res: TermResult<()>) -> TermResult<()> {
    match res {
        Err(TermError::OutOfBounds { .. }) => Ok(()),
        res => res,
    }
}

/// A snake heading right from a quarter of the way across, and its first food.
fn new_round(field: &Field, length: u16, rng: &mut StdRng) -> Result<(Snake, Coords)> {
    let length = length.min(i16::MAX as u16);
    let head = (field.height() / 2, max(field.width() / 4, length as i16));
    ensure!(field.contains(head), "terminal is too narrow for a snake of length {}", length);

    let snake = Snake::new(head, length, Right);
    let apple = food::initial_food(field, &snake, rng).context("no room left for food")?;
    Ok((snake, apple))
}
