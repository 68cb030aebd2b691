use crate::snake::Direction::{self, *};
use crate::term::TermResult;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, read, poll};

/// Where key presses come from.
pub trait KeySource {
    fn read_key_blocking(&mut self) -> TermResult<KeyEvent>;

    /// Keys already waiting, without blocking.
    fn read_key_events_queue(&mut self) -> TermResult<Vec<KeyEvent>>;
}

/// Keys from the terminal.
pub struct TermKeys;

impl KeySource for TermKeys {
    fn read_key_blocking(&mut self) -> TermResult<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    fn read_key_events_queue(&mut self) -> TermResult<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }
}

/// Scripted keys, handed out one per tick.
#[cfg(test)]
impl KeySource for std::collections::VecDeque<KeyEvent> {
    fn read_key_blocking(&mut self) -> TermResult<KeyEvent> {
        self.pop_front().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "no more keys").into()
        })
    }

    fn read_key_events_queue(&mut self) -> TermResult<Vec<KeyEvent>> {
        Ok(self.pop_front().into_iter().collect())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Pause,
    Steer(KeyCode),
}

pub fn command_for(ev: &KeyEvent) -> Command {
    match ev {
        ev if is_quit(ev) => Command::Quit,
        KeyEvent { code: KeyCode::Esc, .. } => Command::Pause,
        KeyEvent { code, .. } => Command::Steer(*code),
    }
}

pub fn is_quit(ev: &KeyEvent) -> bool {
    matches!(
        ev,
        KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL }
            | KeyEvent { code: KeyCode::Char('q'), .. }
            | KeyEvent { code: KeyCode::Char('Q'), .. }
    )
}

pub fn key_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('w') | KeyCode::Up => Some(Up),
        KeyCode::Char('a') | KeyCode::Left => Some(Left),
        KeyCode::Char('s') | KeyCode::Down => Some(Down),
        KeyCode::Char('d') | KeyCode::Right => Some(Right),
        _ => None,
    }
}

/// Direction after pressing `code` while heading `prev`. Keys that don't
/// steer, and turns straight back, leave `prev` as it is.
pub fn resolve_direction(code: KeyCode, prev: Direction) -> Direction {
    match key_direction(code) {
        Some(dir) => prev.turn(dir),
        None => prev,
    }
}
