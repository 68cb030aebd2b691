use crate::Coords;
use std::io::{self, Stdout, Write, stdout};

use anyhow::Context;
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum TermError {
    #[error("cell ({row}, {col}) is outside the {width}x{height} screen")]
    OutOfBounds { row: i16, col: i16, width: u16, height: u16 },
    #[error("terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),
    #[error("terminal i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type TermResult<T> = Result<T, TermError>;

/// Owns the screen: draws cells, keeps a copy of what's on it, and puts the
/// terminal back the way it found it when dropped.
pub struct TermManager<W: Write = Stdout> {
    width: u16,
    height: u16,
    out: W,
    screen: Vec<char>,
    current_msg: Option<Message>,
    color: bool,
    active: bool,
}

struct Message {
    top_left: Coords,
    width: i16,
    height: i16,
}

impl TermManager<Stdout> {
    pub fn stdout(color: bool) -> anyhow::Result<Self> {
        let (width, height) = terminal::size().context("failed to read terminal size")?;
        Ok(TermManager::with_writer(stdout(), width, height, color))
    }
}

impl<W: Write> TermManager<W> {
    pub fn with_writer(out: W, width: u16, height: u16, color: bool) -> Self {
        let screen = vec![' '; width as usize * height as usize];
        TermManager { width, height, out, screen, current_msg: None, color, active: false }
    }

    pub fn setup(&mut self) -> TermResult<()> {
        execute!(self.out, EnterAlternateScreen)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.out, cursor::Hide, cursor::DisableBlinking)?;
        Ok(())
    }

    pub fn restore(&mut self) -> TermResult<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode()?;
        execute!(self.out, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn contains(&self, pos: Coords) -> bool {
        let (row, col) = pos;
        row >= 0 && col >= 0 && (row as u16) < self.height && (col as u16) < self.width
    }

    pub fn draw_borders(&mut self) -> TermResult<()> {
        let end_row = self.height as i16 - 1;
        let end_col = self.width as i16 - 1;

        for col in 0..=end_col {
            let ch = if col == 0 || col == end_col {'+'} else {'-'};
            self.print_at((0, col), ch)?;
            self.print_at((end_row, col), ch)?;
        }

        for row in 1..end_row {
            self.print_at((row, 0), '|')?;
            self.print_at((row, end_col), '|')?;
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> TermResult<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let text_width = lines.iter().map(|x| x.chars().count()).max().unwrap_or(0);
        let msg_height = (lines.len() + 2).min(self.height as usize) as i16;
        let msg_width = (text_width + 2).min(self.width as usize) as i16;
        let top_left = (
            (self.height as i16 - msg_height) / 2,
            (self.width as i16 - msg_width) / 2,
        );

        // Blank box first, then the centered lines on top of it
        for row_diff in 0..msg_height {
            for col_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + row_diff, top_left.1 + col_diff), ' ')?;
            }
        }

        for (i, line) in lines.iter().enumerate().take(msg_height.saturating_sub(2) as usize) {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let row = top_left.0 + i as i16 + 1;
            for (col_diff, ch) in padded_line.chars().take(msg_width as usize).enumerate() {
                self.print_at_no_save((row, top_left.1 + col_diff as i16), ch)?;
            }
        }

        self.current_msg = Some(Message { width: msg_width, height: msg_height, top_left });
        self.flush()
    }

    pub fn hide_message(&mut self) -> TermResult<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Put back whatever the box was covering
        for row_diff in 0..msg.height {
            for col_diff in 0..msg.width {
                let pos = (msg.top_left.0 + row_diff, msg.top_left.1 + col_diff);
                let ch = self.screen[self.index(pos)];
                self.print_at_no_save(pos, ch)?;
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: Coords, ch: char) -> TermResult<()> {
        self.check_bounds(pos)?;
        queue!(self.out, cursor::MoveTo(pos.1 as u16, pos.0 as u16), style::Print(ch))?;
        let idx = self.index(pos);
        self.screen[idx] = ch;
        Ok(())
    }

    /// Like `print_at`, falling back to the default color when color is off.
    pub fn print_colored_at(&mut self, pos: Coords, ch: char, color: Color) -> TermResult<()> {
        if !self.color {
            return self.print_at(pos, ch);
        }

        self.check_bounds(pos)?;
        queue!(
            self.out,
            cursor::MoveTo(pos.1 as u16, pos.0 as u16),
            style::SetForegroundColor(color),
            style::Print(ch),
            style::ResetColor
        )?;
        let idx = self.index(pos);
        self.screen[idx] = ch;
        Ok(())
    }

    #[cfg(test)]
    pub fn char_at(&self, pos: Coords) -> Option<char> {
        if self.contains(pos) {
            Some(self.screen[self.index(pos)])
        } else {
            None
        }
    }

    pub fn clear(&mut self) -> TermResult<()> {
        execute!(self.out, terminal::Clear(ClearType::All))?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> TermResult<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> TermResult<()> {
        // Message boxes go straight to the terminal so the buffer keeps
        // what's underneath them
        self.check_bounds(pos)?;
        queue!(self.out, cursor::MoveTo(pos.1 as u16, pos.0 as u16), style::Print(ch))?;
        Ok(())
    }

    fn check_bounds(&self, pos: Coords) -> TermResult<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(TermError::OutOfBounds { row: pos.0, col: pos.1, width: self.width, height: self.height })
        }
    }

    fn index(&self, pos: Coords) -> usize {
        self.width as usize * pos.0 as usize + pos.1 as usize
    }
}

impl<W: Write> Drop for TermManager<W> {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            error!(%err, "failed to restore terminal");
        }
    }
}
