//! The "apples" file: an append-only text log with one `row column` pair per
//! line. Every third line count, eating food appends a fresh random cell.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{debug, warn};

use crate::Coords;
use crate::field::Field;

pub struct AppleLog {
    file: File,
    path: PathBuf,
}

impl AppleLog {
    /// Opens the log for reading and appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .with_context(|| format!("failed to open apple log {}", path.display()))?;

        Ok(AppleLog { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn line_count(&mut self) -> Result<usize> {
        self.file.seek(SeekFrom::Start(0))?;
        BufReader::new(&self.file)
            .split(b'\n')
            .try_fold(0, |count, line| line.map(|_| count + 1))
            .with_context(|| format!("failed to read apple log {}", self.path.display()))
    }

    pub fn records(&mut self) -> Result<Vec<Coords>> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut records = vec![];

        for (i, line) in BufReader::new(&self.file).split(b'\n').enumerate() {
            let line = line.with_context(|| format!("failed to read apple log {}", self.path.display()))?;
            let line = String::from_utf8_lossy(&line);
            if line.trim().is_empty() {
                continue;
            }

            match parse_record(&line) {
                Some(pos) => records.push(pos),
                None => warn!(line = i + 1, content = %line, "skipping malformed apple record"),
            }
        }

        Ok(records)
    }

    /// Called whenever food is eaten. Appends a random cell of `field` when
    /// the current line count is a multiple of three.
    pub fn record_eaten<R: Rng + ?Sized>(&mut self, field: &Field, rng: &mut R) -> Result<Option<Coords>> {
        let count = self.line_count()?;
        if count % 3 != 0 {
            return Ok(None);
        }

        let apple = field.random_cell(rng);
        self.append(apple)
            .with_context(|| format!("failed to write apple log {}", self.path.display()))?;
        debug!(row = apple.0, col = apple.1, lines = count + 1, "logged apple");

        Ok(Some(apple))
    }

    ///////////////////////////////////////////////////////////////////////////

    fn append(&mut self, (row, col): Coords) -> Result<()> {
        if !self.ends_with_newline()? {
            self.file.write_all(b"\n")?;
        }

        writeln!(self.file, "{} {}", row, col)?;
        self.file.flush()?;
        Ok(())
    }

    fn ends_with_newline(&mut self) -> Result<bool> {
        if self.file.metadata()?.len() == 0 {
            return Ok(true);
        }

        let mut last = [0u8; 1];
        self.file.seek(SeekFrom::End(-1))?;
        self.file.read_exact(&mut last)?;
        Ok(last[0] == b'\n')
    }
}

fn parse_record(line: &str) -> Option<Coords> {
    let mut parts = line.split_whitespace();
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;

    if parts.next().is_some() {
        return None;
    }

    Some((row, col))
}
