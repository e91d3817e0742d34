//! # Point Ingestion
//!
//! The boundary arrives one point per line as two comma-separated
//! non-negative decimal integers:
//!
//! ```text
//! 0,0
//! 0,10
//! 5,10
//! 0        <- end of input: a lone integer, no comma
//! ```
//!
//! A blank line also ends the input, so a trailing newline before end of
//! file is harmless.
//!
//! Malformed lines are rejected with a [`Fault::MalformedLine`] naming
//! the offending line number.

use crate::boundary::{Boundary, Point};
use crate::config::LINE_CAPACITY;
use crate::diag::Console;
use crate::error::{Fault, Result};

/// One decoded input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// A boundary point.
    Point(Point),
    /// The end-of-input marker, carrying its (ignored) integer.
    End(u32),
    /// A blank line, which ends the input like the marker.
    Blank,
}

fn coordinate(text: &str, line: usize) -> Result<u32> {
    let text = text.trim_matches(|c: char| c == ' ' || c == '\t');
    if text.is_empty() {
        return Err(Fault::MalformedLine { line, reason: "missing coordinate" });
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Fault::MalformedLine { line, reason: "expected a decimal integer" });
    }
    text.parse()
        .map_err(|_| Fault::MalformedLine { line, reason: "coordinate out of range" })
}

/// Decode one line. `line` is its one-based number, used in faults.
///
/// # Errors
/// [`Fault::CapacityExceeded`] for lines longer than `LINE_CAPACITY`
/// bytes, [`Fault::MalformedLine`] for anything else that is not
/// `x,y`, a lone integer or blank.
pub fn parse_line(text: &str, line: usize) -> Result<Line> {
    let text = text.trim_end_matches(['\r', '\n']);
    if text.len() > LINE_CAPACITY {
        return Err(Fault::CapacityExceeded {
            resource: "input line",
            capacity: LINE_CAPACITY,
        });
    }
    if text.trim_matches(|c: char| c == ' ' || c == '\t').is_empty() {
        return Ok(Line::Blank);
    }
    match text.split_once(',') {
        Some((x, y)) => Ok(Line::Point(Point::new(coordinate(x, line)?, coordinate(y, line)?))),
        None => Ok(Line::End(coordinate(text, line)?)),
    }
}

/// Incremental reader that accumulates points until the end marker.
#[derive(Debug)]
pub struct Ingest {
    boundary: Boundary,
    lines: usize,
    finished: bool,
}

impl Ingest {
    /// A reader with an empty boundary.
    pub const fn new() -> Self {
        Self { boundary: Boundary::new(), lines: 0, finished: false }
    }

    /// Consume one line. Returns `false` once the end marker or a blank
    /// line was seen; later lines are ignored.
    pub fn feed(&mut self, text: &str) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        self.lines += 1;
        match parse_line(text, self.lines)? {
            Line::Point(point) => {
                self.boundary.push(point)?;
                Ok(true)
            }
            Line::End(_) | Line::Blank => {
                self.finished = true;
                Ok(false)
            }
        }
    }

    /// Points read so far.
    #[inline]
    pub fn count(&self) -> usize {
        self.boundary.len()
    }

    /// True once the end marker has been read.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Hand over the boundary read so far.
    pub fn finish(self) -> Boundary {
        self.boundary
    }
}

impl Default for Ingest {
    fn default() -> Self {
        Self::new()
    }
}

fn progress<C: Console>(console: &mut C, ingest: &Ingest) {
    let _ = write!(console, "\r{}", ingest.count());
}

fn summary<C: Console>(console: &mut C, ingest: &Ingest) {
    let _ = write!(console, "\n{} points\n", ingest.count());
}

/// Read a boundary from in-memory lines (firmware tables, tests).
/// Running out of lines ends the input like the end marker does.
pub fn ingest_lines<'a, I, C>(lines: I, mut console: C) -> Result<Boundary>
where
    I: IntoIterator<Item = &'a str>,
    C: Console,
{
    let mut ingest = Ingest::new();
    for text in lines {
        if !ingest.feed(text)? {
            break;
        }
        progress(&mut console, &ingest);
    }
    summary(&mut console, &ingest);
    Ok(ingest.finish())
}

/// Read a boundary from a byte stream. End of stream ends the input like
/// the end marker does.
#[cfg(feature = "std")]
pub fn read_boundary<R, C>(mut reader: R, mut console: C) -> Result<Boundary>
where
    R: std::io::BufRead,
    C: Console,
{
    let mut ingest = Ingest::new();
    let mut text = String::with_capacity(LINE_CAPACITY + 2);
    loop {
        text.clear();
        if reader.read_line(&mut text)? == 0 || !ingest.feed(&text)? {
            break;
        }
        progress(&mut console, &ingest);
    }
    summary(&mut console, &ingest);
    log_event!(info, points = ingest.count(), "boundary ingested");
    Ok(ingest.finish())
}
