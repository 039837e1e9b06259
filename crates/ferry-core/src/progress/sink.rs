//! Where rendered progress frames go.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

pub trait ProgressSink {
    /// Replace the previously drawn frame with `lines`.
    fn draw(&mut self, lines: &[String]);

    /// Erase whatever the last frame left on screen.
    fn clear(&mut self);
}

/// Redraws in place on stderr using ANSI cursor movement.
#[derive(Debug, Default)]
pub struct TerminalSink {
    drawn: usize,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn erase(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.drawn > 0 {
            write!(out, "\x1b[{}A\x1b[J", self.drawn)?;
        }
        self.drawn = 0;
        Ok(())
    }
}

impl ProgressSink for TerminalSink {
    fn draw(&mut self, lines: &[String]) {
        let mut out = io::stderr().lock();
        let res = self.erase(&mut out).and_then(|_| {
            for line in lines {
                writeln!(out, "{line}")?;
            }
            out.flush()
        });
        if res.is_ok() {
            self.drawn = lines.len();
        }
    }

    fn clear(&mut self) {
        let mut out = io::stderr().lock();
        let _ = self.erase(&mut out).and_then(|_| out.flush());
    }
}

/// Keeps every frame in memory; clones share the same frame log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    frames: Arc<Mutex<Vec<Vec<String>>>>,
    cleared: Arc<Mutex<bool>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Vec<String>> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn was_cleared(&self) -> bool {
        *self.cleared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProgressSink for RecordingSink {
    fn draw(&mut self, lines: &[String]) {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(lines.to_vec());
    }

    fn clear(&mut self) {
        *self.cleared.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }
}
