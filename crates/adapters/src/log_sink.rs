//! Line sinks for console output.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// A sink that receives pre-formatted lines.
pub trait LineSink: Send + Sync {
    /// Write a line to the sink.
    fn write_line(&self, line: &str);
}

/// Line sink that writes to stderr.
#[derive(Debug, Default)]
pub struct StderrLineSink;

impl LineSink for StderrLineSink {
    fn write_line(&self, line: &str) {
        let mut stderr = std::io::stderr();
        if let Err(error) = stderr.write_all(line.as_bytes()) {
            eprintln!("line sink write failed: {error}");
        }
    }
}

/// Line sink over any writer.
#[derive(Debug)]
pub struct WriterLineSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterLineSink<W> {
    /// Wrap a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> LineSink for WriterLineSink<W> {
    fn write_line(&self, line: &str) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writer.write_all(line.as_bytes()).and_then(|()| writer.flush());
    }
}
