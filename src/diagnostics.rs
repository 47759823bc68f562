//! Append-only log file for connection and error events.
//!
//! Entries are single lines stamped with local time:
//! `[YYYY-MM-DD HH:MM:SS] <message>`. HTTP headers use GMT instead; the two
//! clocks are intentionally different.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

pub struct LogSink {
    path: PathBuf,
    file: File,
}

impl LogSink {
    /// Opens `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    /// Appends one entry. A failed write is reported but never propagated.
    pub fn log(&mut self, message: &str) {
        tracing::info!(target: "liso::log", "{}", message);

        let line = format_entry(&Local::now().format("%Y-%m-%d %H:%M:%S").to_string(), message);
        if let Err(e) = self.file.write_all(line.as_bytes()) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to append log entry");
        }
    }
}

fn format_entry(timestamp: &str, message: &str) -> String {
    // Entries must stay on one line.
    let message = message.replace(['\r', '\n'], " ");
    format!("[{}] {}\n", timestamp, message)
}
