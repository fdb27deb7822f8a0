//! Per-batch logger with file and callback output.
//!
//! One logger lives for one batch run:
//! - writes to `<logs_folder>/batch_<timestamp>.log` when a folder is given
//! - sends every line to the callback (GUI log pane)
//! - filters progress lines in compact mode
//! - keeps a tail of recent engine output for failure diagnosis

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

pub struct BatchLogger {
    log_path: Mutex<Option<PathBuf>>,
    file_writer: Mutex<Option<BufWriter<File>>>,
    callback: Option<LogCallback>,
    config: LogConfig,
    tail_buffer: Mutex<VecDeque<String>>,
    /// Last progress value written (compact mode filtering).
    last_progress: Mutex<u32>,
}

impl BatchLogger {
    /// Create a logger writing to a new file in `log_dir`.
    pub fn new(
        log_dir: impl AsRef<Path>,
        batch_name: &str,
        config: LogConfig,
        callback: Option<LogCallback>,
    ) -> std::io::Result<Self> {
        let logger = Self::without_file(config, callback);
        logger.open_file(log_dir, batch_name)?;
        Ok(logger)
    }

    /// Create a logger with callback output only.
    pub fn without_file(config: LogConfig, callback: Option<LogCallback>) -> Self {
        Self {
            log_path: Mutex::new(None),
            file_writer: Mutex::new(None),
            callback,
            tail_buffer: Mutex::new(VecDeque::with_capacity(config.error_tail)),
            last_progress: Mutex::new(0),
            config,
        }
    }

    /// Start writing to `<log_dir>/<name>.log`, replacing any open file.
    pub fn open_file(&self, log_dir: impl AsRef<Path>, name: &str) -> std::io::Result<()> {
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(name)));
        let file = File::create(&log_path)?;

        self.flush();
        *self.file_writer.lock() = Some(BufWriter::new(file));
        *self.log_path.lock() = Some(log_path);
        Ok(())
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_path.lock().clone()
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }
        let formatted = self.format_message(message);
        self.output(&formatted);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    pub fn phase(&self, name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Phase.format(name));
    }

    pub fn section(&self, name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Section.format(name));
    }

    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    /// Log a progress update.
    ///
    /// In compact mode only step boundaries (and 100%) are written. Returns
    /// whether the line was written.
    pub fn progress(&self, percent: u32) -> bool {
        if self.config.compact {
            let mut last = self.last_progress.lock();
            let step = self.config.progress_step.max(1);
            let current_step = (percent / step) * step;
            let last_step = (*last / step) * step;

            if current_step <= last_step && percent < 100 {
                return false;
            }
            *last = percent;
        }

        self.log(LogLevel::Info, &format!("Progress: {}%", percent));
        true
    }

    /// Restart progress filtering (new job).
    pub fn reset_progress(&self) {
        *self.last_progress.lock() = 0;
    }

    /// A message produced by the engine. Always forwarded; also kept in the
    /// tail buffer.
    pub fn engine_message(&self, line: &str) {
        {
            let mut buffer = self.tail_buffer.lock();
            if self.config.error_tail > 0 {
                if buffer.len() >= self.config.error_tail {
                    buffer.pop_front();
                }
                buffer.push_back(line.to_string());
            }
        }
        self.output(&self.format_message(line));
    }

    /// Replay the tail buffer under a header (after a failure).
    ///
    /// Compact mode only; in verbose mode every line was already shown.
    pub fn show_tail(&self, header: &str) {
        if !self.config.compact {
            return;
        }
        let lines: Vec<String> = self.tail_buffer.lock().iter().cloned().collect();
        if lines.is_empty() {
            return;
        }
        self.output(&self.format_message(&format!("[{}/tail]", header)));
        for line in &lines {
            self.output(&self.format_message(line));
        }
    }

    pub fn clear_tail(&self) {
        self.tail_buffer.lock().clear();
    }

    pub fn tail(&self) -> Vec<String> {
        self.tail_buffer.lock().iter().cloned().collect()
    }

    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writer.flush();
        }
    }

    /// Flush and release the file.
    pub fn close(&self) {
        self.flush();
        *self.file_writer.lock() = None;
    }

    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
        } else {
            message.to_string()
        }
    }

    fn output(&self, formatted: &str) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writeln!(writer, "{}", formatted);
        }
        if let Some(ref callback) = self.callback {
            callback(formatted);
        }
    }
}

impl Drop for BatchLogger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Replace characters that are unsafe in file names.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
