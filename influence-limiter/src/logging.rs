//! User-facing run log
//!
//! The limiter reports what it is doing ("Removing influence from mesh", the
//! final confirmation, ...) through a [`Logger`] owned by the caller. A logger
//! fans each line out to any number of [`LogStream`]s. Developer diagnostics
//! go through `tracing` instead.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};

use bitflags::bitflags;

use crate::error::{Error, Result};

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Verbose debug information
    Debug,
    /// Informational messages
    Info,
    /// Warning messages
    Warn,
    /// Error messages
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "Debug",
            Self::Info => "Info",
            Self::Warn => "Warn",
            Self::Error => "Error",
        })
    }
}

/// Trait for custom log stream implementations
pub trait LogStream: Send {
    /// Write one formatted line, including its trailing newline
    fn write(&mut self, message: &str);
}

/// A log stream that writes to stdout
pub struct StdoutLogStream;

impl LogStream for StdoutLogStream {
    fn write(&mut self, message: &str) {
        print!("{}", message);
    }
}

/// A log stream that writes to stderr
pub struct StderrLogStream;

impl LogStream for StderrLogStream {
    fn write(&mut self, message: &str) {
        eprint!("{}", message);
    }
}

/// A log stream that appends to a file
pub struct FileLogStream {
    file: std::fs::File,
}

impl FileLogStream {
    /// Open (or create) a log file for appending
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .map_err(|e| {
                Error::io_error(format!(
                    "cannot open log file {}: {e}",
                    path.as_ref().display()
                ))
            })?;
        Ok(Self { file })
    }
}

impl LogStream for FileLogStream {
    fn write(&mut self, message: &str) {
        use std::io::Write;
        let _ = self.file.write_all(message.as_bytes());
        let _ = self.file.flush();
    }
}

/// A log stream that collects messages in memory
#[derive(Debug, Default)]
pub struct MemoryLogStream {
    messages: Vec<String>,
}

impl MemoryLogStream {
    /// Create a new memory log stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all collected messages
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Whether any collected message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|message| message.contains(needle))
    }

    /// Clear all collected messages
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl LogStream for MemoryLogStream {
    fn write(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

bitflags! {
    /// Standard streams attachable in one call
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DefaultLogStreams: u32 {
        /// Write to stdout
        const STDOUT = 0b001;
        /// Write to stderr
        const STDERR = 0b010;
        /// Append to a log file
        const FILE = 0b100;
    }
}

/// Fans log lines out to attached streams
#[derive(Clone)]
pub struct Logger {
    streams: Vec<Arc<Mutex<dyn LogStream>>>,
    min_level: LogLevel,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("streams", &self.streams.len())
            .field("min_level", &self.min_level)
            .finish()
    }
}

impl Logger {
    /// Create a logger without streams, accepting `Info` and above
    pub fn new() -> Self {
        Self {
            streams: Vec::new(),
            min_level: LogLevel::Info,
        }
    }

    /// Attach a log stream
    pub fn attach_stream(&mut self, stream: Arc<Mutex<dyn LogStream>>) -> &mut Self {
        self.streams.push(stream);
        self
    }

    /// Detach a previously attached stream
    pub fn detach_stream(&mut self, stream: &Arc<Mutex<dyn LogStream>>) {
        self.streams.retain(|s| !Arc::ptr_eq(s, stream));
    }

    /// Detach all log streams
    pub fn detach_all_streams(&mut self) {
        self.streams.clear();
    }

    /// Number of attached streams
    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    /// Enable or disable debug lines
    pub fn enable_verbose_logging(&mut self, enable: bool) {
        self.min_level = if enable {
            LogLevel::Debug
        } else {
            LogLevel::Info
        };
    }

    /// Drop lines below `level`
    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Write a line to every stream if `level` passes the filter
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        let line = format!("{level}: {message}\n");
        for stream in &self.streams {
            if let Ok(mut stream) = stream.lock() {
                stream.write(&line);
            }
        }
    }

    /// Log at `Debug`
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log at `Info`
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log at `Warn`
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Log at `Error`
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Attach the standard streams selected by `streams` to `logger`
///
/// `FILE` requires `file_path`.
pub fn attach_default_streams(
    logger: &mut Logger,
    streams: DefaultLogStreams,
    file_path: Option<&Path>,
) -> Result<()> {
    if streams.contains(DefaultLogStreams::STDOUT) {
        logger.attach_stream(Arc::new(Mutex::new(StdoutLogStream)));
    }
    if streams.contains(DefaultLogStreams::STDERR) {
        logger.attach_stream(Arc::new(Mutex::new(StderrLogStream)));
    }
    if streams.contains(DefaultLogStreams::FILE) {
        let path = file_path
            .ok_or_else(|| Error::invalid_argument("FILE log stream requires a path"))?;
        logger.attach_stream(Arc::new(Mutex::new(FileLogStream::new(path)?)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_stream_receives_lines() {
        let memory = Arc::new(Mutex::new(MemoryLogStream::new()));
        let mut logger = Logger::new();
        logger.attach_stream(memory.clone());

        logger.info("Removing influence from mesh");
        logger.debug("hidden");

        let stream = memory.lock().unwrap();
        assert_eq!(stream.messages(), ["Info: Removing influence from mesh\n"]);
    }

    #[test]
    fn test_verbose_logging_lets_debug_through() {
        let memory = Arc::new(Mutex::new(MemoryLogStream::new()));
        let mut logger = Logger::new();
        logger.attach_stream(memory.clone());
        logger.enable_verbose_logging(true);

        logger.debug("vertex body.vtx[0]");
        assert!(memory.lock().unwrap().contains("Debug: vertex body.vtx[0]"));
    }

    #[test]
    fn test_detach_stream() {
        let memory = Arc::new(Mutex::new(MemoryLogStream::new()));
        let as_stream: Arc<Mutex<dyn LogStream>> = memory.clone();
        let mut logger = Logger::new();
        logger.attach_stream(as_stream.clone());
        logger.detach_stream(&as_stream);

        logger.error("dropped");
        assert_eq!(logger.stream_count(), 0);
        assert!(memory.lock().unwrap().messages().is_empty());
    }

    #[test]
    fn test_file_stream_requires_path() {
        let mut logger = Logger::new();
        let result = attach_default_streams(&mut logger, DefaultLogStreams::FILE, None);
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn test_unopenable_log_file_is_io_error() {
        let path = std::env::temp_dir()
            .join("influence-limiter-missing-dir")
            .join("nested")
            .join("run.log");
        let result = FileLogStream::new(&path);
        assert!(matches!(result, Err(Error::IoError { .. })));
    }
}
