use crate::utils::time::log_timestamp;
use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Prefix of every diagnostic line
pub const LOG_PREFIX: &str = "OPENHOURS";

/// Destination for diagnostic lines
pub trait LogSink: Send + Sync {
    /// Emit one fully formatted line
    fn emit(&self, line: &str);
}

/// Sink that forwards diagnostic lines to `tracing`
#[derive(Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, line: &str) {
        info!(target: "openhours", "{}", line);
    }
}

/// Sink that keeps every line in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines emitted so far
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LogSink for MemorySink {
    fn emit(&self, line: &str) {
        // A poisoned lock still holds usable data
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(line.to_string());
    }
}

/// Silence-gated diagnostic channel
pub struct DiagnosticLog {
    silent: AtomicBool,
    sink: Arc<dyn LogSink>,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl std::fmt::Debug for DiagnosticLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticLog")
            .field("silent", &self.is_silent())
            .finish()
    }
}

impl DiagnosticLog {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self::with_silence(sink, false)
    }

    /// A log with the given initial silence, set without announcement
    pub fn with_silence(sink: Arc<dyn LogSink>, silent: bool) -> Self {
        Self {
            silent: AtomicBool::new(silent),
            sink,
        }
    }

    /// A log that starts out silenced
    pub fn silenced() -> Self {
        Self::with_silence(Arc::new(TracingSink), true)
    }

    pub fn is_silent(&self) -> bool {
        self.silent.load(Ordering::Relaxed)
    }

    /// Emit a timestamped line unless silenced
    pub fn log(&self, message: &str) {
        if self.is_silent() {
            return;
        }
        let line = format!("{} [{}] : {}", LOG_PREFIX, log_timestamp(&Local::now()), message);
        self.sink.emit(&line);
    }

    /// Toggle silence, announcing the change on whichever side is audible
    pub fn set_silence(&self, silence: bool) {
        if silence {
            self.log("Silenced");
            self.silent.store(true, Ordering::Relaxed);
        } else {
            self.silent.store(false, Ordering::Relaxed);
            self.log("Unsilenced");
        }
    }

    /// Clear the silence flag without emitting anything
    pub fn force_unsilence(&self) {
        self.silent.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_log() -> (DiagnosticLog, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (DiagnosticLog::new(sink.clone()), sink)
    }

    #[test]
    fn test_log_format() {
        let (log, sink) = memory_log();
        log.log("hello");

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("OPENHOURS ["));
        assert!(lines[0].ends_with("] : hello"));
    }

    #[test]
    fn test_silence_suppresses_output() {
        let (log, sink) = memory_log();
        log.set_silence(true);
        log.log("not shown");

        // Only the "Silenced" announcement gets through
        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Silenced"));
    }

    #[test]
    fn test_unsilence_announces() {
        let (log, sink) = memory_log();
        log.set_silence(true);
        log.set_silence(false);

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("Unsilenced"));
        assert!(!log.is_silent());
    }

    #[test]
    fn test_force_unsilence_is_quiet() {
        let (log, sink) = memory_log();
        log.set_silence(true);
        log.force_unsilence();

        assert!(!log.is_silent());
        assert_eq!(sink.lines().len(), 1);
    }
}
