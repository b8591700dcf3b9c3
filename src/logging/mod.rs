//! Diagnostic output control
//!
//! This module provides the [`Logger`] used for every diagnostic the tool
//! emits. All of it goes to stderr: stdout is reserved for the tag table and
//! the add-tag confirmation so that both stay scriptable.

use std::time::{Duration, Instant};

/// Logger responsible for all diagnostic output
#[derive(Debug, Clone)]
pub struct Logger {
    pub verbose: bool,
    pub quiet: bool,
    pub start_time: Option<Instant>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Logger {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            quiet: false,
            start_time: Some(Instant::now()),
        }
    }

    pub fn new_quiet() -> Self {
        Self {
            verbose: false,
            quiet: true,
            start_time: Some(Instant::now()),
        }
    }

    /// Main section heading
    pub fn section(&self, title: &str) {
        if self.verbose && !self.quiet {
            eprintln!("\n=== {} ===", title);
        }
    }

    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            self.emit("INFO", message);
        }
    }

    /// Warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            self.emit("WARN", message);
        }
    }

    /// Error message, printed even in quiet mode
    pub fn error(&self, message: &str) {
        eprintln!("{}", message);
    }

    /// Detailed information (only shown in verbose mode)
    pub fn detail(&self, message: &str) {
        if self.verbose && !self.quiet {
            eprintln!("   {}", message);
        }
    }

    /// Key-value pair summary display
    pub fn summary_kv(&self, title: &str, items: &[(&str, String)]) {
        if self.verbose && !self.quiet {
            eprintln!("--- {} ---", title);
            for (key, value) in items {
                eprintln!("  {}: {}", key, value);
            }
        }
    }

    /// Format duration in human-readable format
    pub fn format_duration(&self, duration: Duration) -> String {
        let millis = duration.as_millis();
        if millis < 1000 {
            format!("{}ms", millis)
        } else if duration.as_secs() < 60 {
            format!("{:.1}s", duration.as_secs_f64())
        } else {
            let secs = duration.as_secs();
            format!("{}m{}s", secs / 60, secs % 60)
        }
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|start| start.elapsed())
    }

    fn emit(&self, level: &str, message: &str) {
        if self.verbose {
            let stamp = self
                .elapsed()
                .map(|e| format!("[{:8.3}s] ", e.as_secs_f64()))
                .unwrap_or_default();
            eprintln!("{}{:<5} {}", stamp, level, message);
        } else {
            eprintln!("{}", message);
        }
    }
}
