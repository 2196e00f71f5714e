//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, then `severity` and `ts`, then fields in alphabetical order
//! - Synchronous, no buffering
//!
//! Output goes to stdout by default. The stdin/stdout request driver moves
//! it to stderr so responses and logs never interleave.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use chrono::{DateTime, SecondsFormat, Utc};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable, process exits
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where non-error log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout = 0,
    Stderr = 1,
    Off = 2,
}

static OUTPUT: AtomicU8 = AtomicU8::new(LogOutput::Stdout as u8);

/// A structured logger that outputs JSON logs
pub struct Logger;

impl Logger {
    /// Route TRACE/INFO/WARN lines. ERROR and FATAL always go to stderr
    /// unless output is `Off`.
    pub fn set_output(output: LogOutput) {
        OUTPUT.store(output as u8, Ordering::Relaxed);
    }

    pub fn output() -> LogOutput {
        match OUTPUT.load(Ordering::Relaxed) {
            0 => LogOutput::Stdout,
            1 => LogOutput::Stderr,
            _ => LogOutput::Off,
        }
    }

    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let target = match Self::output() {
            LogOutput::Off => return,
            LogOutput::Stdout if severity < Severity::Error => Target::Stdout,
            _ => Target::Stderr,
        };

        let line = format_line(Utc::now(), severity, event, fields);
        // One write per line; a failed write is dropped
        let _ = match target {
            Target::Stdout => io::stdout().lock().write_all(line.as_bytes()),
            Target::Stderr => io::stderr().lock().write_all(line.as_bytes()),
        };
    }
}

enum Target {
    Stdout,
    Stderr,
}

/// `{"event":..,"severity":..,"ts":..,<fields sorted by key>}` plus newline
fn format_line(
    ts: DateTime<Utc>,
    severity: Severity,
    event: &str,
    fields: &[(&str, &str)],
) -> String {
    let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
    sorted.sort_by_key(|(key, _)| *key);

    let mut line = String::with_capacity(128);
    line.push('{');
    push_pair(&mut line, "event", event);
    line.push(',');
    push_pair(&mut line, "severity", severity.as_str());
    line.push(',');
    push_pair(
        &mut line,
        "ts",
        &ts.to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    for (key, value) in sorted {
        line.push(',');
        push_pair(&mut line, key, value);
    }
    line.push_str("}\n");
    line
}

fn push_pair(line: &mut String, key: &str, value: &str) {
    push_quoted(line, key);
    line.push(':');
    push_quoted(line, value);
}

fn push_quoted(line: &mut String, s: &str) {
    line.push('"');
    for c in s.chars() {
        match c {
            '"' => line.push_str("\\\""),
            '\\' => line.push_str("\\\\"),
            '\n' => line.push_str("\\n"),
            '\r' => line.push_str("\\r"),
            '\t' => line.push_str("\\t"),
            c if c.is_control() => line.push_str(&format!("\\u{:04x}", c as u32)),
            c => line.push(c),
        }
    }
    line.push('"');
}
