//! Observability subsystem
//!
//! - Structured logging (JSON)
//! - Counters for draw activity
//! - Typed lifecycle and domain events
//!
//! Observability is read-only: it never changes the outcome of an
//! operation, and a failed log write is dropped.
//!
//! # Usage
//!
//! ```ignore
//! use luckydraw::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::DrawComplete, &[("winners", "6")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.record_draw(6);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{LogOutput, Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

fn severity_for(event: Event) -> Severity {
    if event.is_failure() {
        Severity::Error
    } else if event.is_rejection() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle or domain event
pub fn log_event(event: Event) {
    Logger::log(severity_for(event), event.as_str(), &[]);
}

/// Log an event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}
