//! Per-phase progress counters and the shared event log.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

/// Default number of events retained by the log.
const DEFAULT_LOG_CAPACITY: usize = 30;

/// Kind of a logged per-item outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum EventKind {
    /// A resource was created or edited.
    Created,
    /// A resource was deleted.
    Deleted,
    /// A per-item failure.
    Error,
    /// A phase boundary or informational note.
    Info,
}

/// A single timestamped log event.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct Event {
    /// When the event was recorded.
    at: DateTime<Utc>,
    /// Outcome kind.
    kind: EventKind,
    /// Event message.
    message: String,
}

/// Bounded, mutex-guarded event log.
///
/// This is the single shared mutable surface the pipeline exposes to
/// concurrently running observers (e.g. a transport status callback in an
/// embedding application); the mutex keeps interleaved writers from tearing
/// entries. Clones share the same underlying buffer.
#[derive(Debug, Clone)]
pub struct EventLog {
    inner: Arc<Mutex<VecDeque<Event>>>,
    capacity: usize,
}

impl EventLog {
    /// Create a log with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    /// Create a log retaining at most `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Append an event, evicting the oldest entry past capacity.
    pub fn push(&self, kind: EventKind, message: impl Into<String>) {
        let event = Event {
            at: Utc::now(),
            kind,
            message: message.into(),
        };
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        while self.capacity > 0 && guard.len() >= self.capacity {
            guard.pop_front();
        }
        guard.push_back(event);
    }

    /// The most recent `n` events, oldest first.
    pub fn recent(&self, n: usize) -> Vec<Event> {
        let guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.iter().rev().take(n).rev().cloned().collect()
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        match self.inner.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// True when no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time summary of a finished phase.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct PhaseSummary {
    /// Phase operation name.
    operation: String,
    /// Items processed.
    completed: usize,
    /// Items the phase set out to process.
    total: usize,
    /// Per-item failures counted during the phase.
    errors: usize,
}

/// Per-phase completed/total/error counters plus the event log.
///
/// Reset at the start of each phase via [`begin`](ProgressTracker::begin);
/// every per-item outcome produces exactly one event and one counter update.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    operation: String,
    completed: usize,
    total: usize,
    errors: usize,
    log: EventLog,
}

impl ProgressTracker {
    /// Create a tracker with a fresh event log.
    pub fn new() -> Self {
        Self::with_log(EventLog::new())
    }

    /// Create a tracker sharing an existing event log.
    pub fn with_log(log: EventLog) -> Self {
        Self {
            operation: "idle".to_string(),
            completed: 0,
            total: 0,
            errors: 0,
            log,
        }
    }

    /// Start a new phase, resetting all counters.
    pub fn begin(&mut self, operation: impl Into<String>, total: usize) {
        self.operation = operation.into();
        self.completed = 0;
        self.total = total;
        self.errors = 0;
        info!(operation = %self.operation, total, "phase started");
    }

    /// Record a successful creation or edit.
    pub fn created(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(operation = %self.operation, "[+] {message}");
        self.log.push(EventKind::Created, message);
        self.completed += 1;
    }

    /// Record a successful deletion.
    pub fn deleted(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(operation = %self.operation, "[-] {message}");
        self.log.push(EventKind::Deleted, message);
        self.completed += 1;
    }

    /// Record a per-item failure.
    pub fn failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!(operation = %self.operation, "[x] {message}");
        self.log.push(EventKind::Error, message);
        self.errors += 1;
        self.completed += 1;
    }

    /// Record an informational note without touching the counters.
    pub fn note(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(operation = %self.operation, "{message}");
        self.log.push(EventKind::Info, message);
    }

    /// Percent complete, when the phase has a known total.
    pub fn percent(&self) -> Option<f64> {
        (self.total > 0).then(|| (self.completed as f64 / self.total as f64) * 100.0)
    }

    /// Close the phase: emit the summary line and return the summary.
    pub fn finish_phase(&mut self) -> PhaseSummary {
        let summary = PhaseSummary {
            operation: self.operation.clone(),
            completed: self.completed,
            total: self.total,
            errors: self.errors,
        };
        let line = match self.percent() {
            Some(percent) => format!(
                "{}: {}/{} ({percent:.1}%) | {} errors",
                self.operation, self.completed, self.total, self.errors
            ),
            None => format!(
                "{}: {} processed | {} errors",
                self.operation, self.completed, self.errors
            ),
        };
        info!("{line}");
        self.log.push(EventKind::Info, line);
        summary
    }

    /// Current phase operation name.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Items processed so far this phase.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Items this phase set out to process.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Per-item failures counted this phase.
    pub fn errors(&self) -> usize {
        self.errors
    }

    /// The shared event log.
    pub fn log(&self) -> &EventLog {
        &self.log
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
