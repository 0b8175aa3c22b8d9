//! Run state owned by the batch runner, observable from outside via snapshots.

use crate::categories::Taxonomy;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunPhase {
    Idle,
    ProblemPass,
    SolutionPass,
    Completed,
    Failed,
    Aborted,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunPhase::Completed | RunPhase::Failed | RunPhase::Aborted
        )
    }
}

/// One per-record outcome, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub row: usize,
    pub taxonomy: Taxonomy,
    pub cell: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.row + 1, self.cell)
    }
}

/// A read-only view of the run at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct RunSnapshot {
    pub phase: RunPhase,
    pub progress: f64,
    pub status: String,
    pub completed_calls: usize,
    pub failed_calls: usize,
}

pub(crate) struct RunState {
    phase: RunPhase,
    progress: f64,
    status: String,
    log: Vec<LogEntry>,
    completed_calls: usize,
    failed_calls: usize,
}

impl RunState {
    fn new() -> Self {
        Self {
            phase: RunPhase::Idle,
            progress: 0.0,
            status: "idle".to_string(),
            log: Vec::new(),
            completed_calls: 0,
            failed_calls: 0,
        }
    }
}

/// Shared handle onto the run state. The runner writes through it; any number of observers may
/// poll snapshots concurrently without blocking the run or seeing torn values.
#[derive(Clone)]
pub struct RunHandle {
    inner: Arc<RwLock<RunState>>,
}

impl Default for RunHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl RunHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(RunState::new())),
        }
    }

    pub fn snapshot(&self) -> RunSnapshot {
        let state = self.inner.read().unwrap_or_else(|e| e.into_inner());
        RunSnapshot {
            phase: state.phase,
            progress: state.progress,
            status: state.status.clone(),
            completed_calls: state.completed_calls,
            failed_calls: state.failed_calls,
        }
    }

    /// The most recent `n` log entries, oldest first. History is never mutated by reads.
    pub fn tail(&self, n: usize) -> Vec<LogEntry> {
        let state = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let start = state.log.len().saturating_sub(n);
        state.log[start..].to_vec()
    }

    pub fn log_len(&self) -> usize {
        let state = self.inner.read().unwrap_or_else(|e| e.into_inner());
        state.log.len()
    }

    pub(crate) fn set_phase(&self, phase: RunPhase) {
        let mut state = self.inner.write().unwrap_or_else(|e| e.into_inner());
        state.phase = phase;
    }

    /// Progress never moves backwards, whatever the caller hands in.
    pub(crate) fn set_progress(&self, progress: f64) {
        let mut state = self.inner.write().unwrap_or_else(|e| e.into_inner());
        state.progress = state.progress.max(progress.clamp(0.0, 1.0));
    }

    pub(crate) fn set_status<S: Into<String>>(&self, status: S) {
        let mut state = self.inner.write().unwrap_or_else(|e| e.into_inner());
        state.status = status.into();
    }

    pub(crate) fn push_log(&self, entry: LogEntry, failed: bool) {
        let mut state = self.inner.write().unwrap_or_else(|e| e.into_inner());
        state.log.push(entry);
        if failed {
            state.failed_calls += 1;
        } else {
            state.completed_calls += 1;
        }
    }
}

/// Cooperative cancellation flag, polled by the runner at pass-iteration boundaries.
#[derive(Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
