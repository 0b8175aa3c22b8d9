//! The two-pass batch run: `Idle -> ProblemPass -> SolutionPass -> Completed`, with `Failed`
//! before the first call and `Aborted` via cooperative cancellation.

pub mod state;

use crate::categories::{CategorySet, Taxonomy};
use crate::classifier::{Classifier, Outcome};
use crate::rate_gate::RateGate;
use crate::table::{RecordTable, TableError};
use state::{CancelHandle, LogEntry, RunHandle, RunPhase};
use std::sync::Arc;
use std::time::Duration;
use taxon_interface::llms::GenerationBackend;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("{0}")]
    Table(#[from] TableError),
    #[error("RunAborted: cancelled at a pass-iteration boundary; partial labels are kept")]
    Aborted,
}

pub struct BatchRunner {
    classifier: Classifier,
    gate: RateGate,
    problem_set: CategorySet,
    solution_set: CategorySet,
    handle: RunHandle,
    cancel: CancelHandle,
}

impl BatchRunner {
    pub fn new(
        backend: Arc<GenerationBackend>,
        problem_set: CategorySet,
        solution_set: CategorySet,
    ) -> Self {
        Self {
            classifier: Classifier::new(backend),
            gate: RateGate::default(),
            problem_set,
            solution_set,
            handle: RunHandle::new(),
            cancel: CancelHandle::new(),
        }
    }

    /// Sets the fixed delay between consecutive classification calls.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.gate = RateGate::new(delay);
        self
    }

    /// Extra attempts per failed call. `0` (the default) keeps a failure terminal for its record.
    pub fn retry_after_fail_n_times(mut self, retries: u8) -> Self {
        self.classifier.retry_after_fail_n_times = retries;
        self
    }

    /// Read-only observer handle; safe to poll from other tasks while the run executes.
    pub fn handle(&self) -> RunHandle {
        self.handle.clone()
    }

    /// Cancellation flag polled between records.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn waits_issued(&self) -> usize {
        self.gate.waits_issued()
    }

    /// Drive both passes over the table. The table is borrowed exclusively for the whole run; on
    /// abort the labels written so far stay in place.
    pub async fn run(&mut self, table: &mut RecordTable) -> Result<(), RunError> {
        if let Err(e) = table.require_summary_column() {
            self.handle.set_phase(RunPhase::Failed);
            self.handle.set_status(e.to_string());
            crate::error!("{e}");
            return Err(e.into());
        }

        let estimated = self.gate.delay().as_secs_f64() * 2.0 * table.len() as f64 / 60.0;
        crate::info!(
            "Classifying {} records across 2 passes; estimated {:.1} minutes",
            table.len(),
            estimated
        );
        self.handle.set_status(format!(
            "classifying {} records, estimated {estimated:.1} minutes",
            table.len()
        ));
        let started = std::time::Instant::now();

        self.pass(table, Taxonomy::Problem, 0.0).await?;
        self.pass(table, Taxonomy::Solution, 0.5).await?;

        self.handle.set_phase(RunPhase::Completed);
        self.handle.set_progress(1.0);
        let elapsed = started.elapsed().as_secs_f64() / 60.0;
        self.handle
            .set_status(format!("completed in {elapsed:.1} minutes"));
        crate::info!("Classification completed in {elapsed:.1} minutes");
        Ok(())
    }

    async fn pass(
        &mut self,
        table: &mut RecordTable,
        taxonomy: Taxonomy,
        progress_base: f64,
    ) -> Result<(), RunError> {
        self.handle.set_phase(match taxonomy {
            Taxonomy::Problem => RunPhase::ProblemPass,
            Taxonomy::Solution => RunPhase::SolutionPass,
        });
        let total = table.len();
        for row in 0..total {
            if self.cancel.is_cancelled() {
                self.handle.set_phase(RunPhase::Aborted);
                self.handle
                    .set_status(format!("aborted during {taxonomy} pass"));
                crate::warn!("Run aborted during {taxonomy} pass at record {row}");
                return Err(RunError::Aborted);
            }

            self.handle
                .set_progress(progress_base + (row as f64 / total as f64) * 0.5);
            self.handle
                .set_status(format!("{taxonomy} pass ({}/{total})", row + 1));

            let text = table.summary(row).to_owned();
            let set = match taxonomy {
                Taxonomy::Problem => &self.problem_set,
                Taxonomy::Solution => &self.solution_set,
            };
            let outcome = self.classifier.classify(&text, set).await;

            if let Outcome::CallFailed {
                throttled: true, ..
            } = &outcome
            {
                self.gate.penalize();
            }
            self.handle.push_log(
                LogEntry {
                    row,
                    taxonomy,
                    cell: outcome.as_cell(),
                },
                outcome.is_failure(),
            );

            let record = &mut table.records[row];
            match taxonomy {
                Taxonomy::Problem => record.problem_label = Some(outcome),
                Taxonomy::Solution => record.solution_label = Some(outcome),
            }

            if row + 1 < total {
                self.gate.wait().await;
            }
        }
        Ok(())
    }
}
