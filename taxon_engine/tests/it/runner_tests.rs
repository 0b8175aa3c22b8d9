use std::sync::Arc;
use std::time::Duration;
use taxon_engine::aggregate::ResultTable;
use taxon_engine::classifier::ERROR_MARKER_PREFIX;
use taxon_engine::prelude::*;

fn table_of(summaries: &[&str]) -> RecordTable {
    RecordTable::new(
        vec!["summary".to_string()],
        summaries.iter().map(|s| vec![s.to_string()]).collect(),
    )
}

fn problem_set() -> CategorySet {
    CategorySet::parse(
        Taxonomy::Problem,
        "[Cooling] description: heat and cooling problems, [Usability] description: handling problems",
    )
    .unwrap()
}

fn solution_set() -> CategorySet {
    CategorySet::parse(
        Taxonomy::Solution,
        "[Mechanical Redesign] description: structural rework of the device",
    )
    .unwrap()
}

/// Scripted backend for a full two-pass run over `n` records: problem replies first, then
/// solution replies, matching the runner's pass order.
fn two_pass_backend(n: usize) -> Arc<GenerationBackend> {
    let mut builder = GenerationInterface::scripted();
    for _ in 0..n {
        builder = builder.reply("Cooling");
    }
    for _ in 0..n {
        builder = builder.reply("Mechanical Redesign");
    }
    builder.init()
}

#[tokio::test(start_paused = true)]
async fn three_record_run_labels_everything() {
    let backend = two_pass_backend(3);
    let mut table = table_of(&[
        "motor cooling issue",
        "filter clogging",
        "handle ergonomics",
    ]);
    let mut runner = BatchRunner::new(backend, problem_set(), solution_set());

    runner.run(&mut table).await.unwrap();

    for record in &table.records {
        assert_eq!(
            record.problem_label.as_ref().unwrap().as_cell(),
            "Cooling"
        );
        assert_eq!(
            record.solution_label.as_ref().unwrap().as_cell(),
            "Mechanical Redesign"
        );
    }

    let result = ResultTable::build(&table, &problem_set(), &solution_set());
    assert_eq!(result.problem_frequencies.len(), 1);
    assert_eq!(result.problem_frequencies["Cooling"], 3);
    assert_eq!(result.solution_frequencies.len(), 1);
    assert_eq!(result.solution_frequencies["Mechanical Redesign"], 3);

    let snapshot = runner.handle().snapshot();
    assert_eq!(snapshot.phase, RunPhase::Completed);
    assert_eq!(snapshot.progress, 1.0);
    assert_eq!(snapshot.completed_calls, 6);
    assert_eq!(snapshot.failed_calls, 0);
}

#[tokio::test(start_paused = true)]
async fn wait_counts_for_one_and_five_records() {
    for (n, expected_waits) in [(1usize, 0usize), (5, 8)] {
        let backend = two_pass_backend(n);
        let summaries: Vec<String> = (0..n).map(|i| format!("abstract {i}")).collect();
        let summary_refs: Vec<&str> = summaries.iter().map(String::as_str).collect();
        let mut table = table_of(&summary_refs);
        let mut runner = BatchRunner::new(backend, problem_set(), solution_set());

        runner.run(&mut table).await.unwrap();

        assert_eq!(
            runner.waits_issued(),
            expected_waits,
            "unexpected wait count for {n} records"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn per_record_failure_does_not_abort_the_pass() {
    let backend = GenerationInterface::scripted()
        .reply("Cooling")
        .fail("transport dropped the connection")
        .reply("Cooling")
        .reply("Mechanical Redesign")
        .reply("Mechanical Redesign")
        .reply("Mechanical Redesign")
        .init();
    let mut table = table_of(&[
        "motor cooling issue",
        "filter clogging",
        "handle ergonomics",
    ]);
    let mut runner = BatchRunner::new(backend, problem_set(), solution_set());

    runner.run(&mut table).await.unwrap();

    let failed_cell = table.records[1].problem_label.as_ref().unwrap().as_cell();
    assert!(failed_cell.starts_with(ERROR_MARKER_PREFIX));
    assert!(failed_cell.contains("transport dropped the connection"));
    assert_eq!(
        table.records[0].problem_label.as_ref().unwrap().as_cell(),
        "Cooling"
    );
    assert_eq!(
        table.records[2].problem_label.as_ref().unwrap().as_cell(),
        "Cooling"
    );

    // No record is left unlabeled after a completed run.
    for record in &table.records {
        assert!(!record.problem_label.as_ref().unwrap().as_cell().is_empty());
        assert!(!record.solution_label.as_ref().unwrap().as_cell().is_empty());
    }

    let snapshot = runner.handle().snapshot();
    assert_eq!(snapshot.phase, RunPhase::Completed);
    assert_eq!(snapshot.failed_calls, 1);
    assert_eq!(snapshot.completed_calls, 5);

    // The failure keeps its own frequency bucket.
    let result = ResultTable::build(&table, &problem_set(), &solution_set());
    assert_eq!(result.problem_frequencies.values().sum::<usize>(), 3);
    assert_eq!(result.problem_matches.failed, 1);
}

#[tokio::test(start_paused = true)]
async fn missing_summary_column_fails_before_any_call() {
    let backend = GenerationInterface::scripted().default_reply("Cooling").init();
    let mut table = RecordTable::new(
        vec!["id".to_string(), "abstract".to_string()],
        vec![vec!["1".to_string(), "text".to_string()]],
    );
    let mut runner = BatchRunner::new(backend.clone(), problem_set(), solution_set());

    let err = runner.run(&mut table).await.unwrap_err();
    assert!(matches!(
        err,
        RunError::Table(TableError::MissingRequiredColumn(SUMMARY_COLUMN))
    ));
    assert_eq!(backend.scripted().unwrap().call_count(), 0);
    assert_eq!(runner.handle().snapshot().phase, RunPhase::Failed);
}

#[tokio::test(start_paused = true)]
async fn progress_is_monotone_and_only_completed_reaches_one() {
    let backend = two_pass_backend(4);
    let summaries: Vec<String> = (0..4).map(|i| format!("abstract {i}")).collect();
    let summary_refs: Vec<&str> = summaries.iter().map(String::as_str).collect();
    let mut table = table_of(&summary_refs);
    let mut runner = BatchRunner::new(backend, problem_set(), solution_set());
    let handle = runner.handle();

    let observer = async {
        let mut samples = Vec::new();
        loop {
            let snapshot = handle.snapshot();
            samples.push((snapshot.phase, snapshot.progress));
            if snapshot.phase.is_terminal() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        samples
    };

    let (run_result, samples) = tokio::join!(runner.run(&mut table), observer);
    run_result.unwrap();

    for pair in samples.windows(2) {
        assert!(pair[1].1 >= pair[0].1, "progress went backwards: {pair:?}");
    }
    for (phase, progress) in &samples {
        if *progress >= 1.0 {
            assert_eq!(*phase, RunPhase::Completed);
        }
    }
    assert_eq!(handle.snapshot().progress, 1.0);
}

#[tokio::test(start_paused = true)]
async fn cancellation_keeps_partial_labels() {
    let backend = two_pass_backend(3);
    let mut table = table_of(&[
        "motor cooling issue",
        "filter clogging",
        "handle ergonomics",
    ]);
    let mut runner = BatchRunner::new(backend, problem_set(), solution_set());
    let handle = runner.handle();
    let cancel = runner.cancel_handle();

    let canceller = async {
        loop {
            let snapshot = handle.snapshot();
            if snapshot.phase == RunPhase::SolutionPass || snapshot.phase.is_terminal() {
                cancel.cancel();
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    };

    let (run_result, ()) = tokio::join!(runner.run(&mut table), canceller);
    assert!(matches!(run_result, Err(RunError::Aborted)));

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.phase, RunPhase::Aborted);
    assert!(snapshot.progress < 1.0);

    // Problem-pass labels written before the abort are preserved, and the partial table still
    // aggregates for export.
    for record in &table.records {
        assert_eq!(
            record.problem_label.as_ref().unwrap().as_cell(),
            "Cooling"
        );
    }
    let result = ResultTable::build(&table, &problem_set(), &solution_set());
    assert_eq!(result.problem_frequencies["Cooling"], 3);
    assert_eq!(result.rows.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn pre_cancelled_run_issues_no_calls() {
    let backend = GenerationInterface::scripted().default_reply("Cooling").init();
    let mut table = table_of(&["motor cooling issue"]);
    let mut runner = BatchRunner::new(backend.clone(), problem_set(), solution_set());
    runner.cancel_handle().cancel();

    let err = runner.run(&mut table).await.unwrap_err();
    assert!(matches!(err, RunError::Aborted));
    assert_eq!(backend.scripted().unwrap().call_count(), 0);
    assert!(table.records[0].problem_label.is_none());
}

#[tokio::test(start_paused = true)]
async fn throttled_failure_extends_the_next_pause() {
    let backend = GenerationInterface::scripted()
        .fail_throttled("quota exceeded")
        .reply("Cooling")
        .reply("Mechanical Redesign")
        .reply("Mechanical Redesign")
        .init();
    let mut table = table_of(&["motor cooling issue", "filter clogging"]);
    let mut runner = BatchRunner::new(backend, problem_set(), solution_set())
        .delay(Duration::from_millis(100));

    let started = tokio::time::Instant::now();
    runner.run(&mut table).await.unwrap();

    // Two waits: the first doubled by the throttle penalty, the second at the base delay.
    assert_eq!(runner.waits_issued(), 2);
    assert_eq!(started.elapsed(), Duration::from_millis(300));
}
