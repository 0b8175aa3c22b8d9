//! Batch classification of patent abstracts from the command line: load a CSV with a `summary`
//! column and two taxonomy definition files, run both classification passes against the model,
//! then export the labeled table as CSV and XLSX.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use taxon_engine::prelude::*;
use taxon_engine::{aggregate::ResultTable, export};

#[derive(Parser)]
#[command(
    name = "classify_runner",
    about = "Classify patent abstracts into problem and solution taxonomies"
)]
struct Cli {
    /// Input CSV; must contain a "summary" column.
    #[arg(long)]
    input: PathBuf,

    /// Problem-taxonomy definition file ("[Name] marker: description" entries).
    #[arg(long)]
    problem_defs: PathBuf,

    /// Solution-taxonomy definition file (same format).
    #[arg(long)]
    solution_defs: PathBuf,

    /// Generative Language API model id.
    #[arg(long, default_value = "gemini-2.0-flash-lite")]
    model: String,

    /// Environment variable holding the API key.
    #[arg(long, default_value = "GEMINI_API_KEY")]
    api_key_env_var: String,

    /// Fixed delay between classification calls, in seconds.
    #[arg(long, default_value_t = 2.5)]
    delay_secs: f64,

    /// Extra attempts per failed call; 0 keeps any failure terminal for its record.
    #[arg(long, default_value_t = 0)]
    retries: u8,

    /// Directory the timestamped result files are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Skip the API and label every record with a canned reply.
    #[arg(long)]
    dry_run: bool,

    /// Print the run summary as JSON instead of plain text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let problem_raw = std::fs::read_to_string(&cli.problem_defs)
        .with_context(|| format!("reading {}", cli.problem_defs.display()))?;
    let solution_raw = std::fs::read_to_string(&cli.solution_defs)
        .with_context(|| format!("reading {}", cli.solution_defs.display()))?;
    let problem_set = CategorySet::parse(Taxonomy::Problem, &problem_raw)?;
    let solution_set = CategorySet::parse(Taxonomy::Solution, &solution_raw)?;

    let mut table = RecordTable::from_csv_path(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;

    let backend = if cli.dry_run {
        GenerationInterface::scripted().default_reply("dry run").init()
    } else {
        GenerationInterface::gemini()
            .model_id(&cli.model)
            .with_api_key_env_var(&cli.api_key_env_var)
            .init()?
    };

    let mut runner = BatchRunner::new(backend, problem_set.clone(), solution_set.clone())
        .delay(Duration::from_secs_f64(cli.delay_secs))
        .retry_after_fail_n_times(cli.retries);

    let handle = runner.handle();
    let reporter = tokio::spawn(report_progress(handle.clone()));

    let cancel = runner.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("cancelling after the current record...");
            cancel.cancel();
        }
    });

    let run_result = runner.run(&mut table).await;
    reporter.abort();

    match &run_result {
        Ok(()) => {}
        Err(RunError::Aborted) => {
            eprintln!("run aborted; exporting the partially labeled table");
        }
        Err(e) => anyhow::bail!("{e}"),
    }

    let result = ResultTable::build(&table, &problem_set, &solution_set);

    let csv_path = export::timestamped_path(&cli.out_dir, "csv");
    export::write_csv(&result, &csv_path)?;
    let xlsx_path = export::timestamped_path(&cli.out_dir, "xlsx");
    export::write_xlsx(&result, &xlsx_path)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result_summary(&result))?);
    } else {
        print_summary(&result);
    }
    println!("wrote {}", csv_path.display());
    println!("wrote {}", xlsx_path.display());

    if matches!(run_result, Err(RunError::Aborted)) {
        std::process::exit(130);
    }
    Ok(())
}

async fn report_progress(handle: RunHandle) {
    let mut last_status = String::new();
    let mut seen_log_entries = 0;
    loop {
        let snapshot = handle.snapshot();
        if snapshot.status != last_status {
            eprintln!("[{:>5.1}%] {}", snapshot.progress * 100.0, snapshot.status);
            last_status = snapshot.status;
        }
        let log_len = handle.log_len();
        if log_len > seen_log_entries {
            for entry in handle.tail(log_len - seen_log_entries) {
                eprintln!("{entry}");
            }
            seen_log_entries = log_len;
        }
        if snapshot.phase.is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
}

fn result_summary(result: &ResultTable) -> serde_json::Value {
    serde_json::json!({
        "records": result.rows.len(),
        "problem_frequencies": &result.problem_frequencies,
        "solution_frequencies": &result.solution_frequencies,
        "problem_matches": &result.problem_matches,
        "solution_matches": &result.solution_matches,
    })
}

fn print_summary(result: &ResultTable) {
    println!("problem category distribution:");
    for (label, count) in &result.problem_frequencies {
        println!("  {count:>5}  {label}");
    }
    println!("solution category distribution:");
    for (label, count) in &result.solution_frequencies {
        println!("  {count:>5}  {label}");
    }
    let pm = &result.problem_matches;
    let sm = &result.solution_matches;
    println!(
        "label matching: problem exact {} / normalized {} / unmatched {} / failed {}",
        pm.exact, pm.normalized, pm.unmatched, pm.failed
    );
    println!(
        "label matching: solution exact {} / normalized {} / unmatched {} / failed {}",
        sm.exact, sm.normalized, sm.unmatched, sm.failed
    );
}
