use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use tracing::{error, warn};

use vigil_processing::io::{discover_csv_files, load_csv};
use vigil_processing::reporting::{
    export_cleaned_table, write_explanation_report, write_overall_summary, FindingsLog,
    SummaryStore,
};
use vigil_processing::{
    numeric_value_columns, ColumnFinding, FileReport, SentinelConfig, SentinelPipeline,
    TimeColumnInferrer, TriageLabel,
};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Data quality sentinel for time-series CSVs",
    long_about = "Triage folders of time-series CSVs into green/amber/red data-quality verdicts.\n\n\
                  EXIT CODES:\n  \
                  0  everything green\n  \
                  1  amber findings (or a hard failure before processing)\n  \
                  2  at least one red file\n\n\
                  EXAMPLES:\n  \
                  # Triage a single file\n  \
                  vigil-processing -i data.csv\n\n  \
                  # Triage a folder recursively with custom thresholds\n  \
                  vigil-processing -i data/ --recursive --green 0.1 --amber 0.4\n\n  \
                  # Preview what would be processed, without writing outputs\n  \
                  vigil-processing -i data/ --dry-run"
)]
struct Args {
    /// CSV file or directory of CSVs to triage
    #[arg(short, long)]
    input: String,

    /// Output directory for findings, summaries, and cleaned tables
    #[arg(short, long, default_value = "dq_out")]
    out: String,

    /// Green threshold: average scores at or below it are green
    #[arg(long, default_value = "0.2")]
    green: f64,

    /// Amber threshold: average scores at or below it are amber, above it red
    #[arg(long, default_value = "0.5")]
    amber: f64,

    /// Explicit time column name, used verbatim instead of inference
    #[arg(long)]
    time_col: Option<String>,

    /// Rolling window (in samples) for level-shift detection
    #[arg(long, default_value = "7")]
    window: usize,

    /// Discover *.csv recursively when the input is a directory
    #[arg(long)]
    recursive: bool,

    /// Keep processing after a red verdict instead of stopping early
    #[arg(long)]
    keep_going: bool,

    /// Also write the dataset-explanation markdown report
    #[arg(long)]
    explain: bool,

    /// Preview the inputs without scoring or writing outputs
    #[arg(long)]
    dry_run: bool,

    /// Output JSON to stdout instead of the human-readable summary
    ///
    /// Disables all logs; only the final JSON document is printed.
    /// Useful for piping to other tools: `... --json | jq .status`
    #[arg(long)]
    json: bool,

    /// Suppress log output below warnings
    #[arg(short, long)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Per-file result kept for the end-of-run summary.
struct FileOutcome {
    file: String,
    worst: TriageLabel,
    findings: Vec<ColumnFinding>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging (disabled if --json is set)
    init_logging(&args.log_level, args.quiet, args.json);

    match run(&args) {
        Ok(worst) => ExitCode::from(worst.exit_code()),
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<TriageLabel> {
    let input = Path::new(&args.input);
    if !input.exists() {
        return Err(anyhow!("Input path not found: {}", args.input));
    }

    let mut builder = SentinelConfig::builder()
        .green(args.green)
        .amber(args.amber)
        .level_shift_window(args.window);
    if let Some(ref time_col) = args.time_col {
        builder = builder.time_column(time_col);
    }
    let config = builder.build()?;

    let is_dir = input.is_dir();
    let files = if is_dir {
        discover_csv_files(input, args.recursive)?
    } else {
        vec![input.to_path_buf()]
    };
    if files.is_empty() {
        warn!("No CSV files found under {}", input.display());
    }

    if args.dry_run {
        return run_dry_run(args, &files);
    }

    let out_dir = Path::new(&args.out);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Could not create output directory '{}'", args.out))?;

    let findings = FindingsLog::new(out_dir);
    let summaries = SummaryStore::new(out_dir);
    if is_dir {
        // A directory run describes exactly one pass over that folder;
        // single-file runs append/merge into the existing documents instead
        findings.clear()?;
        summaries.clear()?;
    }

    if args.explain {
        let explain_root = if is_dir {
            input
        } else {
            input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."))
        };
        write_explanation_report(explain_root, out_dir)?;
    }

    let pipeline = SentinelPipeline::new(config)?;

    let mut outcomes = Vec::with_capacity(files.len());
    let mut worst_all = TriageLabel::Green;
    for path in &files {
        let label = file_label(path);
        let report = match load_csv(path) {
            Ok(df) => pipeline.run_file(&df, &label),
            Err(err) if is_dir => {
                warn!("Skipping '{}': {}", path.display(), err);
                FileReport::unprocessed(label.clone(), format!("load failed: {}", err))
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("Could not load '{}'", path.display())));
            }
        };

        findings.append(&report)?;
        summaries.merge(&report)?;
        export_cleaned_table(&report, out_dir)?;

        worst_all = worst_all.max(report.worst);
        let stop = report.worst == TriageLabel::Red && !args.keep_going;
        outcomes.push(FileOutcome {
            file: report.file,
            worst: report.worst,
            findings: report.findings,
        });
        if stop {
            warn!(
                "Red verdict on '{}', stopping early (use --keep-going to continue)",
                label
            );
            break;
        }
    }

    write_overall_summary(out_dir, worst_all)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&run_summary_json(&outcomes, worst_all))?
        );
    } else {
        print_run_summary(&outcomes, worst_all, &args.out);
    }

    Ok(worst_all)
}

fn file_label(path: &Path) -> String {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_string(),
        None => path.display().to_string(),
    }
}

/// Preview the inputs without processing them.
///
/// Note: This function uses `println!` intentionally for user-facing CLI
/// output. Unlike logging (`info!`, `debug!`), this output should always be
/// visible regardless of log level settings since it's the primary purpose
/// of --dry-run.
fn run_dry_run(args: &Args, files: &[PathBuf]) -> Result<TriageLabel> {
    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of data-quality triage");
    println!("{}\n", "=".repeat(80));

    let inferrer = TimeColumnInferrer;
    for path in files {
        println!("FILE {}", path.display());
        println!("{}", "-".repeat(40));
        match load_csv(path) {
            Ok(df) => {
                println!("  Rows: {}", df.height());
                println!("  Columns: {}", df.width());
                let names: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
                println!("  Column names: {:?}", names);
                match inferrer.infer(&df, args.time_col.as_deref()) {
                    Ok(time_col) => {
                        let value_cols = numeric_value_columns(&df, &time_col);
                        println!("  Time column: {}", time_col);
                        println!("  Value columns: {:?}", value_cols);
                    }
                    Err(err) => println!("  Time column: not found ({})", err),
                }
            }
            Err(err) => println!("  Load failed: {}", err),
        }
        println!();
    }

    println!("No outputs were written. Run without --dry-run to triage.");
    println!("{}", "=".repeat(80));
    Ok(TriageLabel::Green)
}

fn run_summary_json(outcomes: &[FileOutcome], worst: TriageLabel) -> Value {
    json!({
        "status": worst.as_str(),
        "files": outcomes
            .iter()
            .map(|outcome| {
                json!({
                    "file": outcome.file,
                    "triage": outcome.worst.as_str(),
                    "columns": outcome
                        .findings
                        .iter()
                        .map(|finding| {
                            json!({
                                "column": finding.column,
                                "avg_score": finding.avg_anomaly_score,
                                "triage": finding.triage.as_str(),
                            })
                        })
                        .collect::<Vec<_>>(),
                })
            })
            .collect::<Vec<_>>(),
    })
}

fn print_run_summary(outcomes: &[FileOutcome], worst: TriageLabel, out_dir: &str) {
    println!();
    println!("{}", "=".repeat(80));
    println!("DATA QUALITY TRIAGE COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!("Files processed: {}", outcomes.len());
    println!();

    for outcome in outcomes {
        println!("{} {} -> {}", outcome.worst.icon(), outcome.file, outcome.worst);
        for finding in &outcome.findings {
            match finding.avg_anomaly_score {
                Some(score) => println!(
                    "    {} {} (avg score {:.3})",
                    finding.triage.icon(),
                    finding.column,
                    score
                ),
                None => println!(
                    "    {} {} (analysis failed)",
                    finding.triage.icon(),
                    finding.column
                ),
            }
        }
    }
    println!();

    println!("Overall status: {} {}", worst.icon(), worst);
    println!("Reports written to: {}", out_dir);
    println!();

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}
