//! gatecheck: quality-gate compliance evaluators.
//!
//! Each subcommand is one evaluator program of the family. All of them
//! share the engine and the newline-delimited JSON result protocol;
//! they differ only in record shape and severity-reduction strategy.

mod run;

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use gatecheck_engine::{Evaluation, Output, ProtocolWriter};
use time::OffsetDateTime;

/// Quality-gate compliance evaluators.
#[derive(Parser)]
#[command(name = "gatecheck", version, about = "Quality gate compliance evaluators")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a JSON document against a check configuration
    Data {
        /// Path to the JSON record file
        #[arg(long)]
        records: PathBuf,
        /// Path to the check configuration file
        #[arg(long)]
        config: PathBuf,
    },

    /// Evaluate tracker work items against a check configuration
    Issues {
        /// Path to the JSON work-item file
        #[arg(long)]
        records: PathBuf,
        /// Path to the check configuration file
        #[arg(long)]
        config: PathBuf,
    },

    /// Evaluate time-bound manual answers
    Answers {
        /// Path to the JSON answers file
        #[arg(long)]
        answers: PathBuf,
        /// Optional configuration file supplying `cycleInDays`
        #[arg(long)]
        config: Option<PathBuf>,
        /// Reminder window in days before expiration turns YELLOW;
        /// overrides the configured `cycleInDays` (default 14)
        #[arg(long)]
        cycle_in_days: Option<u32>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Data { records, config } => run::run_data(records, config),
        Commands::Issues { records, config } => run::run_issues(records, config),
        Commands::Answers {
            answers,
            config,
            cycle_in_days,
        } => {
            // Read the clock once; the run sees one constant "now".
            let now = OffsetDateTime::now_utc();
            run::run_answers(answers, config.as_deref(), *cycle_in_days, now)
        }
    };

    if let Err(e) = report(result) {
        // Failure to write the protocol stream is a defect, not a
        // data-quality issue: surface it and exit non-zero.
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

/// Write the protocol stream. Domain failures become the terminal
/// FAILED line; the process still exits 0 in that case.
fn report(result: Result<Evaluation, run::RunError>) -> io::Result<()> {
    let stdout = io::stdout();
    let mut writer = ProtocolWriter::new(stdout.lock());

    match result {
        Ok(evaluation) => {
            writer.emit_output(
                "resultCount",
                serde_json::json!(evaluation.results.len()),
            )?;
            writer.emit_evaluation(&evaluation)?;
        }
        Err(e) => {
            writer.emit_status(&Output::failed(e.to_string()))?;
        }
    }
    writer.flush()
}
