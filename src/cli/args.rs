//! Command line argument parsing for the complaint-triage CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// complaint-triage - spam gating and disaster verification for citizen complaints
#[derive(Parser, Debug, Clone)]
#[command(name = "complaint-triage")]
#[command(about = "Two-stage gating pipeline for citizen complaints")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TriageArgs {
    /// Verbosity level (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TriageArgs {
    /// Get the effective verbosity level.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Output format for command results.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text for humans and shell pipelines.
    Human,
    /// Machine-readable JSON.
    Json,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train the ensemble and persist the artifact set
    Train(TrainArgs),

    /// Gate one complaint (spam filter, then disaster classification)
    Classify(ClassifyArgs),

    /// Run only the rule-based spam gate
    #[command(name = "check-spam")]
    CheckSpam(CheckSpamArgs),
}

/// Arguments for training.
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// CSV dataset with `text` and `label` columns (1 = disaster).
    /// Falls back to the built-in sample corpus when omitted.
    #[arg(short, long, value_name = "DATASET_CSV")]
    pub dataset: Option<PathBuf>,

    /// Directory the trained artifacts are written to
    #[arg(short, long, value_name = "MODEL_DIR", default_value = "models")]
    pub model_dir: PathBuf,
}

/// Arguments for classifying one complaint.
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Complaint text
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Directory containing the trained artifacts
    #[arg(short, long, value_name = "MODEL_DIR", default_value = "models")]
    pub model_dir: PathBuf,
}

/// Arguments for the spam check.
#[derive(Parser, Debug, Clone)]
pub struct CheckSpamArgs {
    /// Complaint text
    #[arg(value_name = "TEXT")]
    pub text: String,
}
