//! complaint-triage CLI binary.

use clap::Parser;
use complaint_triage::cli::{TriageArgs, execute_command};
use std::process;

fn main() {
    let args = TriageArgs::parse();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
