//! Command-line interface for the complaint-triage pipeline.

pub mod args;
pub mod commands;

pub use args::TriageArgs;
pub use commands::execute_command;
