pub mod demo;
pub mod generate_logs;
pub mod inspect;
pub mod integrate;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::dataset::table::Table;

#[derive(Debug, Parser)]
#[command(
    name = "jobprep",
    version,
    about = "Offline data preparation for the job-recommendation dataset"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Synthesize swipe interaction logs from the labeled recommendation table
    GenerateLogs(generate_logs::GenerateLogsArgs),
    /// Join the recommendation table with job postings and salary statistics
    Integrate(integrate::IntegrateArgs),
    /// Print a feasibility profile of the recommendation table
    Inspect(inspect::InspectArgs),
    /// Run the integration steps on small built-in fixtures and print the results
    Demo(demo::DemoArgs),
}

pub fn dispatch(cli: Cli, config: &Config) -> Result<()> {
    match cli.command {
        Command::GenerateLogs(args) => generate_logs::run(args, config),
        Command::Integrate(args) => integrate::run(args, config),
        Command::Inspect(args) => inspect::run(args, config),
        Command::Demo(args) => demo::run(args, config),
    }
}

// ──────────────────────────────────────────────
// Console output helpers
// ──────────────────────────────────────────────

/// Renders the named columns of a table, one row per line. Unknown columns
/// are skipped; null cells render as empty.
pub(crate) fn format_columns(table: &Table, columns: &[&str]) -> String {
    let indices: Vec<(usize, &str)> = columns
        .iter()
        .filter_map(|name| table.column_index(name).map(|i| (i, *name)))
        .collect();

    let header: Vec<&str> = indices.iter().map(|(_, name)| *name).collect();
    let mut out = format!("  {}\n", header.join(" | "));
    for row in &table.rows {
        let fields: Vec<String> = indices.iter().map(|(i, _)| row[*i].to_field()).collect();
        out.push_str(&format!("  {}\n", fields.join(" | ")));
    }
    out
}
