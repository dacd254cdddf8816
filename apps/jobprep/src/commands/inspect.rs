use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::Config;
use crate::dataset::loader::load_recommendations;
use crate::dataset::profile::DatasetProfile;
use crate::models::recommendation::RecommendationTable;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Recommendation table (defaults to JOBPREP_PRIMARY_DATASET)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Number of sample rows to print
    #[arg(long, default_value_t = 3)]
    pub rows: usize,
}

pub fn run(args: InspectArgs, config: &Config) -> Result<()> {
    let input = args.input.unwrap_or_else(|| config.primary_dataset.clone());
    let table = load_recommendations(&input)
        .with_context(|| format!("Failed to load recommendation table {}", input.display()))?;

    print!("{}", render(&table, args.rows));
    Ok(())
}

fn render(table: &RecommendationTable, sample_rows: usize) -> String {
    let profile = DatasetProfile::from_table(table);
    let mut out = String::new();

    out.push_str(&format!("Total rows:   {}\n", profile.total_rows));
    out.push_str(&format!("Unique users: {}\n", profile.unique_users));
    out.push_str(&format!("Unique jobs:  {}\n", profile.unique_jobs));
    if let (Some(min), Some(max)) = (profile.job_id_min, profile.job_id_max) {
        out.push_str(&format!("Job id range: {min} - {max}\n"));
    }
    out.push_str(&format!("Unique requirement skills: {}\n", profile.unique_skills));
    if !profile.sample_skills.is_empty() {
        out.push_str(&format!("Sample skills: {}\n", profile.sample_skills.join(", ")));
    }

    out.push_str(&format!("\n{}\n", table.columns().join(" | ")));
    for r in table.records.iter().take(sample_rows) {
        out.push_str(&format!(
            "{} | {} | {:.3} | {} | {} | {}\n",
            r.user_id,
            r.job_id,
            r.match_score,
            u8::from(r.recommended),
            r.user_skills.as_deref().unwrap_or(""),
            r.job_requirements.as_deref().unwrap_or(""),
        ));
    }
    out
}
