use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use crate::config::Config;
use crate::dataset::bundle::DatasetBundle;
use crate::dataset::loader::{load_postings, load_recommendations, load_salaries};
use crate::dataset::writer::{write_report, write_table, OutputFormat};
use crate::integration::pipeline::{integrate, IntegrationOptions, PostingJoin};
use crate::integration::report::IntegrationReport;

#[derive(Debug, Args)]
pub struct IntegrateArgs {
    /// Recommendation table (defaults to JOBPREP_PRIMARY_DATASET)
    #[arg(long)]
    pub primary: Option<PathBuf>,

    /// Job postings table; skipped when blank or missing
    #[arg(long)]
    pub postings: Option<PathBuf>,

    /// Salary table; skipped when blank or missing
    #[arg(long)]
    pub salaries: Option<PathBuf>,

    /// Minimum skill similarity for a posting to count as a match
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Join postings on job id instead of skill similarity
    #[arg(long)]
    pub no_skill_matching: bool,

    /// Leave postings unjoined when skill matching is off
    #[arg(long)]
    pub no_id_fallback: bool,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Where to write the JSON summary
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// An optional input is used only when its path is non-blank and exists.
fn optional_input(path: Option<&Path>, name: &str) -> Option<PathBuf> {
    let path = path.filter(|p| !p.as_os_str().to_string_lossy().trim().is_empty())?;
    if path.exists() {
        Some(path.to_path_buf())
    } else {
        warn!("{name} file {} not found, skipping", path.display());
        None
    }
}

pub fn run(args: IntegrateArgs, config: &Config) -> Result<()> {
    let primary_path = args
        .primary
        .clone()
        .unwrap_or_else(|| config.primary_dataset.clone());
    let primary = load_recommendations(&primary_path).with_context(|| {
        format!("Failed to load recommendation table {}", primary_path.display())
    })?;

    let postings = optional_input(args.postings.as_deref(), "Postings")
        .map(|path| {
            load_postings(&path)
                .with_context(|| format!("Failed to load postings {}", path.display()))
        })
        .transpose()?;
    let salaries = optional_input(args.salaries.as_deref(), "Salary")
        .map(|path| {
            load_salaries(&path)
                .with_context(|| format!("Failed to load salaries {}", path.display()))
        })
        .transpose()?;

    let bundle = DatasetBundle::builder()
        .primary(primary)
        .postings(postings)
        .salaries(salaries)
        .build()?;

    let options = IntegrationOptions {
        use_skill_matching: !args.no_skill_matching,
        fallback_to_id_match: !args.no_id_fallback,
        tolerance: args.tolerance.unwrap_or(config.skill_tolerance),
    };
    let integrated = integrate(&bundle, &options)?;

    let output = args.output.unwrap_or_else(|| {
        config
            .output_dir
            .join(format!("integrated_job_dataset.{}", args.format.extension()))
    });
    write_table(&output, args.format, &integrated.to_table())
        .with_context(|| format!("Failed to write integrated dataset to {}", output.display()))?;

    let report = IntegrationReport::from_table(&integrated);
    let report_path = args
        .report
        .unwrap_or_else(|| config.output_dir.join("integration_report.json"));
    write_report(&report_path, &report)
        .with_context(|| format!("Failed to write report to {}", report_path.display()))?;

    let join = match integrated.posting_join() {
        Some(PostingJoin::SkillMatch) => "skill match",
        Some(PostingJoin::IdMatch) => "id match",
        None => "none",
    };
    let salary_join = if integrated.salary_joined() { "by title" } else { "skipped" };
    info!("Integration complete (posting join: {join}, salary join: {salary_join})");

    println!("Integrated dataset saved to {}", output.display());
    println!("  rows:            {}", report.total_rows);
    println!("  users:           {}", report.unique_users);
    println!("  jobs:            {}", report.unique_jobs);
    println!("  posting join:    {join}");
    println!("  posting matched: {}", report.posting_matched);
    println!("  salary join:     {salary_join}");
    println!("  salary matched:  {}", report.salary_matched);
    println!("  columns:         {}", report.columns.len());
    println!("Report saved to {}", report_path.display());
    Ok(())
}
