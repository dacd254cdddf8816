use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::Config;
use crate::dataset::loader::load_recommendations;
use crate::dataset::writer::{write_records, OutputFormat};
use crate::synthesis::realistic::{generate_realistic_logs, SynthesisParams};
use crate::synthesis::simple::generate_simple_logs;
use crate::synthesis::stats::LogStats;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogMode {
    /// Ranked views per user with probabilistic swipes
    #[default]
    Realistic,
    /// One event per row, decided by the Recommended label
    Simple,
}

impl LogMode {
    pub fn label(&self) -> &'static str {
        match self {
            LogMode::Realistic => "realistic",
            LogMode::Simple => "simple",
        }
    }
}

#[derive(Debug, Args)]
pub struct GenerateLogsArgs {
    /// Recommendation table to read (defaults to JOBPREP_PRIMARY_DATASET)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = LogMode::Realistic)]
    pub mode: LogMode,

    #[arg(long)]
    pub views_min: Option<usize>,

    #[arg(long)]
    pub views_max: Option<usize>,

    #[arg(long)]
    pub like_multiplier: Option<f64>,

    /// RNG seed; a random one is drawn and logged when absent
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
}

/// `user_interaction_logs_<mode>.<ext>` inside the configured output directory.
pub fn default_output(config: &Config, mode: LogMode, format: OutputFormat) -> PathBuf {
    config.output_dir.join(format!(
        "user_interaction_logs_{}.{}",
        mode.label(),
        format.extension()
    ))
}

pub fn run(args: GenerateLogsArgs, config: &Config) -> Result<()> {
    let input = args.input.unwrap_or_else(|| config.primary_dataset.clone());
    let table = load_recommendations(&input)
        .with_context(|| format!("Failed to load recommendation table {}", input.display()))?;

    let now = Utc::now();
    let events = match args.mode {
        LogMode::Realistic => {
            let params = SynthesisParams {
                views_min: args.views_min.unwrap_or(config.views_min),
                views_max: args.views_max.unwrap_or(config.views_max),
                like_multiplier: args.like_multiplier.unwrap_or(config.like_multiplier),
            };
            let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
            info!("Using seed {seed}");
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            generate_realistic_logs(&table, &params, now, &mut rng)?
        }
        LogMode::Simple => generate_simple_logs(&table, now)?,
    };

    let output = args
        .output
        .unwrap_or_else(|| default_output(config, args.mode, args.format));
    write_records(&output, args.format, &events)
        .with_context(|| format!("Failed to write interaction logs to {}", output.display()))?;

    let stats = LogStats::from_events(&events);
    println!("Saved {} interactions to {}", stats.total, output.display());
    println!("  users:        {}", stats.unique_users);
    println!("  jobs:         {}", stats.unique_jobs);
    println!("  likes:        {} ({:.1}%)", stats.likes, stats.like_rate());
    println!("  dislikes:     {}", stats.dislikes);
    println!(
        "  per user:     mean {:.1}, min {}, max {}",
        stats.mean_per_user, stats.min_per_user, stats.max_per_user
    );
    Ok(())
}
