use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Runtime configuration loaded from environment variables (and `.env`).
/// Every value has a default; command-line flags override what is loaded here.
#[derive(Debug, Clone)]
pub struct Config {
    pub primary_dataset: PathBuf,
    pub output_dir: PathBuf,
    pub skill_tolerance: f64,
    pub views_min: usize,
    pub views_max: usize,
    pub like_multiplier: f64,
    pub seed: Option<u64>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            primary_dataset: lookup("JOBPREP_PRIMARY_DATASET")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("job_dataset.csv")),
            output_dir: lookup("JOBPREP_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            skill_tolerance: parse_or(&lookup, "JOBPREP_SKILL_TOLERANCE", 0.7)?,
            views_min: parse_or(&lookup, "JOBPREP_VIEWS_MIN", 5)?,
            views_max: parse_or(&lookup, "JOBPREP_VIEWS_MAX", 20)?,
            like_multiplier: parse_or(&lookup, "JOBPREP_LIKE_MULTIPLIER", 0.9)?,
            seed: lookup("JOBPREP_SEED")
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .context("JOBPREP_SEED must be an unsigned integer")
                })
                .transpose()?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.primary_dataset, PathBuf::from("job_dataset.csv"));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!((config.skill_tolerance - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.views_min, 5);
        assert_eq!(config.views_max, 20);
        assert!((config.like_multiplier - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.seed, None);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("JOBPREP_SKILL_TOLERANCE", "0.5"),
            ("JOBPREP_VIEWS_MIN", "2"),
            ("JOBPREP_VIEWS_MAX", " 8 "),
            ("JOBPREP_SEED", "42"),
            ("JOBPREP_OUTPUT_DIR", "/tmp/out"),
        ]))
        .unwrap();
        assert!((config.skill_tolerance - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.views_min, 2);
        assert_eq!(config.views_max, 8);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_malformed_value_names_variable() {
        let err = Config::from_lookup(lookup_from(&[("JOBPREP_VIEWS_MAX", "many")])).unwrap_err();
        assert!(err.to_string().contains("JOBPREP_VIEWS_MAX"));
    }

    #[test]
    fn test_malformed_seed_is_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("JOBPREP_SEED", "-1")])).is_err());
    }
}
