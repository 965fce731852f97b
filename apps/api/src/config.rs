use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::ranking::composite::ScoringWeights;
use crate::ranking::features::{EducationRanks, DEFAULT_EXPERIENCE_CAP_YEARS};
use crate::ranking::pipeline::ScoringConfig;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub scoring: ScoringConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (the process
    /// environment in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = ScoringWeights::default();
        let weights = ScoringWeights {
            skill: parse_or(&lookup, "WEIGHT_SKILL", defaults.skill)?,
            experience: parse_or(&lookup, "WEIGHT_EXPERIENCE", defaults.experience)?,
            education: parse_or(&lookup, "WEIGHT_EDUCATION", defaults.education)?,
        };

        let education_ranks = match lookup("EDUCATION_RANKS") {
            Some(raw) if !raw.trim().is_empty() => {
                parse_education_ranks(&raw).context("EDUCATION_RANKS is malformed")?
            }
            _ => EducationRanks::default(),
        };

        let scoring = ScoringConfig {
            weights,
            experience_cap_years: parse_or(
                &lookup,
                "EXPERIENCE_CAP_YEARS",
                DEFAULT_EXPERIENCE_CAP_YEARS,
            )?,
            education_ranks,
        };
        scoring.validate().context("Invalid scoring configuration")?;

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            scoring,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        _ => Ok(default),
    }
}

/// Parses `phd=5,masters=4,...` into a rank table.
pub fn parse_education_ranks(raw: &str) -> Result<EducationRanks> {
    let mut pairs = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((level, rank)) = item.split_once('=') else {
            bail!("expected 'level=rank', got '{item}'");
        };
        let level = level.trim();
        if level.is_empty() {
            bail!("empty education level in '{item}'");
        }
        let rank: u32 = rank
            .trim()
            .parse()
            .with_context(|| format!("rank for '{level}' must be a non-negative integer"))?;
        pairs.push((level.to_string(), rank));
    }
    if pairs.is_empty() {
        bail!("no education levels given");
    }
    Ok(EducationRanks::from_pairs(pairs))
}
