use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::aggregate::AggregateOptions;
use crate::api::ServiceOptions;
use crate::detection::DetectorConfig;
use crate::pipeline::EngineConfig;
use crate::scoring::trust::TrustWeights;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting has a default, so an empty environment is a valid one.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON dataset behind dashboard and reviewer lookups (VERACITY_DATASET)
    pub dataset_path: PathBuf,
    /// Largest accepted bulk request (VERACITY_MAX_BULK)
    pub max_bulk_reviews: usize,
    /// Days in a dashboard trend (VERACITY_TREND_DAYS)
    pub trend_days: u32,
    /// Length of top-trusted and flagged lists (VERACITY_TOP_K)
    pub top_k: usize,
    /// Burst detection window width (VERACITY_BURST_WINDOW_HOURS)
    pub burst_window_hours: i64,
    /// Ensemble weights (VERACITY_WEIGHT_*)
    pub weights: TrustWeights,
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} is not a valid value: {raw:?}")),
        _ => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let defaults = TrustWeights::default();
        let weights = TrustWeights {
            authenticity: parse_var("VERACITY_WEIGHT_AUTHENTICITY", defaults.authenticity)?,
            sentiment_quality: parse_var("VERACITY_WEIGHT_SENTIMENT", defaults.sentiment_quality)?,
            reviewer_credibility: parse_var(
                "VERACITY_WEIGHT_CREDIBILITY",
                defaults.reviewer_credibility,
            )?,
            content_quality: parse_var("VERACITY_WEIGHT_CONTENT", defaults.content_quality)?,
            temporal_consistency: parse_var(
                "VERACITY_WEIGHT_TEMPORAL",
                defaults.temporal_consistency,
            )?,
        };
        weights.validate().map_err(anyhow::Error::msg)?;

        let config = Self {
            dataset_path: env::var("VERACITY_DATASET")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./reviews.json")),
            max_bulk_reviews: parse_var("VERACITY_MAX_BULK", 100)?,
            trend_days: parse_var("VERACITY_TREND_DAYS", 30)?,
            top_k: parse_var("VERACITY_TOP_K", 5)?,
            burst_window_hours: parse_var("VERACITY_BURST_WINDOW_HOURS", 24)?,
            weights,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_bulk_reviews == 0 {
            anyhow::bail!("VERACITY_MAX_BULK must be at least 1");
        }
        if self.trend_days == 0 {
            anyhow::bail!("VERACITY_TREND_DAYS must be at least 1");
        }
        if self.burst_window_hours <= 0 {
            anyhow::bail!("VERACITY_BURST_WINDOW_HOURS must be positive");
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            trust_weights: self.weights,
            detector: DetectorConfig {
                burst_window: chrono::Duration::hours(self.burst_window_hours),
                ..DetectorConfig::default()
            },
            ..EngineConfig::default()
        }
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            max_bulk_reviews: self.max_bulk_reviews,
            aggregate: AggregateOptions {
                trend_days: self.trend_days,
                top_k: self.top_k,
                ..AggregateOptions::default()
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("./reviews.json"),
            max_bulk_reviews: 100,
            trend_days: 30,
            top_k: 5,
            burst_window_hours: 24,
            weights: TrustWeights::default(),
        }
    }
}
