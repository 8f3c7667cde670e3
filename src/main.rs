use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tracing::info;

use veracity::api::{
    AnalyzeReviewRequest, ApiResponse, BulkReviewItem, BulkReviewRequest, RawReviewerData,
    TrustService,
};
use veracity::config::Config;
use veracity::dataset::ReviewDataset;
use veracity::output::terminal;
use veracity::pipeline::TrustEngine;

/// Veracity: explainable trust scoring for location reviews.
///
/// Scores individual reviews, bulk batches, whole locations and reviewers,
/// and explains every score.
#[derive(Parser)]
#[command(name = "veracity", version, about)]
struct Cli {
    /// Print the JSON envelope instead of the terminal report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single review
    Analyze {
        /// Review text
        text: String,
        /// Star rating, 1-5
        #[arg(long)]
        rating: Option<i64>,
        /// Reviewer account age in days
        #[arg(long)]
        account_age_days: Option<i64>,
        /// Reviewer's total review count
        #[arg(long)]
        review_count: Option<i64>,
        #[arg(long)]
        verified_email: bool,
        #[arg(long)]
        verified_phone: bool,
        #[arg(long)]
        profile_photo: bool,
    },

    /// Score a batch of reviews from a JSON file (array or {"reviews": [...]})
    Bulk {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// Show the trust dashboard for a location in the dataset
    Dashboard {
        /// Location id
        location_id: String,
    },

    /// Show the trust profile of a reviewer in the dataset
    Reviewer {
        /// Reviewer id
        reviewer_id: String,
    },

    /// Start the HTTP API
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("veracity=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let succeeded = match cli.command {
        Commands::Analyze {
            text,
            rating,
            account_age_days,
            review_count,
            verified_email,
            verified_phone,
            profile_photo,
        } => {
            let service = build_service(&config, ReviewDataset::default());
            let request = AnalyzeReviewRequest {
                text,
                rating,
                reviewer_data: Some(RawReviewerData {
                    account_age_days,
                    review_count,
                    verified_email,
                    verified_phone,
                    profile_photo,
                    ..Default::default()
                }),
                ..Default::default()
            };
            let response = service.analyze_review(&request);
            report(&response, cli.json, terminal::display_trust_result)?
        }

        Commands::Bulk { file } => {
            let items = read_bulk_file(&file)?;
            info!(count = items.len(), file = %file.display(), "Scoring bulk file");
            let service = build_service(&config, ReviewDataset::default());
            let response = service.analyze_bulk_reviews(&items);
            report(&response, cli.json, terminal::display_bulk)?
        }

        Commands::Dashboard { location_id } => {
            let dataset = ReviewDataset::load(&config.dataset_path)?;
            let service = build_service(&config, dataset);
            let response = service.get_trust_dashboard_data(&location_id);
            report(&response, cli.json, terminal::display_location)?
        }

        Commands::Reviewer { reviewer_id } => {
            let dataset = ReviewDataset::load(&config.dataset_path)?;
            let service = build_service(&config, dataset);
            let response = service.get_reviewer_trust_profile(&reviewer_id);
            report(&response, cli.json, terminal::display_reviewer)?
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let dataset = if config.dataset_path.exists() {
                ReviewDataset::load(&config.dataset_path)?
            } else {
                tracing::warn!(
                    path = %config.dataset_path.display(),
                    "Dataset not found, dashboard and reviewer lookups will be empty"
                );
                ReviewDataset::default()
            };
            let service = build_service(&config, dataset);
            veracity::web::run_server(service, port, &bind).await?;
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn build_service(config: &Config, dataset: ReviewDataset) -> TrustService {
    TrustService::new(
        TrustEngine::new(config.engine_config()),
        dataset,
        config.service_options(),
    )
}

/// Bulk files may hold a bare array or a `{"reviews": [...]}` object.
fn read_bulk_file(path: &Path) -> Result<Vec<BulkReviewItem>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if let Ok(items) = serde_json::from_str::<Vec<BulkReviewItem>>(&raw) {
        return Ok(items);
    }
    let request: BulkReviewRequest = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(request.reviews)
}

/// Print a response as JSON or through its terminal renderer. Returns
/// whether the response succeeded; a failure's message is printed once here.
fn report<T: Serialize>(
    response: &ApiResponse<T>,
    json: bool,
    display: impl Fn(&T),
) -> Result<bool> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else if let Some(data) = &response.data {
        display(data);
    } else if let Some(error) = &response.error {
        eprintln!("{} {}", "Error:".red().bold(), error);
    }
    Ok(response.success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use veracity::error::TrustError;

    #[test]
    fn failed_response_reports_unsuccessful() {
        let response = ApiResponse::<serde_json::Value>::failure(&TrustError::input("bad rating"));
        assert!(!report(&response, false, |_| {}).unwrap());
    }

    #[test]
    fn successful_response_is_displayed() {
        let response = ApiResponse::ok(serde_json::json!({"trust_score": 0.7}));
        let shown = std::cell::Cell::new(false);
        assert!(report(&response, false, |_| shown.set(true)).unwrap());
        assert!(shown.get());
    }
}
