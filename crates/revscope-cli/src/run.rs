//! Command handlers. Each one runs a single pipeline operation and writes
//! its result as pretty-printed JSON.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use revscope_analysis::{build_analysis, Pipeline, PipelineConfig, SUMMARY_UNAVAILABLE};
use revscope_core::{AppConfig, ReviewCollection};

fn build_pipeline(config: &AppConfig) -> anyhow::Result<Pipeline> {
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; summaries will be unavailable");
    }
    Pipeline::new(PipelineConfig::from_app_config(config))
        .context("failed to build scrape pipeline")
}

pub(crate) async fn run_product(config: &AppConfig, url: &str, output: &Path) -> anyhow::Result<()> {
    let pipeline = build_pipeline(config)?;
    let record = pipeline.scrape_product(url).await?;
    write_json(output, &record)?;
    println!("product '{}' written to {}", record.name, output.display());
    Ok(())
}

pub(crate) async fn run_reviews(
    config: &AppConfig,
    url: &str,
    output: &Path,
    save_reviews: Option<&Path>,
) -> anyhow::Result<()> {
    let pipeline = build_pipeline(config)?;
    let reviews = pipeline.collect_reviews(url).await?;

    if let Some(path) = save_reviews {
        write_json(path, &reviews)?;
        tracing::info!(path = %path.display(), count = reviews.len(), "saved review collection");
    }

    let analysis = pipeline.analyze_collection(&reviews).await;
    write_json(output, &analysis)?;
    println!(
        "{} reviews (average {:.2}) written to {}",
        analysis.total_reviews,
        analysis.average_rating,
        output.display()
    );
    Ok(())
}

/// Recomputes the analysis for a saved collection.
///
/// With `no_summary` no completion call is made and the summary is the
/// fallback text.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    reviews_path: &Path,
    output: &Path,
    no_summary: bool,
) -> anyhow::Result<()> {
    let reviews = read_reviews(reviews_path)?;

    let analysis = if no_summary {
        build_analysis(&reviews, SUMMARY_UNAVAILABLE)
    } else {
        build_pipeline(config)?.analyze_collection(&reviews).await
    };

    write_json(output, &analysis)?;
    println!(
        "{} reviews (average {:.2}) written to {}",
        analysis.total_reviews,
        analysis.average_rating,
        output.display()
    );
    Ok(())
}

fn read_reviews(path: &Path) -> anyhow::Result<ReviewCollection> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of reviews", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
