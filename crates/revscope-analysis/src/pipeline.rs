//! End-to-end pipeline orchestration.

use std::sync::Arc;
use std::time::Duration;

use revscope_core::{AnalysisResult, AppConfig, ProductRecord, ReviewCollection, ReviewRecord};
use revscope_scraper::pagination::collect_reviews;
use revscope_scraper::{extract_product, Browser, BrowserOptions, ChromiumBrowser, PageSession};

use crate::aggregate::build_analysis;
use crate::completion::{CompletionClient, CompletionConfig, GeminiClient};
use crate::error::{CompletionError, PipelineError};
use crate::summary::{product_prompt, review_prompt, summarize};

/// Everything one pipeline run needs, passed in explicitly.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_review_pages: usize,
    pub browser: BrowserOptions,
    pub completion: CompletionConfig,
}

impl PipelineConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_review_pages: config.max_review_pages,
            browser: BrowserOptions {
                headless: config.headless,
                executable: config.chrome_executable.clone(),
                navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
            },
            completion: CompletionConfig {
                api_key: config.gemini_api_key.clone(),
                model: config.gemini_model.clone(),
                base_url: config.gemini_base_url.clone(),
                timeout: Duration::from_secs(config.completion_timeout_secs),
            },
        }
    }
}

pub struct Pipeline {
    browser: Arc<dyn Browser>,
    completion: Arc<dyn CompletionClient>,
    max_review_pages: usize,
}

impl Pipeline {
    /// Builds a pipeline backed by headless Chromium and Gemini.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::Http`] if the HTTP client cannot be built.
    pub fn new(config: PipelineConfig) -> Result<Self, CompletionError> {
        let completion = GeminiClient::new(config.completion)?;
        Ok(Self::with_capabilities(
            Arc::new(ChromiumBrowser::new(config.browser)),
            Arc::new(completion),
            config.max_review_pages,
        ))
    }

    /// Builds a pipeline over caller-supplied browser and completion services.
    #[must_use]
    pub fn with_capabilities(
        browser: Arc<dyn Browser>,
        completion: Arc<dyn CompletionClient>,
        max_review_pages: usize,
    ) -> Self {
        Self {
            browser,
            completion,
            max_review_pages,
        }
    }

    /// Extracts the product record on `url` and attaches a generated overview.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Scrape`] if the page cannot be opened or read. A
    /// failed summary is not an error.
    pub async fn scrape_product(&self, url: &str) -> Result<ProductRecord, PipelineError> {
        tracing::info!(url, "scraping product page");
        let mut session = self.browser.open(url).await?;
        let html = session.as_mut().content().await;
        release(session).await;

        let mut record = extract_product(&html?);
        record.summary = summarize(
            self.completion.as_ref(),
            &product_prompt(&record.name, &record.features),
        )
        .await;

        tracing::info!(url, name = %record.name, "product page scraped");
        Ok(record)
    }

    /// Walks every review page reachable from `url`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Scrape`] on navigation failure or when the page cap
    /// is exceeded.
    pub async fn collect_reviews(&self, url: &str) -> Result<ReviewCollection, PipelineError> {
        tracing::info!(url, "fetching customer reviews");
        let mut session = self.browser.open(url).await?;
        let outcome = collect_reviews(session.as_mut(), self.max_review_pages).await;
        release(session).await;

        let reviews = outcome?;
        tracing::info!(url, count = reviews.len(), "fetched customer reviews");
        Ok(reviews)
    }

    /// Collects all reviews for `url`, summarizes them and computes the
    /// aggregate statistics.
    ///
    /// # Errors
    ///
    /// See [`Self::collect_reviews`].
    pub async fn analyze_reviews(&self, url: &str) -> Result<AnalysisResult, PipelineError> {
        let reviews = self.collect_reviews(url).await?;
        Ok(self.analyze_collection(&reviews).await)
    }

    /// Summarizes and aggregates an already collected review set.
    pub async fn analyze_collection(&self, reviews: &[ReviewRecord]) -> AnalysisResult {
        tracing::info!(count = reviews.len(), "generating review summary");
        let summary = summarize(self.completion.as_ref(), &review_prompt(reviews)).await;
        build_analysis(reviews, summary)
    }
}

async fn release(session: Box<dyn PageSession>) {
    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "failed to close page session");
    }
}
