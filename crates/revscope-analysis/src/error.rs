use thiserror::Error;

use revscope_scraper::ScraperError;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no completion API key configured")]
    MissingApiKey,

    #[error("unexpected HTTP status {status} from completion service: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("completion response could not be parsed: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("completion response contained no text")]
    EmptyResponse,
}

/// The one failure class a pipeline caller sees. No partial record
/// accompanies it.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("page extraction failed: {0}")]
    Scrape(#[from] ScraperError),
}
