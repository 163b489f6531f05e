//! Review aggregation, summary generation and the end-to-end pipeline.
//!
//! The pipeline opens one page session per run, extracts either a product
//! record or the full review collection, reduces reviews to count/average
//! statistics and asks a completion service for a prose summary. Summary
//! failures degrade to [`SUMMARY_UNAVAILABLE`]; navigation failures abort
//! the run.

pub mod aggregate;
pub mod completion;
pub mod error;
pub mod pipeline;
pub mod summary;

pub use aggregate::{build_analysis, ReviewStats};
pub use completion::{CompletionClient, CompletionConfig, GeminiClient};
pub use error::{CompletionError, PipelineError};
pub use pipeline::{Pipeline, PipelineConfig};
pub use summary::{product_prompt, review_prompt, summarize, MAX_PROMPT_REVIEWS, SUMMARY_UNAVAILABLE};
