//! Prompt construction and the fallible summary call.

use revscope_core::ReviewRecord;

use crate::completion::CompletionClient;

/// Returned in place of a summary whenever the completion call fails.
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable";

/// Reviews beyond this many are left out of the prompt.
pub const MAX_PROMPT_REVIEWS: usize = 50;

/// Builds the review-analysis prompt from the first [`MAX_PROMPT_REVIEWS`]
/// reviews, one `title: body` line each, in collection order.
#[must_use]
pub fn review_prompt(reviews: &[ReviewRecord]) -> String {
    let review_texts = reviews
        .iter()
        .take(MAX_PROMPT_REVIEWS)
        .map(|r| format!("{}: {}", r.title, r.body))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze these product reviews and create a concise summary highlighting:\n\
         1. Overall sentiment (positive/neutral/negative)\n\
         2. Most praised features\n\
         3. Common complaints\n\
         4. Key insights for potential buyers\n\
         \n\
         Reviews:\n{review_texts}"
    )
}

/// Builds the product-overview prompt from the product name and its feature
/// bullets.
#[must_use]
pub fn product_prompt(name: &str, features: &[String]) -> String {
    let feature_lines = if features.is_empty() {
        "- (none listed)".to_string()
    } else {
        features
            .iter()
            .map(|feature| format!("- {feature}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Write a concise summary of this product for a potential buyer, covering what it is, \
         its standout features and who it suits.\n\nProduct: {name}\nFeatures:\n{feature_lines}\n"
    )
}

/// Calls `client` once with `prompt`.
///
/// Never fails: any completion error is logged and replaced with
/// [`SUMMARY_UNAVAILABLE`].
pub async fn summarize(client: &dyn CompletionClient, prompt: &str) -> String {
    match client.generate(prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "summary generation failed; using fallback text");
            SUMMARY_UNAVAILABLE.to_string()
        }
    }
}
