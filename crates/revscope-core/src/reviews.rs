use serde::{Deserialize, Serialize};

/// Number of reviews carried into [`AnalysisResult::sample_reviews`].
pub const SAMPLE_SIZE: usize = 5;

/// One customer review as it appeared on a reviews listing page.
///
/// Every field is the trimmed display text of its node, or an empty string
/// when the node was missing from the review card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Raw star-rating text, e.g. `"4.0 out of 5 stars"`.
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "content")]
    pub body: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub date: String,
}

/// Reviews in page-then-DOM order. Never deduplicated.
pub type ReviewCollection = Vec<ReviewRecord>;

/// Statistics and generated summary for a review collection.
///
/// Derived entirely from a [`ReviewCollection`] plus summary text, so it can
/// be rebuilt from a persisted collection at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub total_reviews: usize,
    /// Mean of the parsed star ratings. `0.0` for an empty collection.
    pub average_rating: f64,
    #[serde(alias = "aiSummary")]
    pub summary_text: String,
    /// First [`SAMPLE_SIZE`] reviews in collection order.
    pub sample_reviews: Vec<ReviewRecord>,
}
