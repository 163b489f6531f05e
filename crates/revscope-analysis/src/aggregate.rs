//! Review collection statistics.

use revscope_core::{parse_star_rating, AnalysisResult, ReviewRecord, SAMPLE_SIZE};

/// Count, mean rating and leading sample of a review collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewStats {
    pub total_reviews: usize,
    pub average_rating: f64,
    pub sample_reviews: Vec<ReviewRecord>,
}

impl ReviewStats {
    /// Reduces `reviews` to statistics.
    ///
    /// A review whose rating text has no leading number counts as `0.0` but
    /// still counts toward the denominator. An empty collection averages to
    /// `0.0`.
    #[must_use]
    pub fn from_reviews(reviews: &[ReviewRecord]) -> Self {
        let total_reviews = reviews.len();

        let average_rating = if total_reviews == 0 {
            0.0
        } else {
            let sum: f64 = reviews
                .iter()
                .map(|r| parse_star_rating(&r.rating).unwrap_or(0.0))
                .sum();
            #[allow(clippy::cast_precision_loss)]
            let denom = total_reviews as f64;
            sum / denom
        };

        Self {
            total_reviews,
            average_rating,
            sample_reviews: reviews.iter().take(SAMPLE_SIZE).cloned().collect(),
        }
    }
}

/// Builds the final analysis for `reviews` with an already generated summary.
#[must_use]
pub fn build_analysis(reviews: &[ReviewRecord], summary_text: impl Into<String>) -> AnalysisResult {
    let stats = ReviewStats::from_reviews(reviews);
    AnalysisResult {
        total_reviews: stats.total_reviews,
        average_rating: stats.average_rating,
        summary_text: summary_text.into(),
        sample_reviews: stats.sample_reviews,
    }
}
