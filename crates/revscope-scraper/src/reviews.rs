//! Review listing field table.

use revscope_core::ReviewRecord;

use crate::extract::{extract_cards, FieldSpec};

/// One customer review card on the listing page.
pub const REVIEW_CARD_SELECTOR: &str = ".review";

/// "See all reviews" link on the product page.
pub const SEE_ALL_REVIEWS_SELECTOR: &str = ".a-link-emphasis.a-text-bold";

/// "Next page" control on the review listing.
pub const NEXT_PAGE_SELECTOR: &str = ".a-last a";

/// Per-card fields. Missing nodes degrade to an empty string.
pub const REVIEW_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("rating", ".a-icon-alt", ""),
    FieldSpec::text(
        "title",
        ".review-title span:not(.a-icon-alt):not(.a-letter-space)",
        "",
    ),
    FieldSpec::text("body", ".review-text-content span", ""),
    FieldSpec::text("author", ".a-profile-name", ""),
    FieldSpec::text("date", ".review-date", ""),
];

/// Extracts the review batch on one listing page, in DOM order.
#[must_use]
pub fn extract_reviews(html: &str) -> Vec<ReviewRecord> {
    extract_cards(html, REVIEW_CARD_SELECTOR, REVIEW_FIELDS)
        .into_iter()
        .map(|fields| ReviewRecord {
            rating: fields.text("rating"),
            title: fields.text("title"),
            body: fields.text("body"),
            author: fields.text("author"),
            date: fields.text("date"),
        })
        .collect()
}
