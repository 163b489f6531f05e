//! Product page field table and record assembly.

use revscope_core::{
    parse_star_rating, PriceInfo, ProductRecord, RatingInfo, Specifications, NOT_AVAILABLE,
    UNKNOWN_NAME,
};

use crate::extract::{extract_document, FieldSpec, Transform};

const NAME: &str = "name";
const RATING: &str = "rating";
const RATING_COUNT: &str = "rating_count";
const PRICE: &str = "price";
const DISCOUNT: &str = "discount";
const BANK_OFFERS: &str = "bank_offers";
const FEATURES: &str = "features";
const SPECIFICATIONS: &str = "specifications";
const DETAIL_ROWS: &str = "detail_rows";
const IMAGES: &str = "images";
const MANUFACTURER_IMAGES: &str = "manufacturer_images";

/// Gallery thumbnails for videos carry this overlay in their `src`.
const VIDEO_OVERLAY: &str = "play-icon";

pub const PRODUCT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text(NAME, "#productTitle", UNKNOWN_NAME),
    FieldSpec::text(RATING, "#acrPopover .a-icon-alt", NOT_AVAILABLE),
    FieldSpec::text(RATING_COUNT, "#acrCustomerReviewText", NOT_AVAILABLE),
    FieldSpec::text(PRICE, ".a-price-whole", NOT_AVAILABLE),
    FieldSpec::text(DISCOUNT, ".savingsPercentage", ""),
    FieldSpec::list(BANK_OFFERS, ".offers-items-content", Transform::Text),
    FieldSpec::list(
        FEATURES,
        "#feature-bullets li span.a-list-item",
        Transform::Text,
    ),
    FieldSpec::pairs(
        SPECIFICATIONS,
        "#productDetails_techSpec_section_1 tr, #productDetails_detailBullets_sections1 tr",
        "th",
        "td",
    ),
    FieldSpec::cell_pairs(DETAIL_ROWS, "#productDetailsTable tr", "td"),
    FieldSpec::list_excluding(
        IMAGES,
        "#altImages img",
        Transform::Attr("src"),
        VIDEO_OVERLAY,
    ),
    FieldSpec::list(
        MANUFACTURER_IMAGES,
        "#manufacturer-image-container img",
        Transform::Attr("src"),
    ),
];

/// Builds a [`ProductRecord`] from a product page snapshot.
///
/// The summary is left empty; it is filled in by the analysis step.
#[must_use]
pub fn extract_product(html: &str) -> ProductRecord {
    let fields = extract_document(html, PRODUCT_FIELDS);

    let rating_display = fields.text(RATING);
    let stars = parse_star_rating(&rating_display);

    // Amazon renders the whole-number part with a trailing decimal point.
    let selling = fields.text(PRICE).trim_end_matches('.').to_string();
    let discount = Some(fields.text(DISCOUNT)).filter(|d| !d.is_empty());

    let specifications: Specifications = fields
        .pairs(SPECIFICATIONS)
        .into_iter()
        .chain(fields.pairs(DETAIL_ROWS))
        .collect();

    ProductRecord {
        name: fields.text(NAME),
        rating: RatingInfo {
            display: rating_display,
            stars,
            count: fields.text(RATING_COUNT),
        },
        price: PriceInfo { selling, discount },
        bank_offers: fields.list(BANK_OFFERS),
        features: fields.list(FEATURES),
        specifications,
        images: fields.list(IMAGES),
        manufacturer_images: fields.list(MANUFACTURER_IMAGES),
        summary: String::new(),
    }
}
