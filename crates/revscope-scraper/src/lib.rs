//! Page extraction for revscope.
//!
//! A [`Browser`] hands out one [`PageSession`] per run. Field values are read
//! from DOM snapshots through declarative [`FieldSpec`] tables, so the product
//! page and the review listing share one extraction primitive. The
//! [`ReviewPaginator`] walks "next page" controls until none is left or the
//! configured page cap is hit.

pub mod browser;
pub mod error;
pub mod extract;
pub mod pagination;
pub mod product;
pub mod reviews;

pub use browser::{resolve_link, Browser, BrowserOptions, ChromiumBrowser, PageSession, StaticBrowser};
pub use error::ScraperError;
pub use extract::{ExtractedFields, FieldKind, FieldSpec, FieldValue, PairCells, Transform};
pub use pagination::{collect_reviews, open_all_reviews, PaginatorState, ReviewPaginator};
pub use product::extract_product;
pub use reviews::extract_reviews;
