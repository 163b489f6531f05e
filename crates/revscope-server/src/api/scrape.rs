use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use reqwest::Url;
use serde::Deserialize;

use revscope_core::{AnalysisResult, ProductRecord};

use crate::middleware::RequestId;

use super::{map_pipeline_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ScrapeRequest {
    #[serde(default)]
    url: String,
}

/// Accepts absolute `http`/`https` URLs only.
fn validate_url(request_id: &str, raw: &str) -> Result<String, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::new(request_id, "validation_error", "url is required"));
    }
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url.into()),
        _ => Err(ApiError::new(
            request_id,
            "validation_error",
            "url must be an absolute http(s) URL",
        )),
    }
}

fn read_url(
    request_id: &str,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<String, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        ApiError::new(request_id, "validation_error", "body must be {\"url\": \"...\"}")
    })?;
    validate_url(request_id, &body.url)
}

pub(super) async fn scrape_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ProductRecord>, ApiError> {
    let url = read_url(&req_id.0, payload)?;
    state
        .pipeline()
        .scrape_product(&url)
        .await
        .map(Json)
        .map_err(|e| map_pipeline_error(req_id.0, &e))
}

pub(super) async fn analyze_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let url = read_url(&req_id.0, payload)?;
    state
        .pipeline()
        .analyze_reviews(&url)
        .await
        .map(Json)
        .map_err(|e| map_pipeline_error(req_id.0, &e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_url_trims_and_accepts_https() {
        let url = validate_url("r", "  https://shop.test/dp/B0 ").expect("valid");
        assert_eq!(url, "https://shop.test/dp/B0");
    }

    #[test]
    fn validate_url_rejects_relative_and_other_schemes() {
        assert!(validate_url("r", "/dp/B0").is_err());
        assert!(validate_url("r", "javascript:alert(1)").is_err());
        assert!(validate_url("r", "").is_err());
    }
}
