mod scrape;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use revscope_analysis::{CompletionClient, Pipeline};
use revscope_scraper::Browser;

use crate::middleware::{request_id, REQUEST_ID_HEADER};

/// Shared capabilities; each request builds its own [`Pipeline`] over them.
#[derive(Clone)]
pub struct AppState {
    pub browser: Arc<dyn Browser>,
    pub completion: Arc<dyn CompletionClient>,
    pub max_review_pages: usize,
}

impl AppState {
    pub(super) fn pipeline(&self) -> Pipeline {
        Pipeline::with_capabilities(
            Arc::clone(&self.browser),
            Arc::clone(&self.completion),
            self.max_review_pages,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Logs the pipeline failure and hides its detail from the client.
pub(super) fn map_pipeline_error(
    request_id: String,
    error: &revscope_analysis::PipelineError,
) -> ApiError {
    tracing::error!(error = %error, request_id = %request_id, "scrape pipeline failed");
    ApiError::new(request_id, "internal_error", "failed to scrape product")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/scrape", post(scrape::scrape_product))
        .route("/api/reviews", post(scrape::analyze_reviews))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> Json<HealthData> {
    Json(HealthData { status: "ok" })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use revscope_analysis::{CompletionError, SUMMARY_UNAVAILABLE};
    use revscope_scraper::StaticBrowser;

    use super::*;

    const PRODUCT_URL: &str = "https://shop.test/dp/B0TEST";
    const REVIEWS_URL: &str = "https://shop.test/product-reviews/B0TEST";

    struct StubCompletion {
        reply: Option<&'static str>,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl CompletionClient for StubCompletion {
        async fn generate(&self, _prompt: &str) -> Result<String, CompletionError> {
            *self.calls.lock().expect("calls lock") += 1;
            self.reply
                .map(str::to_string)
                .ok_or(CompletionError::EmptyResponse)
        }
    }

    fn stub(reply: Option<&'static str>) -> Arc<StubCompletion> {
        Arc::new(StubCompletion {
            reply,
            calls: Mutex::new(0),
        })
    }

    fn shop() -> StaticBrowser {
        StaticBrowser::new()
            .with_page(
                PRODUCT_URL,
                format!(
                    r#"<html><body>
                      <span id="productTitle"> Trail Runner 3 </span>
                      <span class="a-price-whole">2,499.</span>
                      <a class="a-link-emphasis a-text-bold" href="{REVIEWS_URL}">See all reviews</a>
                    </body></html>"#
                ),
            )
            .with_page(
                REVIEWS_URL,
                r#"<html><body>
                  <div class="review"><span class="a-icon-alt">4.0 out of 5 stars</span>
                    <a class="review-title"><span>Comfy</span></a></div>
                  <div class="review"><span class="a-icon-alt">2.0 out of 5 stars</span>
                    <a class="review-title"><span>Narrow</span></a></div>
                </body></html>"#,
            )
    }

    fn app_with(browser: StaticBrowser, completion: Arc<StubCompletion>) -> Router {
        build_app(AppState {
            browser: Arc::new(browser),
            completion,
            max_review_pages: 10,
        })
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_internal_error_maps_to_server_error() {
        let response = ApiError::new("req-1", "internal_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app_with(StaticBrowser::new(), stub(None))
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(json_body(response).await, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn scrape_returns_product_record_with_summary() {
        let completion = stub(Some("Light trail shoe."));
        let response = app_with(shop(), Arc::clone(&completion))
            .oneshot(post_json("/api/scrape", &format!(r#"{{"url":"{PRODUCT_URL}"}}"#)))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["name"], "Trail Runner 3");
        assert_eq!(json["price"]["selling"], "2,499");
        assert_eq!(json["summary"], "Light trail shoe.");
        assert_eq!(*completion.calls.lock().expect("calls lock"), 1);
    }

    #[tokio::test]
    async fn reviews_returns_analysis_result() {
        let response = app_with(shop(), stub(None))
            .oneshot(post_json("/api/reviews", &format!(r#"{{"url":"{PRODUCT_URL}"}}"#)))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["totalReviews"], 2);
        assert_eq!(json["averageRating"], 3.0);
        assert_eq!(json["summaryText"], SUMMARY_UNAVAILABLE);
        assert_eq!(json["sampleReviews"][1]["title"], "Narrow");
    }

    #[tokio::test]
    async fn empty_url_is_a_validation_error() {
        let completion = stub(Some("unused"));
        let browser = shop();
        let response = app_with(browser.clone(), Arc::clone(&completion))
            .oneshot(post_json("/api/scrape", r#"{"url":"  "}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
        assert_eq!(browser.sessions_opened(), 0);
    }

    #[tokio::test]
    async fn non_http_url_is_a_validation_error() {
        let response = app_with(shop(), stub(None))
            .oneshot(post_json("/api/reviews", r#"{"url":"ftp://shop.test/x"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let response = app_with(shop(), stub(None))
            .oneshot(post_json("/api/scrape", "{not json"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn pipeline_failure_is_a_generic_server_error() {
        let response = app_with(StaticBrowser::new(), stub(None))
            .oneshot(post_json("/api/scrape", r#"{"url":"https://shop.test/missing"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "internal_error");
        assert_eq!(json["error"]["message"], "failed to scrape product");
    }
}
