//! HTTP surface: submit, list and dashboard endpoints plus the OpenAPI docs.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::dashboard::{self, Dashboard, SentimentCount, ThemeCount};
use crate::db::FeedbackStore;
use crate::error::Result;
use crate::models::{ClassifiedFeedback, FeedbackRecord, FeedbackSubmission, Sentiment, Theme};

pub const SUBMIT_ACK: &str = "Feedback stored successfully";

pub struct AppState {
    pub store: FeedbackStore,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitResponse {
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Feedback Hub API"),
    paths(submit_feedback, get_reviews, get_dashboard),
    components(
        schemas(
            FeedbackSubmission,
            FeedbackRecord,
            SubmitResponse,
            Dashboard,
            SentimentCount,
            ThemeCount,
            Sentiment,
            Theme
        )
    ),
    tags(
        (name = "feedback", description = "Review collection and product dashboards")
    )
)]
pub struct ApiDoc;

/// Classifies and stores a review.
#[utoipa::path(
    post,
    path = "/feedback",
    tag = "feedback",
    request_body = FeedbackSubmission,
    responses(
        (status = 200, description = "Review stored", body = SubmitResponse),
        (status = 422, description = "Body does not match the submission shape"),
        (status = 500, description = "Storage unavailable")
    )
)]
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<FeedbackSubmission>,
) -> Result<Json<SubmitResponse>> {
    let record = state.store.create(ClassifiedFeedback::new(submission)).await?;
    info!("Feedback {} received for product {}", record.id, record.product_id);

    Ok(Json(SubmitResponse {
        message: SUBMIT_ACK.to_string(),
    }))
}

/// Lists every stored review for a product.
#[utoipa::path(
    get,
    path = "/reviews/{product_id}",
    tag = "feedback",
    params(("product_id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Stored reviews, oldest first", body = [FeedbackRecord]),
        (status = 500, description = "Storage unavailable")
    )
)]
pub async fn get_reviews(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Json<Vec<FeedbackRecord>>> {
    let records = state.store.list_by_product(&product_id).await?;
    Ok(Json(records))
}

/// Sentiment and theme counts with rule-based insights for a product.
#[utoipa::path(
    get,
    path = "/dashboard/{product_id}",
    tag = "feedback",
    params(("product_id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Aggregated dashboard", body = Dashboard),
        (status = 500, description = "Storage unavailable")
    )
)]
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Json<Dashboard>> {
    let records = state.store.list_by_product(&product_id).await?;
    Ok(Json(dashboard::summarize(&records)))
}

pub fn router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/feedback", post(submit_feedback))
        .route("/reviews/:product_id", get(get_reviews))
        .route("/dashboard/:product_id", get(get_dashboard))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt; // for `oneshot`

    use crate::classifier;
    use crate::config::CorsPolicy;
    use crate::db::tests::setup_test_db;

    async fn setup_app_with(cors: CorsPolicy) -> Router {
        let state = Arc::new(AppState {
            store: FeedbackStore::new(setup_test_db().await),
        });
        router(state, cors.layer())
    }

    async fn setup_app() -> Router {
        setup_app_with(CorsPolicy::Permissive).await
    }

    fn preflight(uri: &str, origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri(uri)
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn extract_json(body: Body) -> Value {
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn submit(app: &Router, product_id: &str, rating: i64, review: &str) {
        let body = json!({"productId": product_id, "rating": rating, "review": review});
        let response = app.clone().oneshot(post_json("/feedback", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(extract_json(response.into_body()).await, json!({"message": SUBMIT_ACK}));
    }

    #[tokio::test]
    async fn test_submit_then_list() {
        let app = setup_app().await;
        let review = "The bracelet is shiny but broke after a week";
        submit(&app, "bracelet-3", 3, review).await;

        let response = app.clone().oneshot(get_request("/reviews/bracelet-3")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = extract_json(response.into_body()).await;
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["productId"], "bracelet-3");
        assert_eq!(records[0]["rating"], 3);
        assert_eq!(records[0]["review"], review);
        assert_eq!(records[0]["sentiment"], classifier::analyze_sentiment(review).as_str());
        assert_eq!(records[0]["themes"], "durability,appearance");
        assert!(records[0]["id"].is_i64());
    }

    #[tokio::test]
    async fn test_reviews_are_per_product() {
        let app = setup_app().await;
        submit(&app, "ring-01", 5, "Elegant design").await;
        submit(&app, "chain-07", 1, "Cheap and fragile").await;
        submit(&app, "ring-01", 4, "Nice").await;

        let response = app.clone().oneshot(get_request("/reviews/ring-01")).await.unwrap();
        let body = extract_json(response.into_body()).await;
        let reviews: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["review"].as_str().unwrap())
            .collect();
        assert_eq!(reviews, vec!["Elegant design", "Nice"]);
    }

    #[tokio::test]
    async fn test_unknown_product_reads_are_empty() {
        let app = setup_app().await;

        let response = app.clone().oneshot(get_request("/reviews/nothing-here")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(extract_json(response.into_body()).await, json!([]));

        let response = app.oneshot(get_request("/dashboard/nothing-here")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            extract_json(response.into_body()).await,
            json!({
                "sentimentCount": {"Positive": 0, "Negative": 0, "Neutral": 0},
                "themeCount": {"comfort": 0, "durability": 0, "appearance": 0},
                "insights": []
            })
        );
    }

    #[tokio::test]
    async fn test_dashboard_aggregates_submissions() {
        let app = setup_app().await;
        submit(&app, "ring-01", 1, "Too heavy and the clasp broke").await;
        submit(&app, "ring-01", 2, "Tight fit, dull finish").await;
        submit(&app, "ring-01", 5, "Beautiful").await;

        let response = app.oneshot(get_request("/dashboard/ring-01")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            extract_json(response.into_body()).await,
            json!({
                "sentimentCount": {"Positive": 1, "Negative": 2, "Neutral": 0},
                "themeCount": {"comfort": 2, "durability": 1, "appearance": 2},
                "insights": [
                    dashboard::DURABILITY_WARNING,
                    dashboard::COMFORT_TOPIC,
                    dashboard::NEGATIVE_CRITICAL
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_submission_is_rejected() {
        let app = setup_app().await;

        let missing_review = json!({"productId": "ring-01", "rating": 5});
        let response = app.clone().oneshot(post_json("/feedback", &missing_review)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bad_rating = json!({"productId": "ring-01", "rating": "five", "review": "Nice"});
        let response = app.clone().oneshot(post_json("/feedback", &bad_rating)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let request = Request::builder()
            .method("POST")
            .uri("/feedback")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json!({"productId": "ring-01", "rating": 5, "review": "Nice"});
        let request = Request::builder()
            .method("POST")
            .uri("/feedback")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        for rating in [json!(5.5), json!("5.5")] {
            let body = json!({"productId": "ring-01", "rating": rating, "review": "Nice"});
            let response = app.clone().oneshot(post_json("/feedback", &body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }

        // Nothing was stored
        let response = app.oneshot(get_request("/reviews/ring-01")).await.unwrap();
        assert_eq!(extract_json(response.into_body()).await, json!([]));
    }

    #[tokio::test]
    async fn test_openapi_document_served() {
        let app = setup_app().await;

        let response = app.oneshot(get_request("/api-docs/openapi.json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doc = extract_json(response.into_body()).await;
        assert_eq!(doc["info"]["title"], "Feedback Hub API");
        assert!(doc["paths"]["/feedback"]["post"].is_object());
        assert!(doc["paths"]["/reviews/{product_id}"]["get"].is_object());
        assert!(doc["paths"]["/dashboard/{product_id}"]["get"].is_object());
    }

    #[tokio::test]
    async fn test_rating_is_coerced_to_integer() {
        let app = setup_app().await;

        for rating in [json!("5"), json!(5.0)] {
            let body = json!({"productId": "ring-01", "rating": rating, "review": "nice"});
            let response = app.clone().oneshot(post_json("/feedback", &body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.oneshot(get_request("/reviews/ring-01")).await.unwrap();
        let body = extract_json(response.into_body()).await;
        let ratings: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["rating"].as_i64().unwrap())
            .collect();
        assert_eq!(ratings, vec![5, 5]);
    }

    #[tokio::test]
    async fn test_cors_open_by_default() {
        let app = setup_app().await;

        let response = app.clone().oneshot(preflight("/feedback", "https://shop.example.com")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let request = Request::builder()
            .uri("/dashboard/ring-01")
            .header(header::ORIGIN, "https://anywhere.example.org")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_cors_restricted_to_listed_origins() {
        let app = setup_app_with(CorsPolicy::parse("https://shop.example.com").unwrap()).await;

        let response = app.clone().oneshot(preflight("/feedback", "https://shop.example.com")).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://shop.example.com"
        );

        let response = app.oneshot(preflight("/feedback", "https://evil.example.net")).await.unwrap();
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
