//! HTTP surface: routes, shared state and handlers.

mod handlers;

use crate::application::AutoabrService;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AutoabrService>,
}

impl AppState {
    pub fn new(service: AutoabrService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::health))
        .route("/healthcheck", get(handlers::health))
        .route("/create-job", post(handlers::create_job))
        .route("/autoabr", post(handlers::create_job).get(handlers::list_workers))
        .route("/autoabr/cache", delete(handlers::clear_cache))
        .route("/autoabr/result/:output", get(handlers::job_result))
        .route("/autoabr/result/:output/:model", get(handlers::job_result_for_model))
        .route("/autoabr/:id", get(handlers::get_worker))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::worker::tests::GatedEngine;
    use crate::application::{ConfigCache, WorkerContext, WorkerPool};
    use crate::domain::jobs::ScoreEntry;
    use crate::ports::scores::MockScoreSource;
    use crate::ports::storage::MockContentStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tokio::sync::Notify;
    use tower::ServiceExt;

    fn app(store: MockContentStore, scores: MockScoreSource) -> Router {
        let ctx = Arc::new(WorkerContext {
            engine: Arc::new(GatedEngine {
                release: Arc::new(Notify::new()),
            }),
            scores: Arc::new(scores),
            mirror: None,
            score_root: "s3://vmaf-files/results/encoded-files".to_string(),
        });
        let service = AutoabrService::new(WorkerPool::new(ctx), ConfigCache::new(Arc::new(store)));
        create_router(AppState::new(service))
    }

    fn scores_for_any_model() -> MockScoreSource {
        let mut scores = MockScoreSource::new();
        scores.expect_scores().returning(|location| {
            if location.ends_with("/HD/") {
                Ok(vec![
                    ScoreEntry {
                        filename: "1280x720_3000".to_string(),
                        score: 90.1,
                    },
                    ScoreEntry {
                        filename: "1920x1080_6000".to_string(),
                        score: 95.2,
                    },
                ])
            } else {
                Ok(Vec::new())
            }
        });
        scores
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn text_body(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_healthcheck() {
        let app = app(MockContentStore::new(), MockScoreSource::new());

        for uri in ["/", "/healthcheck"] {
            let response = send(&app, Method::GET, uri, None).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(json_body(response).await, json!({ "status": "healthy" }));
        }
    }

    #[tokio::test]
    async fn test_create_job_then_get_worker() {
        let app = app(MockContentStore::new(), MockScoreSource::new());

        let response = send(
            &app,
            Method::POST,
            "/autoabr",
            Some(json!({ "job": { "name": "test", "output": "job1" } })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let created = json_body(response).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert!(matches!(created["status"].as_str(), Some("ACTIVE") | Some("IDLE")));
        assert_eq!(created["jobOutput"], "job1");

        let response = send(&app, Method::GET, &format!("/autoabr/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["id"], id.as_str());

        let response = send(&app, Method::GET, "/autoabr", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let workers = json_body(response).await;
        assert_eq!(workers["0"]["id"], id.as_str());
    }

    #[tokio::test]
    async fn test_create_job_alias_route() {
        let app = app(MockContentStore::new(), MockScoreSource::new());

        let response = send(
            &app,
            Method::POST,
            "/create-job",
            Some(json!({ "jobData": { "output": "job1" } })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_job_without_job_is_bad_request() {
        let app = app(MockContentStore::new(), MockScoreSource::new());

        let response = send(&app, Method::POST, "/autoabr", Some(json!({ "pipelineUrl": "s3://b/p.json" }))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Validation error: Missing job");
    }

    #[tokio::test]
    async fn test_create_job_with_unreachable_config_is_server_error() {
        let mut store = MockContentStore::new();
        store
            .expect_fetch()
            .returning(|_| Err("AccessDenied".into()));
        let app = app(store, MockScoreSource::new());

        let response = send(
            &app,
            Method::POST,
            "/autoabr",
            Some(json!({ "job": { "output": "job1" }, "encodingSettingsUrl": "s3://configs/profile.json" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("s3://configs/profile.json"));

        let workers = json_body(send(&app, Method::GET, "/autoabr", None).await).await;
        assert_eq!(workers, json!({}));
    }

    #[tokio::test]
    async fn test_unknown_worker_is_not_found() {
        let app = app(MockContentStore::new(), MockScoreSource::new());

        let response = send(&app, Method::GET, "/autoabr/does-not-exist", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_result_for_unwritten_folder_is_empty() {
        let mut scores = MockScoreSource::new();
        scores.expect_scores().returning(|_| Ok(Vec::new()));
        let app = app(MockContentStore::new(), scores);

        let response = send(&app, Method::GET, "/autoabr/result/nonexistent-folder", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body,
            json!({ "nonexistent-folder": { "HD": {}, "PhoneHD": {}, "UHD": {} } })
        );
    }

    #[tokio::test]
    async fn test_result_as_csv() {
        let app = app(MockContentStore::new(), scores_for_any_model());

        let response = send(&app, Method::GET, "/autoabr/result/job1/HD?format=csv", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            text_body(response).await,
            "jobname,model,width,height,bitrate,score\njob1,HD,1920,1080,6000,95.2\njob1,HD,1280,720,3000,90.1"
        );
    }

    #[tokio::test]
    async fn test_result_as_csv_quotes_folder_with_comma() {
        let app = app(MockContentStore::new(), scores_for_any_model());

        let response = send(&app, Method::GET, "/autoabr/result/a%2Cb/HD?format=csv", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = text_body(response).await;
        assert_eq!(text.lines().nth(1), Some("\"a,b\",HD,1920,1080,6000,95.2"));
    }

    #[tokio::test]
    async fn test_result_as_tsv_for_all_models() {
        let app = app(MockContentStore::new(), scores_for_any_model());

        let response = send(&app, Method::GET, "/autoabr/result/job1?format=tsv", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = text_body(response).await;
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("jobname\tmodel\twidth\theight\tbitrate\tscore\n"));
    }

    #[tokio::test]
    async fn test_result_json_for_one_model() {
        let app = app(MockContentStore::new(), scores_for_any_model());

        let response = send(&app, Method::GET, "/autoabr/result/job1/HD", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "job1": { "HD": { "1280x720_3000": 90.1, "1920x1080_6000": 95.2 } } })
        );
    }

    #[tokio::test]
    async fn test_result_rejects_unknown_model_and_format() {
        let app = app(MockContentStore::new(), MockScoreSource::new());

        let response = send(&app, Method::GET, "/autoabr/result/job1/4K", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, Method::GET, "/autoabr/result/job1?format=xml", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_score_failure_is_server_error() {
        let mut scores = MockScoreSource::new();
        scores
            .expect_scores()
            .returning(|_| Err("ExpiredToken".into()));
        let app = app(MockContentStore::new(), scores);

        let response = send(&app, Method::GET, "/autoabr/result/job1/UHD", None).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let workers = json_body(send(&app, Method::GET, "/autoabr", None).await).await;
        assert_eq!(workers, json!({}));
    }

    #[tokio::test]
    async fn test_result_on_unknown_worker_is_not_found() {
        let app = app(MockContentStore::new(), MockScoreSource::new());

        let response = send(&app, Method::GET, "/autoabr/result/job1?worker=nope", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let mut store = MockContentStore::new();
        store.expect_fetch().times(2).returning(|_| Ok(b"{}".to_vec()));
        let app = app(store, MockScoreSource::new());
        let body = json!({ "job": { "output": "job1" }, "pipelineUrl": "s3://configs/pipeline.json" });

        let response = send(&app, Method::POST, "/autoabr", Some(body.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = send(&app, Method::POST, "/autoabr", Some(body.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::DELETE, "/autoabr/cache", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::POST, "/autoabr", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
