//! AutoABR server binary.
//!
//! Wires up:
//! - S3 adapters (configuration documents, VMAF results)
//! - HTTP encoding engine
//! - Optional Redis mirror of worker state
//! - Axum HTTP layer

use autoabr::adapters::aws::{S3ContentStore, S3ScoreSource};
use autoabr::adapters::local::{HttpEncodingEngine, RoutingContentStore};
use autoabr::application::{AutoabrService, ConfigCache, WorkerContext, WorkerPool};
use autoabr::ports::repository::WorkerStateMirror;
use autoabr::{create_router, AppConfig, AppState};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    init_tracing(config.json_logs);

    // 1. Adapters
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;
    let s3_client = aws_sdk_s3::Client::new(&aws_config);

    let content_store = RoutingContentStore::new(Some(Arc::new(S3ContentStore::new(s3_client.clone()))));
    let scores = S3ScoreSource::new(s3_client);
    let engine = HttpEncodingEngine::new(config.engine_url.clone());
    let mirror = state_mirror(&config);

    // 2. Application services
    let ctx = Arc::new(WorkerContext {
        engine: Arc::new(engine),
        scores: Arc::new(scores),
        mirror,
        score_root: config.score_root(),
    });
    let service = AutoabrService::new(
        WorkerPool::new(ctx),
        ConfigCache::new(Arc::new(content_store)),
    );

    // 3. HTTP layer
    let app = create_router(AppState::new(service));

    // 4. Start server
    let listener = match tokio::net::TcpListener::bind(config.bind_addr()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind_addr(), e);
            std::process::exit(1);
        }
    };
    info!("Listening at {}", config.bind_addr());
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("autoabr=info,tower_http=info"));

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(env_filter)
            .init();
    }
}

#[cfg(feature = "redis")]
fn state_mirror(config: &AppConfig) -> Option<Arc<dyn WorkerStateMirror>> {
    let url = config.redis_url.as_deref()?;
    match autoabr::adapters::local::RedisPool::new(url) {
        Ok(pool) => {
            info!("Mirroring worker state to Redis");
            Some(Arc::new(pool))
        }
        Err(e) => {
            error!("Failed to create Redis pool, worker state will not be mirrored: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "redis"))]
fn state_mirror(_config: &AppConfig) -> Option<Arc<dyn WorkerStateMirror>> {
    None
}
