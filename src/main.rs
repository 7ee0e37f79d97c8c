mod config;
mod db;
mod errors;
mod ingest;
mod routes;
mod store;
mod youtube;

use std::error::Error;
use std::sync::Arc;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use axum_prometheus::PrometheusMetricLayer;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Config;
use crate::db::init_db;
use crate::routes::{
    all_creators, create_creator, delete_creator, delete_video, get_youtube_creator,
    get_youtube_video, get_youtube_videos, health_check, move_video, sync_youtube_videos,
    videos_by_creator,
};
use crate::youtube::{YoutubeApi, YoutubeDataApi};

#[derive(Clone)]
pub struct InnerState {
    pub db: PgPool,
    pub youtube: Arc<dyn YoutubeApi>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_petittube=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let db = init_db(&config.database_url).await?;
    let youtube: Arc<dyn YoutubeApi> = Arc::new(YoutubeDataApi::new(&config));

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let listen_addr = config.listen_addr.clone();
    let app_state = InnerState {
        db,
        youtube,
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/youtube/creator", post(get_youtube_creator))
        .route("/youtube/video", post(get_youtube_video))
        .route("/youtube/videos", post(get_youtube_videos))
        .route("/youtube/sync", post(sync_youtube_videos))

        .route("/creators", get(all_creators).post(create_creator))
        .route("/creators/:id", delete(delete_creator))
        .route("/creators/:id/videos", get(videos_by_creator))
        .route("/videos/:id", delete(delete_video))
        .route("/videos/:id/move", patch(move_video))

        .route("/metrics", get(|| async move { metric_handle.render() }))
        .route("/health", get(health_check))

        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(prometheus_layer)
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
