use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::ingest::{sync_all, write_batch};
use crate::store::PgStore;
use crate::youtube::{enumerate_uploads, fetch_channel, fetch_video, resolve};
use crate::InnerState;

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct EnumerateRequest {
    pub creator_id: String,
    pub channel_id: String,
}

/// POST /youtube/creator — resolve a pasted channel URL/handle and return
/// the channel's profile.
pub async fn get_youtube_creator(
    State(inner): State<InnerState>,
    Json(payload): Json<UrlRequest>,
) -> Result<Json<Value>, AppError> {
    let identifier = resolve(&payload.url)?;
    tracing::debug!(?identifier, "Resolved channel identifier");

    let profile = fetch_channel(inner.youtube.as_ref(), &identifier).await?;

    Ok(Json(json!({
        "name": profile.name,
        "avatar_url": profile.avatar_url,
        "subscriber_count": profile.subscriber_count,
        "description": profile.description,
        "channel_id": profile.channel_id,
    })))
}

/// POST /youtube/video — fetch a single video's metadata together with its
/// owning channel's profile.
pub async fn get_youtube_video(
    State(inner): State<InnerState>,
    Json(payload): Json<UrlRequest>,
) -> Result<Json<Value>, AppError> {
    let (video, creator) = fetch_video(inner.youtube.as_ref(), &payload.url).await?;

    Ok(Json(json!({
        "video": video,
        "creator": creator,
    })))
}

/// POST /youtube/videos — enumerate a channel's full upload history and
/// persist the batch for an existing creator.
pub async fn get_youtube_videos(
    State(inner): State<InnerState>,
    Json(payload): Json<EnumerateRequest>,
) -> Result<Json<Value>, AppError> {
    if payload.creator_id.trim().is_empty() || payload.channel_id.trim().is_empty() {
        return Err(AppError::Validation(
            "creator_id and channel_id are required".to_string(),
        ));
    }

    let creator = sqlx::query("SELECT id FROM creators WHERE id = $1")
        .bind(&payload.creator_id)
        .fetch_optional(&inner.db)
        .await?;
    if creator.is_none() {
        return Err(AppError::Validation(format!(
            "Unknown creator_id '{}'",
            payload.creator_id
        )));
    }

    let videos =
        enumerate_uploads(inner.youtube.as_ref(), &payload.channel_id, &inner.config.ingest)
            .await?;

    let store = PgStore::new(inner.db.clone());
    let report = write_batch(&store, &payload.creator_id, &videos).await?;

    Ok(Json(json!({
        "message": format!("{} videos fetched and added", report.inserted),
        "videos_count": report.inserted,
    })))
}

/// POST /youtube/sync — incremental sync over every creator with a linked
/// channel. A single creator's failure is isolated; only run-level faults
/// (store unreachable) surface as errors.
pub async fn sync_youtube_videos(
    State(inner): State<InnerState>,
) -> Result<Json<Value>, AppError> {
    let store = PgStore::new(inner.db.clone());
    // Faults escaping the per-creator boundary are run-level, not
    // user-correctable; they keep a 500 here.
    let report = sync_all(inner.youtube.as_ref(), &store, &inner.config.ingest)
        .await
        .map_err(|e| AppError::Unexpected(anyhow::Error::new(e).context("Sync run failed")))?;

    Ok(Json(json!({
        "success": true,
        "message": format!(
            "Sync completed successfully. Added {} new videos.",
            report.new_videos_count
        ),
        "newVideosCount": report.new_videos_count,
    })))
}
