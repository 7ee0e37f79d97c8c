use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::InnerState;

#[derive(Debug, Serialize, FromRow)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
    pub view_count: i64,
    pub creator_id: String,
    pub video_file_url: Option<String>,
    pub audio_file_url: Option<String>,
    pub file_type: String,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct MoveVideoRequest {
    pub creator_id: String,
}

pub async fn videos_by_creator(
    State(inner): State<InnerState>,
    Path(creator_id): Path<String>,
) -> Result<Json<Vec<Video>>, AppError> {
    let videos = sqlx::query_as::<_, Video>(
        r#"SELECT * FROM videos WHERE creator_id = $1 ORDER BY created_at DESC"#,
    )
    .bind(&creator_id)
    .fetch_all(&inner.db)
    .await?;

    Ok(Json(videos))
}

/// Reassign a video to another creator. A single UPDATE, so the video never
/// dangles between creators.
pub async fn move_video(
    State(inner): State<InnerState>,
    Path(video_id): Path<String>,
    Json(payload): Json<MoveVideoRequest>,
) -> Result<Json<Video>, AppError> {
    let target = sqlx::query("SELECT id FROM creators WHERE id = $1")
        .bind(&payload.creator_id)
        .fetch_optional(&inner.db)
        .await?;
    if target.is_none() {
        return Err(AppError::NotFound(format!(
            "No creator with id '{}'",
            payload.creator_id
        )));
    }

    let video = sqlx::query_as::<_, Video>(
        r#"UPDATE videos SET creator_id = $1, updated_at = now()
           WHERE id = $2
           RETURNING *"#,
    )
    .bind(&payload.creator_id)
    .bind(&video_id)
    .fetch_optional(&inner.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("No video with id '{}'", video_id)))?;

    Ok(Json(video))
}

pub async fn delete_video(
    State(inner): State<InnerState>,
    Path(video_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(&video_id)
        .execute(&inner.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("No video with id '{}'", video_id)));
    }

    Ok(Json(json!({ "deleted": video_id })))
}
