use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use url::Url;
use uuid::Uuid;

use crate::errors::AppError;
use crate::InnerState;

#[derive(Debug, Serialize, FromRow)]
pub struct Creator {
    pub id: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub subscriber_count: i64,
    pub description: Option<String>,
    pub youtube_channel_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCreatorRequest {
    pub name: String,
    pub avatar_url: Option<String>,
    pub subscriber_count: Option<i64>,
    pub description: Option<String>,
    pub youtube_channel_id: Option<String>,
}

pub async fn all_creators(State(inner): State<InnerState>) -> Result<Json<Vec<Creator>>, AppError> {
    let creators = sqlx::query_as::<_, Creator>(
        r#"SELECT * FROM creators ORDER BY created_at DESC"#,
    )
    .fetch_all(&inner.db)
    .await?;

    Ok(Json(creators))
}

/// Create a creator. When a channel ID is supplied, an existing creator for
/// that channel is returned instead of inserting a duplicate; the store has
/// no unique constraint on the column, so the check happens here.
#[tracing::instrument(name = "Create creator", skip(inner, payload), fields(name = %payload.name))]
pub async fn create_creator(
    State(inner): State<InnerState>,
    Json(payload): Json<CreateCreatorRequest>,
) -> Result<Json<Creator>, AppError> {
    validate_creator(&payload)?;

    if let Some(channel_id) = payload
        .youtube_channel_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
    {
        let existing = sqlx::query_as::<_, Creator>(
            r#"SELECT * FROM creators WHERE youtube_channel_id = $1 LIMIT 1"#,
        )
        .bind(channel_id)
        .fetch_optional(&inner.db)
        .await?;

        if let Some(creator) = existing {
            tracing::info!(creator_id = %creator.id, "Creator already exists for channel");
            return Ok(Json(creator));
        }
    }

    let creator = sqlx::query_as::<_, Creator>(
        r#"INSERT INTO creators (id, name, avatar_url, subscriber_count, description, youtube_channel_id)
           VALUES ($1, $2, $3, $4, $5, $6)
           RETURNING *"#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(payload.name.trim())
    .bind(&payload.avatar_url)
    .bind(payload.subscriber_count.unwrap_or(0))
    .bind(&payload.description)
    .bind(&payload.youtube_channel_id)
    .fetch_one(&inner.db)
    .await?;

    Ok(Json(creator))
}

/// Delete a creator; the schema cascades to its videos and any download
/// bookmarks referencing them.
pub async fn delete_creator(
    State(inner): State<InnerState>,
    Path(creator_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM creators WHERE id = $1")
        .bind(&creator_id)
        .execute(&inner.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("No creator with id '{}'", creator_id)));
    }

    Ok(Json(json!({ "deleted": creator_id })))
}

fn validate_creator(payload: &CreateCreatorRequest) -> Result<(), AppError> {
    let name_len = payload.name.trim().chars().count();
    if name_len == 0 || name_len > 100 {
        return Err(AppError::Validation(
            "Creator name must be between 1 and 100 characters".to_string(),
        ));
    }

    if let Some(description) = &payload.description {
        if description.chars().count() > 500 {
            return Err(AppError::Validation(
                "Description must be at most 500 characters".to_string(),
            ));
        }
    }

    if let Some(avatar_url) = payload.avatar_url.as_deref().filter(|u| !u.is_empty()) {
        Url::parse(avatar_url)?;
    }

    if payload.subscriber_count.is_some_and(|c| c < 0) {
        return Err(AppError::Validation(
            "subscriber_count must be non-negative".to_string(),
        ));
    }

    Ok(())
}
