use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use crate::errors::AppError;
use crate::youtube::VideoSummary;

use super::{NewVideo, SyncCreator, VideoStore};

/// sqlx-backed [`VideoStore`] over the `creators` and `videos` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for PgStore {
    async fn creators_with_channel(&self) -> Result<Vec<SyncCreator>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, name, youtube_channel_id
               FROM creators
               WHERE youtube_channel_id IS NOT NULL"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SyncCreator {
                id: row.get("id"),
                name: row.get("name"),
                youtube_channel_id: row.get("youtube_channel_id"),
            })
            .collect())
    }

    async fn video_exists(&self, creator_id: &str, title: &str) -> Result<bool, AppError> {
        let existing = sqlx::query(
            r#"SELECT 1 AS one FROM videos
               WHERE creator_id = $1 AND LOWER(title) = LOWER($2)
               LIMIT 1"#,
        )
        .bind(creator_id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(existing.is_some())
    }

    async fn insert_video(&self, video: NewVideo) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO videos (id, title, thumbnail_url, duration, view_count, creator_id)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&video.title)
        .bind(&video.thumbnail_url)
        .bind(&video.duration)
        .bind(video.view_count)
        .bind(&video.creator_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_videos(
        &self,
        creator_id: &str,
        videos: &[VideoSummary],
    ) -> Result<u64, AppError> {
        if videos.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "INSERT INTO videos (id, title, thumbnail_url, duration, view_count, creator_id) ",
        );
        builder.push_values(videos, |mut b, video| {
            b.push_bind(Uuid::new_v4().to_string())
                .push_bind(&video.title)
                .push_bind(&video.thumbnail_url)
                .push_bind(&video.duration)
                .push_bind(video.view_count)
                .push_bind(creator_id);
        });

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
