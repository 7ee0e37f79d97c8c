//! Persistence seam used by the ingestion writer and the sync scheduler.
//! Kept behind a trait so the scheduler's fault isolation and dedup logic
//! run against an in-memory fake in tests.

mod postgres;

pub use postgres::PgStore;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::youtube::VideoSummary;

/// A creator eligible for incremental sync.
#[derive(Clone, Debug)]
pub struct SyncCreator {
    pub id: String,
    pub name: String,
    pub youtube_channel_id: String,
}

/// A single video row about to be inserted.
#[derive(Clone, Debug)]
pub struct NewVideo {
    pub title: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub view_count: i64,
    pub creator_id: String,
}

impl NewVideo {
    pub fn from_summary(creator_id: &str, summary: &VideoSummary) -> Self {
        Self {
            title: summary.title.clone(),
            thumbnail_url: summary.thumbnail_url.clone(),
            duration: summary.duration.clone(),
            view_count: summary.view_count,
            creator_id: creator_id.to_string(),
        }
    }
}

#[async_trait]
pub trait VideoStore: Send + Sync {
    /// All creators carrying a linked channel ID; manually curated creators
    /// (no channel ID) are never auto-synced.
    async fn creators_with_channel(&self) -> Result<Vec<SyncCreator>, AppError>;

    /// Case-insensitive (creator, title) existence check backing the sync
    /// dedup heuristic.
    async fn video_exists(&self, creator_id: &str, title: &str) -> Result<bool, AppError>;

    async fn insert_video(&self, video: NewVideo) -> Result<(), AppError>;

    /// One bulk insert of an enumerated batch; returns rows written.
    async fn insert_videos(
        &self,
        creator_id: &str,
        videos: &[VideoSummary],
    ) -> Result<u64, AppError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// In-memory [`VideoStore`] recording inserts per creator.
    #[derive(Default)]
    pub(crate) struct FakeStore {
        pub creators: Vec<SyncCreator>,
        /// creator ID -> titles already stored
        pub titles: Mutex<HashMap<String, Vec<String>>>,
        pub fail_inserts: bool,
    }

    impl FakeStore {
        pub fn with_existing(mut self, creator_id: &str, titles: &[&str]) -> Self {
            self.titles
                .get_mut()
                .unwrap()
                .insert(creator_id.to_string(), titles.iter().map(|t| t.to_string()).collect());
            self
        }

        pub fn titles_for(&self, creator_id: &str) -> Vec<String> {
            self.titles
                .lock()
                .unwrap()
                .get(creator_id)
                .cloned()
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl VideoStore for FakeStore {
        async fn creators_with_channel(&self) -> Result<Vec<SyncCreator>, AppError> {
            Ok(self.creators.clone())
        }

        async fn video_exists(&self, creator_id: &str, title: &str) -> Result<bool, AppError> {
            let lowered = title.to_lowercase();
            Ok(self
                .titles
                .lock()
                .unwrap()
                .get(creator_id)
                .map(|titles| titles.iter().any(|t| t.to_lowercase() == lowered))
                .unwrap_or(false))
        }

        async fn insert_video(&self, video: NewVideo) -> Result<(), AppError> {
            if self.fail_inserts {
                return Err(AppError::Persistence(anyhow::anyhow!("simulated insert failure")));
            }
            self.titles
                .lock()
                .unwrap()
                .entry(video.creator_id)
                .or_default()
                .push(video.title);
            Ok(())
        }

        async fn insert_videos(
            &self,
            creator_id: &str,
            videos: &[VideoSummary],
        ) -> Result<u64, AppError> {
            if self.fail_inserts {
                return Err(AppError::Persistence(anyhow::anyhow!("simulated batch failure")));
            }
            let mut titles = self.titles.lock().unwrap();
            let entry = titles.entry(creator_id.to_string()).or_default();
            for v in videos {
                entry.push(v.title.clone());
            }
            Ok(videos.len() as u64)
        }
    }
}
