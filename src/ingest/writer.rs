use crate::errors::AppError;
use crate::store::VideoStore;
use crate::youtube::VideoSummary;

#[derive(Clone, Copy, Debug)]
pub struct WriteReport {
    pub inserted: u64,
}

/// Persist one enumerated batch for a creator as a single bulk insert.
/// A whole-batch store failure surfaces as [`AppError::Persistence`]; the
/// caller decides whether that is fatal to the enclosing flow.
#[tracing::instrument(name = "Write video batch", skip(store, videos), fields(batch = videos.len()))]
pub async fn write_batch(
    store: &dyn VideoStore,
    creator_id: &str,
    videos: &[VideoSummary],
) -> Result<WriteReport, AppError> {
    if videos.is_empty() {
        tracing::info!(creator_id, "Empty batch, nothing to write");
        return Ok(WriteReport { inserted: 0 });
    }

    let inserted = store.insert_videos(creator_id, videos).await.map_err(|e| {
        tracing::error!(creator_id, "Batch insert failed: {}", e);
        e
    })?;

    tracing::info!(creator_id, inserted, "Batch written");
    Ok(WriteReport { inserted })
}
