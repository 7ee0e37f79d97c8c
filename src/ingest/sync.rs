use crate::config::IngestConfig;
use crate::errors::AppError;
use crate::store::{NewVideo, SyncCreator, VideoStore};
use crate::youtube::{merge_details, YoutubeApi};

/// Aggregate outcome of one sync run.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyncReport {
    pub new_videos_count: u64,
    pub creators_synced: usize,
    pub creators_failed: usize,
}

/// Check every creator with a linked channel for new uploads, inserting
/// only those not already recorded. Creators are processed sequentially to
/// respect the shared upstream rate limit, with a pacing sleep between
/// them.
///
/// Failure domain is one creator: the per-creator body returns a `Result`,
/// and the run folds those outcomes into the report instead of propagating
/// them. No retries within a run; the next run is the retry mechanism.
#[tracing::instrument(name = "Incremental video sync", skip(api, store, config))]
pub async fn sync_all(
    api: &dyn YoutubeApi,
    store: &dyn VideoStore,
    config: &IngestConfig,
) -> Result<SyncReport, AppError> {
    let creators = store.creators_with_channel().await?;
    tracing::info!(creators = creators.len(), "Starting sync run");

    let total = creators.len();
    let mut outcomes: Vec<Result<u64, AppError>> = Vec::with_capacity(total);

    for (index, creator) in creators.iter().enumerate() {
        let outcome = sync_creator(api, store, creator, config).await;
        match &outcome {
            Ok(count) => {
                tracing::info!(creator = %creator.name, new_videos = count, "Creator synced");
            }
            Err(e) => {
                tracing::error!(creator = %creator.name, "Creator sync failed: {}", e);
            }
        }
        outcomes.push(outcome);

        if index + 1 < total {
            tokio::time::sleep(config.creator_delay).await;
        }
    }

    let report = outcomes
        .into_iter()
        .fold(SyncReport::default(), |mut report, outcome| {
            match outcome {
                Ok(count) => {
                    report.new_videos_count += count;
                    report.creators_synced += 1;
                }
                Err(_) => report.creators_failed += 1,
            }
            report
        });

    tracing::info!(
        new_videos = report.new_videos_count,
        synced = report.creators_synced,
        failed = report.creators_failed,
        "Sync run complete"
    );
    Ok(report)
}

/// Fetch one creator's newest uploads, skip known titles, insert the rest.
async fn sync_creator(
    api: &dyn YoutubeApi,
    store: &dyn VideoStore,
    creator: &SyncCreator,
    config: &IngestConfig,
) -> Result<u64, AppError> {
    let entries = api
        .latest_uploads(&creator.youtube_channel_id, config.sync_recent_count)
        .await?;
    if entries.is_empty() {
        return Ok(0);
    }

    let ids: Vec<String> = entries.iter().map(|e| e.video_id.clone()).collect();
    let details = api.video_details(&ids).await?;
    let videos = merge_details(entries, details);

    let mut inserted = 0u64;
    for video in videos {
        if store.video_exists(&creator.id, &video.title).await? {
            continue;
        }
        match store.insert_video(NewVideo::from_summary(&creator.id, &video)).await {
            Ok(()) => {
                inserted += 1;
                tracing::info!(creator = %creator.name, title = %video.title, "Added new video");
            }
            Err(e) => {
                // One bad row does not spoil the rest of the creator's batch.
                tracing::error!(creator = %creator.name, title = %video.title, "Insert failed: {}", e);
            }
        }
    }

    Ok(inserted)
}
