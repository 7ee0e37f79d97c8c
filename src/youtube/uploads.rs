use crate::config::IngestConfig;
use crate::errors::AppError;

use super::{merge_details, VideoSummary, YoutubeApi};

/// Why a page walk ended. Every termination path is named so each one can
/// be exercised on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StopReason {
    PageEmpty,
    NoContinuationToken,
    CeilingReached,
}

/// Walk the full history of a channel's uploads playlist, merging duration
/// and view count into every entry. Strictly sequential: page N+1 is never
/// requested before page N's detail lookup completes, and a pacing sleep
/// separates pages (skipped after the final one).
///
/// Any page or detail fetch failure aborts the whole enumeration and
/// discards partial progress; the caller never sees a partial page set.
#[tracing::instrument(name = "Enumerate channel uploads", skip(api, config))]
pub async fn enumerate_uploads(
    api: &dyn YoutubeApi,
    channel_id: &str,
    config: &IngestConfig,
) -> Result<Vec<VideoSummary>, AppError> {
    let playlist_id = api.uploads_playlist_id(channel_id).await?;
    tracing::info!(%playlist_id, "Resolved uploads playlist");

    let mut collected: Vec<VideoSummary> = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages_fetched = 0usize;

    let stop = loop {
        let page = api.playlist_page(&playlist_id, page_token.as_deref()).await?;
        pages_fetched += 1;

        if page.entries.is_empty() {
            break StopReason::PageEmpty;
        }

        let ids: Vec<String> = page.entries.iter().map(|e| e.video_id.clone()).collect();
        let details = api.video_details(&ids).await?;
        collected.extend(merge_details(page.entries, details));

        tracing::info!(
            page = pages_fetched,
            total = collected.len(),
            "Fetched uploads page"
        );

        if collected.len() >= config.enumeration_ceiling {
            collected.truncate(config.enumeration_ceiling);
            break StopReason::CeilingReached;
        }

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break StopReason::NoContinuationToken,
        }

        tokio::time::sleep(config.page_delay).await;
    };

    tracing::info!(
        videos = collected.len(),
        pages = pages_fetched,
        stop = ?stop,
        "Enumeration finished"
    );
    Ok(collected)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::errors::AppError;
    use crate::youtube::client::{UploadEntry, VideoDetails};
    use crate::youtube::testing::FakeYoutube;

    fn quick_config() -> IngestConfig {
        IngestConfig {
            page_delay: Duration::ZERO,
            creator_delay: Duration::ZERO,
            ..IngestConfig::default()
        }
    }

    fn entry(id: &str) -> UploadEntry {
        UploadEntry {
            video_id: id.to_string(),
            title: format!("Video {}", id),
            thumbnail_url: String::new(),
            published_at: None,
        }
    }

    fn fake_with_pages(pages: Vec<Vec<UploadEntry>>) -> FakeYoutube {
        let mut fake = FakeYoutube::default();
        for page in &pages {
            for e in page {
                fake.details.insert(
                    e.video_id.clone(),
                    VideoDetails {
                        video_id: e.video_id.clone(),
                        duration: "PT4M13S".to_string(),
                        view_count: 100,
                    },
                );
            }
        }
        fake.pages = pages;
        fake
    }

    #[tokio::test]
    async fn concatenates_pages_in_order_and_stops_on_token_exhaustion() {
        let fake = fake_with_pages(vec![
            vec![entry("a1"), entry("a2")],
            vec![entry("b1"), entry("b2")],
            vec![entry("c1")],
        ]);

        let videos = enumerate_uploads(&fake, "UCsomechannel", &quick_config())
            .await
            .unwrap();

        let ids: Vec<&str> = videos.iter().map(|v| v.video_id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b1", "b2", "c1"]);
        assert_eq!(fake.page_calls(), 3);
        assert!(videos.iter().all(|v| v.duration == "4:13" && v.view_count == 100));
    }

    #[tokio::test]
    async fn stops_on_empty_page() {
        let fake = fake_with_pages(vec![vec![entry("a1")], vec![]]);

        let videos = enumerate_uploads(&fake, "UCsomechannel", &quick_config())
            .await
            .unwrap();

        assert_eq!(videos.len(), 1);
        assert_eq!(fake.page_calls(), 2);
    }

    #[tokio::test]
    async fn page_failure_mid_enumeration_discards_partial_progress() {
        let mut fake = fake_with_pages(vec![
            vec![entry("a1"), entry("a2")],
            vec![entry("b1")],
        ]);
        fake.fail_page_at = Some(1);

        let err = enumerate_uploads(&fake, "UCsomechannel", &quick_config())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamFetch(_)));
        // The first page had already been fetched; nothing of it survives.
        assert_eq!(fake.page_calls(), 2);
    }

    #[tokio::test]
    async fn detail_failure_mid_enumeration_aborts_the_walk() {
        let mut fake = fake_with_pages(vec![
            vec![entry("a1"), entry("a2")],
            vec![entry("b1")],
        ]);
        fake.fail_details_for.insert("b1".to_string());

        let err = enumerate_uploads(&fake, "UCsomechannel", &quick_config())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamFetch(_)));
        assert_eq!(fake.page_calls(), 2);
    }

    #[tokio::test]
    async fn ceiling_bounds_a_never_ending_upstream() {
        let mut fake = fake_with_pages(vec![
            vec![entry("a1"), entry("a2"), entry("a3"), entry("a4"), entry("a5")],
            vec![entry("b1"), entry("b2"), entry("b3"), entry("b4"), entry("b5")],
        ]);
        fake.endless_pages = true;

        let config = IngestConfig {
            enumeration_ceiling: 12,
            ..quick_config()
        };

        let videos = enumerate_uploads(&fake, "UCsomechannel", &config).await.unwrap();
        assert_eq!(videos.len(), 12);
    }
}
