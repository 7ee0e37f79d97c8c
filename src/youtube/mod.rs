//! YouTube Data API v3 integration: identifier parsing, channel/video
//! metadata lookup and the paginated upload enumerator.

mod channel;
mod client;
mod identifier;
mod uploads;
mod video;

pub use channel::fetch_channel;
pub use client::{PlaylistPage, UploadEntry, VideoDetails, YoutubeApi, YoutubeDataApi};
pub use identifier::{resolve, ChannelIdentifier};
pub use uploads::enumerate_uploads;
pub use video::{fetch_video, VideoInfo};

use std::collections::HashMap;

use serde::Serialize;

/// Channel profile as returned to the UI and persisted on creators.
#[derive(Clone, Debug, Serialize)]
pub struct ChannelProfile {
    pub channel_id: String,
    pub name: String,
    pub avatar_url: String,
    pub subscriber_count: i64,
    pub description: String,
}

/// One enumerated upload, details already merged in, duration formatted
/// for display.
#[derive(Clone, Debug, Serialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub view_count: i64,
    pub published_at: Option<String>,
}

/// Render an ISO 8601 duration ("PT1H2M3S") as a colon display string,
/// omitting the hours segment when zero.
pub fn format_duration(iso: &str) -> String {
    let rest = iso.strip_prefix("PT").unwrap_or(iso);

    let (mut hours, mut minutes, mut seconds) = (0u64, 0u64, 0u64);
    let mut current = String::new();
    for c in rest.chars() {
        if c.is_ascii_digit() {
            current.push(c);
        } else {
            let value = current.parse().unwrap_or(0);
            match c {
                'H' => hours = value,
                'M' => minutes = value,
                'S' => seconds = value,
                _ => {}
            }
            current.clear();
        }
    }

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Merge one page of playlist entries with their detail lookups, keyed by
/// video ID. Entries the detail call did not return keep zero stats.
pub(crate) fn merge_details(entries: Vec<UploadEntry>, details: Vec<VideoDetails>) -> Vec<VideoSummary> {
    let by_id: HashMap<String, VideoDetails> =
        details.into_iter().map(|d| (d.video_id.clone(), d)).collect();

    entries
        .into_iter()
        .map(|entry| {
            let detail = by_id.get(&entry.video_id);
            VideoSummary {
                duration: format_duration(
                    detail.map(|d| d.duration.as_str()).unwrap_or("PT0S"),
                ),
                view_count: detail.map(|d| d.view_count).unwrap_or(0),
                video_id: entry.video_id,
                title: entry.title,
                thumbnail_url: entry.thumbnail_url,
                published_at: entry.published_at,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero_duration() {
        assert_eq!(format_duration("PT0S"), "0:00");
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_duration("PT4M13S"), "4:13");
    }

    #[test]
    fn formats_hours_with_padded_segments() {
        assert_eq!(format_duration("PT1H2M3S"), "1:02:03");
    }

    #[test]
    fn formats_missing_segments_as_zero() {
        assert_eq!(format_duration("PT2H"), "2:00:00");
        assert_eq!(format_duration("PT45S"), "0:45");
    }

    #[test]
    fn merge_keeps_entry_order_and_defaults_missing_details() {
        let entries = vec![
            UploadEntry {
                video_id: "a".into(),
                title: "First".into(),
                thumbnail_url: String::new(),
                published_at: None,
            },
            UploadEntry {
                video_id: "b".into(),
                title: "Second".into(),
                thumbnail_url: String::new(),
                published_at: None,
            },
        ];
        let details = vec![VideoDetails {
            video_id: "b".into(),
            duration: "PT4M13S".into(),
            view_count: 7,
        }];

        let merged = merge_details(entries, details);
        assert_eq!(merged[0].title, "First");
        assert_eq!(merged[0].duration, "0:00");
        assert_eq!(merged[0].view_count, 0);
        assert_eq!(merged[1].duration, "4:13");
        assert_eq!(merged[1].view_count, 7);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Hand-written fake of the YouTube API surface for unit tests.

    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::client::{FullVideo, PlaylistPage, UploadEntry, VideoDetails, YoutubeApi};
    use super::ChannelProfile;
    use crate::errors::AppError;

    #[derive(Default)]
    pub(crate) struct FakeYoutube {
        pub channels_by_id: HashMap<String, ChannelProfile>,
        pub channels_by_handle: HashMap<String, ChannelProfile>,
        pub channels_by_username: HashMap<String, ChannelProfile>,
        /// query -> channel ID returned by the search fallback
        pub search_hits: HashMap<String, String>,
        /// Pages served in order by `playlist_page`; the continuation token
        /// is the next page's index rendered as a string.
        pub pages: Vec<Vec<UploadEntry>>,
        /// When set, pages cycle forever and the token never runs out.
        pub endless_pages: bool,
        pub details: HashMap<String, VideoDetails>,
        pub videos: HashMap<String, FullVideo>,
        /// channel ID -> newest-first entries for the sync path
        pub latest: HashMap<String, Vec<UploadEntry>>,
        /// Channel IDs whose latest-uploads fetch fails.
        pub fail_latest_for: HashSet<String>,
        /// Page index (token order) whose fetch fails.
        pub fail_page_at: Option<usize>,
        /// Video IDs whose detail lookup brings the whole call down.
        pub fail_details_for: HashSet<String>,
        pub page_calls: AtomicUsize,
    }

    impl FakeYoutube {
        pub fn page_calls(&self) -> usize {
            self.page_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl YoutubeApi for FakeYoutube {
        async fn channel_by_id(&self, id: &str) -> Result<Option<ChannelProfile>, AppError> {
            Ok(self.channels_by_id.get(id).cloned())
        }

        async fn channel_by_handle(&self, handle: &str) -> Result<Option<ChannelProfile>, AppError> {
            Ok(self.channels_by_handle.get(handle).cloned())
        }

        async fn channel_by_username(
            &self,
            username: &str,
        ) -> Result<Option<ChannelProfile>, AppError> {
            Ok(self.channels_by_username.get(username).cloned())
        }

        async fn search_channel_id(&self, query: &str) -> Result<Option<String>, AppError> {
            Ok(self.search_hits.get(query).cloned())
        }

        async fn uploads_playlist_id(&self, channel_id: &str) -> Result<String, AppError> {
            Ok(format!("UU{}", channel_id.trim_start_matches("UC")))
        }

        async fn playlist_page(
            &self,
            _playlist_id: &str,
            page_token: Option<&str>,
        ) -> Result<PlaylistPage, AppError> {
            self.page_calls.fetch_add(1, Ordering::SeqCst);
            let index: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);

            if self.fail_page_at == Some(index) {
                return Err(AppError::UpstreamFetch(anyhow::anyhow!(
                    "simulated page fetch failure at page {}",
                    index
                )));
            }

            if self.endless_pages {
                let entries = self.pages[index % self.pages.len()].clone();
                return Ok(PlaylistPage {
                    entries,
                    next_page_token: Some((index + 1).to_string()),
                });
            }

            let entries = self.pages.get(index).cloned().unwrap_or_default();
            let next_page_token = if index + 1 < self.pages.len() {
                Some((index + 1).to_string())
            } else {
                None
            };
            Ok(PlaylistPage { entries, next_page_token })
        }

        async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoDetails>, AppError> {
            if ids.iter().any(|id| self.fail_details_for.contains(id)) {
                return Err(AppError::UpstreamFetch(anyhow::anyhow!(
                    "simulated detail lookup failure"
                )));
            }
            Ok(ids.iter().filter_map(|id| self.details.get(id).cloned()).collect())
        }

        async fn video_item(&self, id: &str) -> Result<Option<FullVideo>, AppError> {
            Ok(self.videos.get(id).cloned())
        }

        async fn latest_uploads(
            &self,
            channel_id: &str,
            _max_results: u32,
        ) -> Result<Vec<UploadEntry>, AppError> {
            if self.fail_latest_for.contains(channel_id) {
                return Err(AppError::UpstreamFetch(anyhow::anyhow!(
                    "simulated outage for channel {}",
                    channel_id
                )));
            }
            Ok(self.latest.get(channel_id).cloned().unwrap_or_default())
        }
    }
}
