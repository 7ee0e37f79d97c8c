use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::errors::AppError;

use super::ChannelProfile;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// One entry of a playlist or search page, before details are merged in.
#[derive(Clone, Debug, Default)]
pub struct UploadEntry {
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub published_at: Option<String>,
}

/// Per-video stats from a combined `videos.list` call.
#[derive(Clone, Debug)]
pub struct VideoDetails {
    pub video_id: String,
    /// ISO 8601, e.g. "PT4M13S".
    pub duration: String,
    pub view_count: i64,
}

/// Everything a single-video lookup returns that the add-video flow needs.
#[derive(Clone, Debug)]
pub struct FullVideo {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub view_count: i64,
    pub published_at: Option<String>,
    pub channel_id: String,
}

/// One page of a channel's uploads playlist.
#[derive(Clone, Debug, Default)]
pub struct PlaylistPage {
    pub entries: Vec<UploadEntry>,
    pub next_page_token: Option<String>,
}

/// Seam over the YouTube Data API so the resolver chain, the enumerator and
/// the sync scheduler run against fakes in tests. Lookups return `Ok(None)`
/// for an empty upstream result set; `Err` is reserved for transport and
/// decode failures.
#[async_trait]
pub trait YoutubeApi: Send + Sync {
    async fn channel_by_id(&self, id: &str) -> Result<Option<ChannelProfile>, AppError>;
    async fn channel_by_handle(&self, handle: &str) -> Result<Option<ChannelProfile>, AppError>;
    async fn channel_by_username(&self, username: &str) -> Result<Option<ChannelProfile>, AppError>;
    /// Free-text channel search; returns the top result's channel ID.
    async fn search_channel_id(&self, query: &str) -> Result<Option<String>, AppError>;
    /// Resolve the channel's "all uploads" playlist reference.
    async fn uploads_playlist_id(&self, channel_id: &str) -> Result<String, AppError>;
    async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, AppError>;
    async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoDetails>, AppError>;
    async fn video_item(&self, id: &str) -> Result<Option<FullVideo>, AppError>;
    /// Newest-first single-page fetch used by the incremental sync.
    async fn latest_uploads(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<UploadEntry>, AppError>;
}

/// reqwest-backed client for the real YouTube Data API v3.
pub struct YoutubeDataApi {
    http_client: Client,
    api_key: String,
    page_size: u32,
}

impl YoutubeDataApi {
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: Client::new(),
            api_key: config.youtube_api_key.clone(),
            page_size: config.ingest.page_size,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = format!("{}/{}", API_BASE, path);
        let response = self
            .http_client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(%status, path, "YouTube API error: {}", error_text);
            return Err(AppError::UpstreamFetch(anyhow::anyhow!(
                "YouTube API returned {}: {}",
                status,
                error_text
            )));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!(path, "Failed to parse YouTube API response: {:?}", e);
            AppError::UpstreamFetch(anyhow::Error::new(e).context("Response decode failed"))
        })
    }

    async fn channel_lookup(
        &self,
        param: (&str, &str),
    ) -> Result<Option<ChannelProfile>, AppError> {
        let data: ChannelListResponse = self
            .get_json("channels", &[("part", "snippet,statistics"), param])
            .await?;

        Ok(data.items.unwrap_or_default().into_iter().next().map(|channel| {
            ChannelProfile {
                channel_id: channel.id,
                name: channel.snippet.title,
                avatar_url: best_thumbnail(channel.snippet.thumbnails.as_ref()),
                subscriber_count: channel
                    .statistics
                    .and_then(|s| s.subscriber_count)
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(0),
                description: channel.snippet.description.unwrap_or_default(),
            }
        }))
    }
}

#[async_trait]
impl YoutubeApi for YoutubeDataApi {
    async fn channel_by_id(&self, id: &str) -> Result<Option<ChannelProfile>, AppError> {
        self.channel_lookup(("id", id)).await
    }

    async fn channel_by_handle(&self, handle: &str) -> Result<Option<ChannelProfile>, AppError> {
        let handle = format!("@{}", handle.trim_start_matches('@'));
        self.channel_lookup(("forHandle", &handle)).await
    }

    async fn channel_by_username(&self, username: &str) -> Result<Option<ChannelProfile>, AppError> {
        self.channel_lookup(("forUsername", username)).await
    }

    async fn search_channel_id(&self, query: &str) -> Result<Option<String>, AppError> {
        let data: SearchListResponse = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("type", "channel"),
                    ("q", query),
                    ("maxResults", "1"),
                ],
            )
            .await?;

        Ok(data
            .items
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|item| item.snippet.channel_id))
    }

    async fn uploads_playlist_id(&self, channel_id: &str) -> Result<String, AppError> {
        let data: ChannelListResponse = self
            .get_json("channels", &[("part", "contentDetails"), ("id", channel_id)])
            .await?;

        data.items
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content_details)
            .and_then(|cd| cd.related_playlists.uploads)
            .ok_or_else(|| {
                AppError::UpstreamFetch(anyhow::anyhow!(
                    "No uploads playlist for channel {}",
                    channel_id
                ))
            })
    }

    async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, AppError> {
        let mut query = vec![
            ("part", "snippet".to_string()),
            ("playlistId", playlist_id.to_string()),
            ("maxResults", self.page_size.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        let query: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let data: PlaylistItemsResponse = self.get_json("playlistItems", &query).await?;

        let entries = data
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|item| UploadEntry {
                video_id: item.snippet.resource_id.video_id,
                title: item.snippet.title,
                thumbnail_url: best_thumbnail(item.snippet.thumbnails.as_ref()),
                published_at: item.snippet.published_at,
            })
            .collect();

        Ok(PlaylistPage {
            entries,
            next_page_token: data.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoDetails>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids_param = ids.join(",");
        let data: VideoListResponse = self
            .get_json(
                "videos",
                &[("part", "contentDetails,statistics"), ("id", &ids_param)],
            )
            .await?;

        Ok(data
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|item| VideoDetails {
                video_id: item.id,
                duration: item
                    .content_details
                    .map(|cd| cd.duration)
                    .unwrap_or_else(|| "PT0S".to_string()),
                view_count: item
                    .statistics
                    .and_then(|s| s.view_count)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0),
            })
            .collect())
    }

    async fn video_item(&self, id: &str) -> Result<Option<FullVideo>, AppError> {
        let data: VideoListResponse = self
            .get_json(
                "videos",
                &[("part", "snippet,contentDetails,statistics"), ("id", id)],
            )
            .await?;

        Ok(data.items.unwrap_or_default().into_iter().next().and_then(|item| {
            let snippet = item.snippet?;
            Some(FullVideo {
                video_id: item.id,
                title: snippet.title,
                description: snippet.description.unwrap_or_default(),
                thumbnail_url: best_thumbnail(snippet.thumbnails.as_ref()),
                duration: item
                    .content_details
                    .map(|cd| cd.duration)
                    .unwrap_or_else(|| "PT0S".to_string()),
                view_count: item
                    .statistics
                    .and_then(|s| s.view_count)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0),
                published_at: snippet.published_at,
                channel_id: snippet.channel_id.unwrap_or_default(),
            })
        }))
    }

    async fn latest_uploads(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<UploadEntry>, AppError> {
        let max_results = max_results.to_string();
        let data: SearchListResponse = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("channelId", channel_id),
                    ("order", "date"),
                    ("type", "video"),
                    ("maxResults", &max_results),
                ],
            )
            .await?;

        Ok(data
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.and_then(|id| id.video_id)?;
                Some(UploadEntry {
                    video_id,
                    title: item.snippet.title.unwrap_or_default(),
                    thumbnail_url: best_thumbnail(item.snippet.thumbnails.as_ref()),
                    published_at: item.snippet.published_at,
                })
            })
            .collect())
    }
}

/// Best-available avatar/thumbnail, falling through resolution tiers.
fn best_thumbnail(thumbnails: Option<&Thumbnails>) -> String {
    let Some(t) = thumbnails else {
        return String::new();
    };
    t.maxres
        .as_ref()
        .or(t.standard.as_ref())
        .or(t.high.as_ref())
        .or(t.medium.as_ref())
        .or(t.default.as_ref())
        .map(|t| t.url.clone())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelListResponse {
    items: Option<Vec<ChannelResource>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelResource {
    id: String,
    #[serde(default)]
    snippet: ChannelSnippet,
    statistics: Option<ChannelStatistics>,
    content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelSnippet {
    #[serde(default)]
    title: String,
    description: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    subscriber_count: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelatedPlaylists {
    uploads: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
    pub standard: Option<Thumbnail>,
    pub maxres: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchListResponse {
    items: Option<Vec<SearchResource>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResource {
    id: Option<SearchResourceId>,
    #[serde(default)]
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResourceId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    title: Option<String>,
    channel_id: Option<String>,
    published_at: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemsResponse {
    items: Option<Vec<PlaylistItemResource>>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemResource {
    snippet: PlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    #[serde(default)]
    title: String,
    published_at: Option<String>,
    thumbnails: Option<Thumbnails>,
    resource_id: PlaylistResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistResourceId {
    video_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoListResponse {
    items: Option<Vec<VideoResource>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    id: String,
    snippet: Option<VideoSnippet>,
    content_details: Option<VideoContentDetails>,
    statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    #[serde(default)]
    title: String,
    description: Option<String>,
    thumbnails: Option<Thumbnails>,
    published_at: Option<String>,
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoContentDetails {
    duration: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
}
