use serde::Serialize;
use url::Url;

use crate::errors::AppError;

use super::{format_duration, ChannelProfile, YoutubeApi};

/// Single-video metadata as returned by the add-video flow.
#[derive(Clone, Debug, Serialize)]
pub struct VideoInfo {
    pub youtube_video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub view_count: i64,
    pub published_at: Option<String>,
}

/// Fetch a video's descriptive fields and its owning channel's profile in
/// one call sequence.
#[tracing::instrument(name = "Fetch single video", skip(api))]
pub async fn fetch_video(
    api: &dyn YoutubeApi,
    url: &str,
) -> Result<(VideoInfo, ChannelProfile), AppError> {
    let video_id = extract_video_id(url)?;

    let video = api
        .video_item(&video_id)
        .await?
        .ok_or_else(|| AppError::VideoNotFound(format!("No video found for ID '{}'", video_id)))?;

    // The owning channel necessarily exists; an empty lookup here means the
    // upstream is lying to us.
    let creator = api
        .channel_by_id(&video.channel_id)
        .await?
        .ok_or_else(|| {
            AppError::ChannelNotFound(format!(
                "No channel found for video's channel ID '{}'",
                video.channel_id
            ))
        })?;

    let info = VideoInfo {
        youtube_video_id: video.video_id,
        title: video.title,
        description: video.description,
        thumbnail_url: video.thumbnail_url,
        duration: format_duration(&video.duration),
        view_count: video.view_count,
        published_at: video.published_at,
    };

    Ok((info, creator))
}

/// Extract a video ID from the two accepted URL shapes: a `?v=` query
/// parameter, or the first path segment on the youtu.be short-link host.
/// Scheme-less input ("www.youtube.com/watch?v=…") gets an https retry.
fn extract_video_id(input: &str) -> Result<String, AppError> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed)
        .or_else(|_| Url::parse(&format!("https://{}", trimmed)))
        .map_err(|_| AppError::InvalidVideoUrl(format!("Not a valid URL: '{}'", input)))?;

    if let Some((_, id)) = url.query_pairs().find(|(k, _)| k == "v") {
        if !id.is_empty() {
            return Ok(id.into_owned());
        }
    }

    if url.host_str() == Some("youtu.be") {
        if let Some(id) = url.path_segments().and_then(|mut s| s.next()) {
            if !id.is_empty() {
                return Ok(id.to_string());
            }
        }
    }

    Err(AppError::InvalidVideoUrl(format!(
        "Could not extract a video ID from '{}'",
        input
    )))
}
