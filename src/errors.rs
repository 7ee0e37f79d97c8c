use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid channel identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid video URL: {0}")]
    InvalidVideoUrl(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(#[source] anyhow::Error),

    #[error("Persistence error: {0}")]
    Persistence(#[source] anyhow::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable discriminant shared by every endpoint's
    /// error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "configuration",
            AppError::InvalidIdentifier(_) => "invalid_identifier",
            AppError::InvalidVideoUrl(_) => "invalid_video_url",
            AppError::ChannelNotFound(_) => "channel_not_found",
            AppError::VideoNotFound(_) => "video_not_found",
            AppError::UpstreamFetch(_) => "upstream_fetch",
            AppError::Persistence(_) => "persistence",
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::Unexpected(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            // The first fatal error of a single request's flow, store
            // writes included, surfaces to the caller as a 400. Run-level
            // faults are wrapped into `Unexpected` at their boundary and
            // keep the 5xx.
            AppError::InvalidIdentifier(_)
            | AppError::InvalidVideoUrl(_)
            | AppError::ChannelNotFound(_)
            | AppError::VideoNotFound(_)
            | AppError::UpstreamFetch(_)
            | AppError::Persistence(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_) | AppError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        tracing::error!(
            error_kind = self.kind(),
            error_message = %message,
            status_code = %status,
            "Request error"
        );

        let body = Json(json!({
            "error": message,
            "kind": self.kind(),
            "status": status.as_u16()
        }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Database record not found".to_string()),
            _ => AppError::Persistence(anyhow::Error::new(err).context("SQLx operation failed")),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let mut context_parts = Vec::new();

        if let Some(url) = err.url() {
            context_parts.push(format!("URL: {}", url));
        }
        if let Some(status) = err.status() {
            context_parts.push(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            ));
        }

        let error_type = match &err {
            e if e.is_timeout() => "Request Timeout",
            e if e.is_connect() => "Connection Failed",
            e if e.is_decode() => "Response Decode Failed",
            e if e.is_request() => "Invalid Request",
            _ => "Unknown HTTP Error",
        };
        context_parts.push(format!("Type: {}", error_type));

        let context = format!("YouTube API request failed - {}", context_parts.join(", "));

        tracing::error!(
            error = %err,
            url = ?err.url(),
            status = ?err.status(),
            is_timeout = err.is_timeout(),
            is_connect = err.is_connect(),
            "HTTP request to YouTube failed"
        );

        AppError::UpstreamFetch(anyhow::Error::new(err).context(context))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Validation(format!("Invalid URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn request_flow_failures_are_bad_request() {
        assert_eq!(
            status_of(AppError::Persistence(anyhow::anyhow!("insert failed"))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::UpstreamFetch(anyhow::anyhow!("timeout"))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::ChannelNotFound("nope".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn run_level_failures_are_internal() {
        assert_eq!(
            status_of(AppError::Unexpected(anyhow::anyhow!("sync run failed"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Configuration("missing key".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
