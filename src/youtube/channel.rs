use crate::errors::AppError;

use super::{ChannelIdentifier, ChannelProfile, YoutubeApi};

/// One link of the resolution chain. Strategies share a single lookup
/// signature and are tried in order; the first hit wins.
#[derive(Clone, Debug)]
enum LookupStrategy {
    ById(String),
    ByHandle(String),
    ByUsername(String),
    Search(String),
}

impl LookupStrategy {
    fn name(&self) -> &'static str {
        match self {
            LookupStrategy::ById(_) => "by-id",
            LookupStrategy::ByHandle(_) => "by-handle",
            LookupStrategy::ByUsername(_) => "by-username",
            LookupStrategy::Search(_) => "search",
        }
    }
}

/// Fetch a channel profile for a resolved identifier, falling through
/// lookup strategies until one succeeds. Individual strategy failures are
/// recorded, not propagated; only exhaustion of the whole chain raises
/// [`AppError::ChannelNotFound`], carrying the per-strategy diagnostics.
#[tracing::instrument(name = "Fetch channel profile", skip(api))]
pub async fn fetch_channel(
    api: &dyn YoutubeApi,
    identifier: &ChannelIdentifier,
) -> Result<ChannelProfile, AppError> {
    let mut failures: Vec<String> = Vec::new();

    for strategy in strategies_for(identifier) {
        match run_strategy(api, &strategy).await {
            Ok(Some(profile)) => {
                tracing::info!(
                    strategy = strategy.name(),
                    channel_id = %profile.channel_id,
                    "Resolved channel"
                );
                return Ok(profile);
            }
            Ok(None) => failures.push(format!("{}: no result", strategy.name())),
            Err(e) => {
                tracing::warn!(strategy = strategy.name(), "Channel lookup failed: {}", e);
                failures.push(format!("{}: {}", strategy.name(), e));
            }
        }
    }

    Err(AppError::ChannelNotFound(format!(
        "No YouTube channel found for '{}' ({})",
        identifier.value(),
        failures.join("; ")
    )))
}

fn strategies_for(identifier: &ChannelIdentifier) -> Vec<LookupStrategy> {
    let value = identifier.value().to_string();
    let mut strategies = match identifier {
        ChannelIdentifier::ChannelId(id) => vec![LookupStrategy::ById(id.clone())],
        ChannelIdentifier::Handle(handle) => vec![LookupStrategy::ByHandle(handle.clone())],
        ChannelIdentifier::CustomName(name) | ChannelIdentifier::Username(name) => {
            vec![LookupStrategy::ByUsername(name.clone())]
        }
        // A bare name could be anything; try every direct lookup before
        // falling back to search.
        ChannelIdentifier::FreeText(text) => vec![
            LookupStrategy::ById(text.clone()),
            LookupStrategy::ByHandle(text.clone()),
            LookupStrategy::ByUsername(text.clone()),
        ],
    };
    strategies.push(LookupStrategy::Search(value));
    strategies
}

async fn run_strategy(
    api: &dyn YoutubeApi,
    strategy: &LookupStrategy,
) -> Result<Option<ChannelProfile>, AppError> {
    match strategy {
        LookupStrategy::ById(id) => api.channel_by_id(id).await,
        LookupStrategy::ByHandle(handle) => api.channel_by_handle(handle).await,
        LookupStrategy::ByUsername(username) => api.channel_by_username(username).await,
        LookupStrategy::Search(query) => {
            // Search results lack statistics; re-query the found channel by
            // ID to get subscriber count and the full-size avatar.
            match api.search_channel_id(query).await? {
                Some(channel_id) => api.channel_by_id(&channel_id).await,
                None => Ok(None),
            }
        }
    }
}
