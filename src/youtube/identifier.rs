use crate::errors::AppError;

/// Canonical form of a user-pasted channel reference. Which YouTube lookup
/// parameter applies depends on the variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelIdentifier {
    /// A direct channel ID ("UC…", 24 characters).
    ChannelId(String),
    /// An "@handle", stored without the leading '@'.
    Handle(String),
    /// A legacy "/c/<name>" custom name.
    CustomName(String),
    /// A legacy "/user/<name>" username.
    Username(String),
    /// Anything else; best-effort candidate for the search fallback.
    FreeText(String),
}

impl ChannelIdentifier {
    /// The raw value, without any URL scaffolding.
    pub fn value(&self) -> &str {
        match self {
            ChannelIdentifier::ChannelId(v)
            | ChannelIdentifier::Handle(v)
            | ChannelIdentifier::CustomName(v)
            | ChannelIdentifier::Username(v)
            | ChannelIdentifier::FreeText(v) => v,
        }
    }
}

/// Parse arbitrary user input into a [`ChannelIdentifier`]. Pure string
/// work, no network. Only empty input is rejected; unrecognized text is
/// passed through as a search candidate.
pub fn resolve(input: &str) -> Result<ChannelIdentifier, AppError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::InvalidIdentifier(
            "A channel URL or handle is required".to_string(),
        ));
    }

    if let Some(rest) = split_after(input, "youtube.com/channel/") {
        return Ok(ChannelIdentifier::ChannelId(first_segment(rest).to_string()));
    }
    if let Some(rest) = split_after(input, "youtube.com/c/") {
        return Ok(ChannelIdentifier::CustomName(first_segment(rest).to_string()));
    }
    if let Some(rest) = split_after(input, "youtube.com/@") {
        return Ok(ChannelIdentifier::Handle(first_segment(rest).to_string()));
    }
    if let Some(rest) = split_after(input, "youtube.com/user/") {
        return Ok(ChannelIdentifier::Username(first_segment(rest).to_string()));
    }

    if let Some(handle) = input.strip_prefix('@') {
        return Ok(ChannelIdentifier::Handle(handle.to_string()));
    }
    if input.len() == 24 && input.starts_with("UC") {
        return Ok(ChannelIdentifier::ChannelId(input.to_string()));
    }

    Ok(ChannelIdentifier::FreeText(input.to_string()))
}

fn split_after<'a>(input: &'a str, marker: &str) -> Option<&'a str> {
    input.find(marker).map(|idx| &input[idx + marker.len()..])
}

/// Cut the captured segment off at any path/query/fragment trailer.
fn first_segment(rest: &str) -> &str {
    rest.split(['/', '?', '&', '#']).next().unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_channel_url() {
        assert_eq!(
            resolve("https://www.youtube.com/channel/UCabcdefghijklmnopqrstuv").unwrap(),
            ChannelIdentifier::ChannelId("UCabcdefghijklmnopqrstuv".to_string())
        );
    }

    #[test]
    fn parses_custom_name_url() {
        assert_eq!(
            resolve("https://youtube.com/c/SomeCreator?sub_confirmation=1").unwrap(),
            ChannelIdentifier::CustomName("SomeCreator".to_string())
        );
    }

    #[test]
    fn parses_handle_url() {
        assert_eq!(
            resolve("https://www.youtube.com/@somehandle/videos").unwrap(),
            ChannelIdentifier::Handle("somehandle".to_string())
        );
    }

    #[test]
    fn parses_legacy_user_url() {
        assert_eq!(
            resolve("https://www.youtube.com/user/oldschool").unwrap(),
            ChannelIdentifier::Username("oldschool".to_string())
        );
    }

    #[test]
    fn parses_bare_handle() {
        assert_eq!(
            resolve("@somehandle").unwrap(),
            ChannelIdentifier::Handle("somehandle".to_string())
        );
    }

    #[test]
    fn parses_bare_channel_id() {
        assert_eq!(
            resolve("UCabcdefghijklmnopqrstuv").unwrap(),
            ChannelIdentifier::ChannelId("UCabcdefghijklmnopqrstuv".to_string())
        );
    }

    #[test]
    fn falls_back_to_free_text() {
        assert_eq!(
            resolve("Some Creator Name").unwrap(),
            ChannelIdentifier::FreeText("Some Creator Name".to_string())
        );
    }

    #[test]
    fn rejects_empty_input() {
        let err = resolve("   ").unwrap_err();
        assert!(matches!(err, AppError::InvalidIdentifier(_)));
    }
}
