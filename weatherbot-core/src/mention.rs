//! Locating the city name in an `app_mention` message.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MentionError {
    #[error("mention marker '{marker}' not found in message text")]
    MarkerNotFound { marker: String },

    #[error("no location given after mention marker")]
    EmptyLocation,
}

/// Returns the text between the first occurrence of `marker` and the next one
/// (or the end of the message), with surrounding whitespace removed.
///
/// `"<@U1>  new york "` with marker `"<@U1>"` yields `"new york"`.
pub fn extract_location<'a>(text: &'a str, marker: &str) -> Result<&'a str, MentionError> {
    if marker.is_empty() {
        return Err(MentionError::MarkerNotFound { marker: marker.to_string() });
    }

    let rest = text
        .split(marker)
        .nth(1)
        .ok_or_else(|| MentionError::MarkerNotFound { marker: marker.to_string() })?;

    let location = rest.trim();
    if location.is_empty() {
        return Err(MentionError::EmptyLocation);
    }

    Ok(location)
}
