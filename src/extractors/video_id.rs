use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TranscriptorError;

static VIDEO_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:v=|\.be/)([A-Za-z0-9_-]{11})").expect("valid video id pattern"));

/// Canonical 11-character video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoId(String);

impl VideoId {
    /// Extract the id from a long-form (`v=`) or short-link (`.be/`) URL
    pub fn from_url(url: &str) -> Result<Self, TranscriptorError> {
        VIDEO_ID_PATTERN
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| VideoId(m.as_str().to_string()))
            .ok_or_else(|| TranscriptorError::InvalidUrl(url.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// High quality thumbnail image for the video
    pub fn thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/hqdefault.jpg", self.0)
    }

    /// Watch page URL for the video
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_form_url() {
        let id = VideoId::from_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_short_link_url() {
        let id = VideoId::from_url("https://youtu.be/dQw4w9WgXcQ?si=abc").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_id_with_dash_and_underscore() {
        let id = VideoId::from_url("https://m.youtube.com/watch?feature=share&v=a_b-C1d2E3f").unwrap();
        assert_eq!(id.as_str(), "a_b-C1d2E3f");
    }

    #[test]
    fn test_takes_first_eleven_characters() {
        let id = VideoId::from_url("https://www.youtube.com/watch?v=dQw4w9WgXcQXYZ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_rejects_urls_without_pattern() {
        for url in [
            "",
            "not a url",
            "https://vimeo.com/123456789",
            "https://www.youtube.com/watch?v=short",
            "https://youtu.be/",
        ] {
            assert_eq!(
                VideoId::from_url(url),
                Err(TranscriptorError::InvalidUrl(url.to_string())),
                "{url}"
            );
        }
    }

    #[test]
    fn test_thumbnail_url() {
        let id = VideoId::from_url("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(
            id.thumbnail_url(),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
    }
}
