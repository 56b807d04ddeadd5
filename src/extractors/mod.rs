use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod video_id;
pub mod youtube;
pub mod ytdlp;

pub use video_id::VideoId;

use crate::TranscriptorError;

/// A caption track listed by the structured captions source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionTrack {
    /// Language code (pt, pt-BR, en, ...)
    pub language_code: String,

    /// Human readable language name
    pub language_name: String,

    /// Whether the track was produced by speech recognition
    pub is_generated: bool,

    /// URL the timed text is downloaded from
    pub url: String,
}

/// One timed fragment of a fetched caption track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedTextSegment {
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

/// Failures reported by a caption source
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptionSourceError {
    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("No transcript found for video {video_id} in languages {languages:?}")]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("Malformed caption response: {0}")]
    Malformed(String),

    #[error("{0}")]
    Transport(String),
}

impl CaptionSourceError {
    /// Classify a transport failure message; XML parse failures count as malformed responses
    pub fn from_transport_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("no element found") || lower.contains("xml") {
            CaptionSourceError::Malformed(message)
        } else {
            CaptionSourceError::Transport(message)
        }
    }

    /// Whether the media info fallback may be attempted after this failure
    pub fn triggers_fallback(&self) -> bool {
        matches!(
            self,
            CaptionSourceError::TranscriptsDisabled(_)
                | CaptionSourceError::NoTranscriptFound { .. }
                | CaptionSourceError::Malformed(_)
        )
    }
}

/// Capability offered by a caption source
pub enum CaptionApi<'a> {
    /// Tracks can be listed and fetched individually
    Listing(&'a dyn TrackListingApi),

    /// Only a direct transcript lookup with a language list is available
    Direct(&'a dyn DirectTranscriptApi),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackListingApi: Send + Sync {
    /// List every caption track available for the video, in source order
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>, CaptionSourceError>;

    /// Download and decode the timed text of one listed track
    async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<TimedTextSegment>, CaptionSourceError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectTranscriptApi: Send + Sync {
    /// Fetch the transcript for the first of `languages` that exists
    async fn get_transcript(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<Vec<TimedTextSegment>, CaptionSourceError>;
}

/// Structured captions source
pub trait CaptionSource: Send + Sync {
    /// Report which retrieval capability this source offers
    fn api(&self) -> CaptionApi<'_>;
}

/// Pick the first track matching `languages` in priority order, authored before generated
pub fn select_preferred_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: &[String],
) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        tracks
            .iter()
            .find(|t| &t.language_code == lang && !t.is_generated)
            .or_else(|| tracks.iter().find(|t| &t.language_code == lang))
    })
}

/// Subtitle payload encodings understood by the caption parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubtitleFormat {
    /// JSON event stream (`json3`)
    JsonEvents,
    /// Line-oriented captions with timing lines and inline tags (`srv3`, `vtt`)
    LineCaptions,
    Unsupported,
}

impl SubtitleFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "json3" => SubtitleFormat::JsonEvents,
            "srv3" | "vtt" => SubtitleFormat::LineCaptions,
            _ => SubtitleFormat::Unsupported,
        }
    }
}

/// One native-format payload of a subtitle language
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackFormat {
    #[serde(default)]
    pub ext: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

impl TrackFormat {
    pub fn format(&self) -> SubtitleFormat {
        SubtitleFormat::from_extension(&self.ext)
    }
}

/// Subtitle collections reported by the media info extractor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Video title if reported
    #[serde(default)]
    pub title: Option<String>,

    /// Authored subtitles keyed by language code
    #[serde(default)]
    pub subtitles: HashMap<String, Vec<TrackFormat>>,

    /// Auto-generated captions keyed by language code
    #[serde(default)]
    pub automatic_captions: HashMap<String, Vec<TrackFormat>>,
}

/// General purpose media info extractor
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaInfoSource: Send + Sync {
    /// Extract subtitle track information for a page URL
    async fn extract_info(&self, url: &str) -> Result<MediaInfo, TranscriptorError>;

    /// Download the raw payload of a subtitle track
    async fn fetch_payload(&self, url: &str) -> Result<String, TranscriptorError>;

    /// Get the name of this extractor
    fn name(&self) -> &'static str;
}
