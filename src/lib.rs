//! vidscript - A Rust CLI tool for fetching spoken-word transcripts of online videos
//!
//! This library acquires transcripts from a structured captions source, falls back to
//! subtitle tracks reported by yt-dlp, reflows plain text into SRT blocks and paraphrases
//! text through a chat-completions model.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod output;
pub mod paraphrase;
pub mod transcribe;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extractors::{CaptionSource, MediaInfoSource, VideoId};
pub use output::segmenter::{segment_into_subtitles, SubtitleBlock};
pub use paraphrase::Paraphraser;
pub use transcribe::TranscriptAcquirer;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the transcriptor
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptorError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("Unparsable caption format: {0}")]
    UnparsableFormat(String),

    #[error("Could not transcribe video: {0}")]
    NoTranscriptAvailable(String),

    #[error("{0}")]
    TransportFailure(String),

    #[error("Empty text")]
    EmptyInput,
}

impl TranscriptorError {
    /// HTTP-style status class: 400 for caller input errors, 500 otherwise
    pub fn status_code(&self) -> u16 {
        match self {
            TranscriptorError::InvalidUrl(_) | TranscriptorError::EmptyInput => 400,
            _ => 500,
        }
    }
}
