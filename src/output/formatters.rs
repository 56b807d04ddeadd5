use serde::Serialize;
use std::time::Duration;

use super::segmenter::SubtitleBlock;

/// JSON envelopes kept compatible with the former HTTP endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsonResponse {
    Transcription { transcription: String },
    Result { result: String },
    Thumbnail { thumbnail_url: String },
    Error { error: String },
}

impl JsonResponse {
    /// Payload printed in plain text mode
    pub fn text(&self) -> &str {
        match self {
            JsonResponse::Transcription { transcription } => transcription,
            JsonResponse::Result { result } => result,
            JsonResponse::Thumbnail { thumbnail_url } => thumbnail_url,
            JsonResponse::Error { error } => error,
        }
    }
}

/// Format a duration as an SRT timestamp (`HH:MM:SS,mmm`)
pub fn format_timestamp(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!(
        "{:02}:{:02}:{:02},{:03}",
        hours,
        minutes,
        seconds,
        duration.subsec_millis()
    )
}

/// Render one block as an SRT record
pub fn format_block(block: &SubtitleBlock) -> String {
    format!(
        "{}\n{} --> {}\n{}\n",
        block.index,
        format_timestamp(block.start),
        format_timestamp(block.end),
        block.text
    )
}

/// Render blocks in SRT layout, records separated by a blank line
pub fn format_as_srt(blocks: &[SubtitleBlock]) -> String {
    blocks
        .iter()
        .map(format_block)
        .collect::<Vec<_>>()
        .join("\n")
}
