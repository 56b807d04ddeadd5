use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::extractors::{MediaInfoSource, SubtitleFormat, TrackFormat};
use crate::TranscriptorError;

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

/// JSON event stream document (`json3`)
#[derive(Debug, Deserialize)]
pub(crate) struct JsonEventDocument {
    #[serde(default)]
    pub events: Vec<JsonEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonEvent {
    #[serde(default)]
    pub t_start_ms: u64,

    #[serde(default)]
    pub d_duration_ms: u64,

    pub segs: Option<Vec<JsonSegment>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonSegment {
    pub utf8: Option<String>,
}

impl JsonEvent {
    /// Text fragments of this event, trimmed, empty ones dropped
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.segs
            .iter()
            .flatten()
            .filter_map(|seg| seg.utf8.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Decode a raw caption payload into flat spoken text
pub fn parse_payload(payload: &str, format: SubtitleFormat) -> Result<String, TranscriptorError> {
    match format {
        SubtitleFormat::JsonEvents => parse_json_events(payload),
        SubtitleFormat::LineCaptions => Ok(parse_line_captions(payload)),
        SubtitleFormat::Unsupported => Err(TranscriptorError::UnparsableFormat(
            "unsupported subtitle format".to_string(),
        )),
    }
}

/// Join every segment fragment of a JSON event stream in document order
pub fn parse_json_events(payload: &str) -> Result<String, TranscriptorError> {
    let document: JsonEventDocument = serde_json::from_str(payload)
        .map_err(|e| TranscriptorError::UnparsableFormat(format!("invalid json3 payload: {}", e)))?;

    Ok(document
        .events
        .iter()
        .flat_map(|event| event.fragments())
        .collect::<Vec<_>>()
        .join(" "))
}

/// Keep the cue text lines of a WebVTT-like payload, markup removed
pub fn parse_line_captions(payload: &str) -> String {
    payload
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !line.starts_with("WEBVTT")
                && !line.contains("-->")
                && !line.chars().all(|c| c.is_ascii_digit())
        })
        .map(|line| MARKUP_TAG.replace_all(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extension priority among the formats the parser understands
fn format_priority(ext: &str) -> Option<u8> {
    match ext.to_lowercase().as_str() {
        "json3" => Some(0),
        "srv3" => Some(1),
        "vtt" => Some(2),
        _ => None,
    }
}

/// Parseable formats with a download URL, json3 then srv3 then vtt
pub fn candidate_formats(formats: &[TrackFormat]) -> Vec<&TrackFormat> {
    let mut candidates: Vec<(u8, &TrackFormat)> = formats
        .iter()
        .filter(|fmt| fmt.url.is_some())
        .filter_map(|fmt| format_priority(&fmt.ext).map(|priority| (priority, fmt)))
        .collect();
    candidates.sort_by_key(|(priority, _)| *priority);
    candidates.into_iter().map(|(_, fmt)| fmt).collect()
}

/// Fetch and parse the formats of one subtitle language until one succeeds.
///
/// Per-format failures are logged and the next candidate is tried. Returns `None`
/// when no candidate could be fetched and parsed.
pub async fn extract_track_list(
    source: &dyn MediaInfoSource,
    formats: &[TrackFormat],
) -> Option<String> {
    for fmt in candidate_formats(formats) {
        let Some(url) = fmt.url.as_deref() else {
            continue;
        };

        let payload = match source.fetch_payload(url).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Error fetching format {}: {}", fmt.ext, e);
                continue;
            }
        };

        match parse_payload(&payload, fmt.format()) {
            Ok(text) => {
                tracing::debug!("Parsed {} subtitle track ({} chars)", fmt.ext, text.len());
                return Some(text);
            }
            Err(e) => {
                tracing::warn!("Error processing format {}: {}", fmt.ext, e);
            }
        }
    }

    None
}
