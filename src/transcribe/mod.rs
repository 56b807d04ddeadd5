use crate::config::{CaptionsConfig, FallbackConfig};
use crate::extractors::{
    select_preferred_track, CaptionApi, CaptionSource, CaptionSourceError, MediaInfoSource,
    TimedTextSegment, VideoId,
};
use crate::TranscriptorError;

pub mod parser;

/// Fetches a flat transcript for a video URL.
///
/// The structured captions source is tried first. Only the failures in the fallback
/// trigger set (disabled, not found, malformed) lead to one attempt through the media
/// info extractor; every other failure is returned as is.
pub struct TranscriptAcquirer {
    captions: Box<dyn CaptionSource>,
    media_info: Box<dyn MediaInfoSource>,
    preferred_languages: Vec<String>,
    legacy_languages: Vec<String>,
    fallback_languages: Vec<String>,
}

impl TranscriptAcquirer {
    pub fn new(
        captions: Box<dyn CaptionSource>,
        media_info: Box<dyn MediaInfoSource>,
        captions_config: &CaptionsConfig,
        fallback_config: &FallbackConfig,
    ) -> Self {
        Self {
            captions,
            media_info,
            preferred_languages: captions_config.preferred_languages.clone(),
            legacy_languages: captions_config.legacy_languages.clone(),
            fallback_languages: fallback_config.languages.clone(),
        }
    }

    /// Acquire the transcript of the video behind `url`
    pub async fn acquire_transcript(&self, url: &str) -> Result<String, TranscriptorError> {
        let video_id = VideoId::from_url(url)?;
        tracing::info!("Fetching transcript for video {}", video_id);

        match self.try_primary(&video_id).await {
            Ok(text) => Ok(text),
            Err(e) if e.triggers_fallback() => {
                tracing::warn!("API Error: {}. Trying {} fallback.", e, self.media_info.name());
                self.try_fallback(url).await
            }
            Err(e) => Err(TranscriptorError::TransportFailure(e.to_string())),
        }
    }

    async fn try_primary(&self, video_id: &VideoId) -> Result<String, CaptionSourceError> {
        let segments = match self.captions.api() {
            CaptionApi::Listing(api) => {
                let tracks = api.list_tracks(video_id).await?;
                let track = match select_preferred_track(&tracks, &self.preferred_languages) {
                    Some(track) => track,
                    None => {
                        let track = tracks.first().ok_or_else(|| {
                            CaptionSourceError::TranscriptsDisabled(video_id.to_string())
                        })?;
                        tracing::info!(
                            "No {} transcript, using {} instead",
                            self.preferred_languages.join("/"),
                            track.language_code
                        );
                        track
                    }
                };
                api.fetch_track(track).await?
            }
            CaptionApi::Direct(api) => api.get_transcript(video_id, &self.legacy_languages).await?,
        };

        Ok(flatten_segments(&segments))
    }

    async fn try_fallback(&self, url: &str) -> Result<String, TranscriptorError> {
        let info = self.media_info.extract_info(url).await?;

        // First language present wins; authored subtitles shadow auto captions for it
        let matched = self.fallback_languages.iter().find_map(|lang| {
            info.subtitles
                .get(lang)
                .map(|formats| (lang, "subtitles", formats))
                .or_else(|| {
                    info.automatic_captions
                        .get(lang)
                        .map(|formats| (lang, "automatic captions", formats))
                })
        });

        let Some((lang, collection, formats)) = matched else {
            return Err(TranscriptorError::NoTranscriptAvailable(format!(
                "No subtitles found via {}",
                self.media_info.name()
            )));
        };

        tracing::info!("Using {} {} from {}", lang, collection, self.media_info.name());

        match parser::extract_track_list(self.media_info.as_ref(), formats).await {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(TranscriptorError::NoTranscriptAvailable(format!(
                "No subtitles found via {}",
                self.media_info.name()
            ))),
        }
    }
}

fn flatten_segments(segments: &[TimedTextSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
