use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{
    select_preferred_track, CaptionApi, CaptionSource, CaptionSourceError, CaptionTrack,
    DirectTranscriptApi, TimedTextSegment, TrackListingApi, VideoId,
};
use crate::config::{CaptionApiMode, CaptionsConfig, NetworkConfig};
use crate::transcribe::parser::JsonEventDocument;

const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

static INNERTUBE_API_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("valid api key pattern")
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<RawCaptionTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptionTrack {
    base_url: String,
    language_code: String,
    name: Option<TrackName>,
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TrackName {
    fn text(&self) -> Option<String> {
        self.simple_text.clone().or_else(|| {
            let joined: String = self.runs.iter().map(|r| r.text.as_str()).collect();
            (!joined.is_empty()).then_some(joined)
        })
    }
}

/// YouTube caption source using the InnerTube player endpoint
pub struct YoutubeCaptionSource {
    client: Client,
    mode: CaptionApiMode,
}

impl YoutubeCaptionSource {
    pub fn new(captions: &CaptionsConfig, network: &NetworkConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(network.request_timeout_secs))
            .user_agent(captions.user_agent.clone())
            .build()
            .context("Failed to build caption HTTP client")?;

        Ok(Self {
            client,
            mode: captions.api,
        })
    }

    async fn get_text(&self, url: &str) -> Result<String, CaptionSourceError> {
        let response = self
            .client
            .get(url)
            .header("Accept-Language", "en-US")
            .send()
            .await
            .map_err(|e| CaptionSourceError::from_transport_message(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CaptionSourceError::Transport(format!(
                "Request to {} failed: HTTP {}",
                url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| CaptionSourceError::from_transport_message(e.to_string()))
    }

    /// Scrape the InnerTube API key from the watch page
    async fn fetch_innertube_key(&self, video_id: &VideoId) -> Result<String, CaptionSourceError> {
        let html = self.get_text(&video_id.watch_url()).await?;

        if html.contains("class=\"g-recaptcha\"") {
            return Err(CaptionSourceError::Transport(format!(
                "YouTube is blocking requests from this IP (captcha) for video {}",
                video_id
            )));
        }

        INNERTUBE_API_KEY
            .captures(&html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                CaptionSourceError::Transport(format!(
                    "Could not find InnerTube API key for video {}",
                    video_id
                ))
            })
    }

    async fn fetch_player_response(&self, video_id: &VideoId) -> Result<PlayerResponse, CaptionSourceError> {
        let api_key = self.fetch_innertube_key(video_id).await?;
        let player_url = format!("{}/youtubei/v1/player?key={}", YOUTUBE_BASE_URL, api_key);

        tracing::debug!("Requesting player response for video {}", video_id);

        let response = self
            .client
            .post(&player_url)
            .json(&serde_json::json!({
                "context": {
                    "client": {
                        "clientName": INNERTUBE_CLIENT_NAME,
                        "clientVersion": INNERTUBE_CLIENT_VERSION
                    }
                },
                "videoId": video_id.as_str()
            }))
            .send()
            .await
            .map_err(|e| CaptionSourceError::from_transport_message(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CaptionSourceError::Transport(format!(
                "Player request failed: HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CaptionSourceError::from_transport_message(e.to_string()))?;

        serde_json::from_str(&body)
            .map_err(|e| CaptionSourceError::Malformed(format!("invalid player response: {}", e)))
    }
}

/// Turn a player response into the list of caption tracks it advertises
fn parse_caption_tracks(
    video_id: &VideoId,
    player: PlayerResponse,
) -> Result<Vec<CaptionTrack>, CaptionSourceError> {
    if let Some(status) = &player.playability_status {
        if status.status != "OK" {
            return Err(CaptionSourceError::Transport(format!(
                "Video {} is unplayable ({}): {}",
                video_id,
                status.status,
                status.reason.as_deref().unwrap_or("no reason given")
            )));
        }
    }

    let raw_tracks = player
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .map(|r| r.caption_tracks)
        .unwrap_or_default();

    if raw_tracks.is_empty() {
        return Err(CaptionSourceError::TranscriptsDisabled(video_id.to_string()));
    }

    Ok(raw_tracks
        .into_iter()
        .map(|raw| CaptionTrack {
            language_name: raw
                .name
                .as_ref()
                .and_then(TrackName::text)
                .unwrap_or_else(|| raw.language_code.clone()),
            is_generated: raw.kind.as_deref() == Some("asr"),
            url: raw.base_url.replace("&fmt=srv3", ""),
            language_code: raw.language_code,
        })
        .collect())
}

/// Decode a json3 timed text document into timed segments
fn parse_timed_text(body: &str) -> Result<Vec<TimedTextSegment>, CaptionSourceError> {
    if body.trim().is_empty() {
        return Err(CaptionSourceError::Malformed(
            "no element found: empty timed text response".to_string(),
        ));
    }

    let document: JsonEventDocument = serde_json::from_str(body)
        .map_err(|e| CaptionSourceError::Malformed(format!("invalid timed text: {}", e)))?;

    Ok(document
        .events
        .iter()
        .filter_map(|event| {
            let text = event.fragments().collect::<Vec<_>>().join(" ");
            (!text.is_empty()).then(|| TimedTextSegment {
                text,
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect())
}

fn timed_text_url(track: &CaptionTrack) -> String {
    let separator = if track.url.contains('?') { '&' } else { '?' };
    format!("{}{}fmt=json3", track.url, separator)
}

#[async_trait]
impl TrackListingApi for YoutubeCaptionSource {
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>, CaptionSourceError> {
        let player = self.fetch_player_response(video_id).await?;
        let tracks = parse_caption_tracks(video_id, player)?;
        tracing::debug!("Video {} lists {} caption tracks", video_id, tracks.len());
        Ok(tracks)
    }

    async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<TimedTextSegment>, CaptionSourceError> {
        tracing::debug!(
            "Fetching {} caption track ({})",
            track.language_code,
            if track.is_generated { "generated" } else { "manual" }
        );
        let body = self.get_text(&timed_text_url(track)).await?;
        parse_timed_text(&body)
    }
}

#[async_trait]
impl DirectTranscriptApi for YoutubeCaptionSource {
    async fn get_transcript(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<Vec<TimedTextSegment>, CaptionSourceError> {
        let tracks = self.list_tracks(video_id).await?;
        let track = select_preferred_track(&tracks, languages).ok_or_else(|| {
            CaptionSourceError::NoTranscriptFound {
                video_id: video_id.to_string(),
                languages: languages.to_vec(),
            }
        })?;
        self.fetch_track(track).await
    }
}

impl CaptionSource for YoutubeCaptionSource {
    fn api(&self) -> CaptionApi<'_> {
        match self.mode {
            CaptionApiMode::Listing => CaptionApi::Listing(self),
            CaptionApiMode::Direct => CaptionApi::Direct(self),
        }
    }
}
