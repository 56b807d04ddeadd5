use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::{MediaInfo, MediaInfoSource};
use crate::config::{FallbackConfig, NetworkConfig};
use crate::TranscriptorError;

/// Media info extractor backed by yt-dlp
pub struct YtDlpMediaInfo {
    yt_dlp_path: String,
    client: Client,
    timeout: Duration,
}

impl YtDlpMediaInfo {
    pub fn new(fallback: &FallbackConfig, network: &NetworkConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(network.request_timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build subtitle HTTP client")?;

        Ok(Self {
            yt_dlp_path: fallback.yt_dlp_path.clone(),
            client,
            timeout,
        })
    }

    /// Run yt-dlp in metadata-only mode and return its JSON dump
    async fn dump_json(&self, url: &str) -> Result<String, TranscriptorError> {
        tracing::debug!("Extracting subtitle info for: {}", url);

        let output = Command::new(&self.yt_dlp_path)
            .args([
                "--dump-json",
                "--skip-download",
                "--no-playlist",
                "--no-warnings",
                url,
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, output)
            .await
            .map_err(|_| {
                TranscriptorError::TransportFailure(format!(
                    "yt-dlp timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| TranscriptorError::TransportFailure(format!("Failed to run yt-dlp: {}", e)))?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(TranscriptorError::TransportFailure(format!(
                "yt-dlp failed: {}",
                error.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| TranscriptorError::TransportFailure(format!("yt-dlp output is not UTF-8: {}", e)))
    }
}

/// Decode the subtitle collections from a yt-dlp JSON dump
fn parse_media_info(json: &str) -> Result<MediaInfo, TranscriptorError> {
    serde_json::from_str(json).map_err(|e| {
        TranscriptorError::TransportFailure(format!("Failed to parse yt-dlp output: {}", e))
    })
}

#[async_trait]
impl MediaInfoSource for YtDlpMediaInfo {
    async fn extract_info(&self, url: &str) -> Result<MediaInfo, TranscriptorError> {
        let json = self.dump_json(url).await?;
        let info = parse_media_info(&json)?;

        tracing::debug!(
            "yt-dlp reports {} subtitle and {} automatic caption languages",
            info.subtitles.len(),
            info.automatic_captions.len()
        );

        Ok(info)
    }

    async fn fetch_payload(&self, url: &str) -> Result<String, TranscriptorError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TranscriptorError::TransportFailure(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranscriptorError::TransportFailure(format!(
                "Failed to download subtitles: HTTP {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| TranscriptorError::TransportFailure(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}
