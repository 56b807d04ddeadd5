use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the paraphrase API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Structured captions source settings
    pub captions: CaptionsConfig,

    /// yt-dlp fallback settings
    pub fallback: FallbackConfig,

    /// Subtitle segmentation settings
    pub segmenter: SegmenterConfig,

    /// Paraphrase model settings
    pub paraphrase: ParaphraseConfig,

    /// Network settings
    pub network: NetworkConfig,
}

/// How the captions source is queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionApiMode {
    /// List tracks and pick one, falling back to any available track
    Listing,
    /// Ask for a transcript in the legacy language list only
    Direct,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionsConfig {
    pub api: CaptionApiMode,

    /// Languages tried in order when tracks can be listed
    pub preferred_languages: Vec<String>,

    /// Languages requested from a direct-only source
    pub legacy_languages: Vec<String>,

    /// User agent sent to the captions source
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Path to the yt-dlp executable
    pub yt_dlp_path: String,

    /// Subtitle languages scanned in priority order
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Character budget per subtitle block
    pub max_chars: usize,

    /// Displayed duration of each block in seconds
    pub block_duration_secs: u64,

    /// Silent gap between consecutive blocks in seconds
    pub gap_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParaphraseConfig {
    /// Base URL of an OpenAI-compatible API
    pub endpoint: String,

    /// API key (overridden by OPENAI_API_KEY)
    pub api_key: Option<String>,

    pub model: String,

    /// Target language the text is rewritten in
    pub language: String,

    pub max_tokens: u32,

    pub temperature: f32,

    /// Characters sent per model request
    pub chunk_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Timeout applied to each external request
    pub request_timeout_secs: u64,
}

impl Default for CaptionsConfig {
    fn default() -> Self {
        Self {
            api: CaptionApiMode::Listing,
            preferred_languages: vec!["pt".to_string(), "pt-BR".to_string()],
            legacy_languages: vec!["pt-BR".to_string(), "pt".to_string()],
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            languages: vec!["pt-BR".to_string(), "pt".to_string(), "en".to_string()],
        }
    }
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_chars: 360,
            block_duration_secs: 30,
            gap_secs: 10,
        }
    }
}

impl Default for ParaphraseConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com".to_string(),
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            language: "Português (Brasil)".to_string(),
            max_tokens: 1500,
            temperature: 0.7,
            chunk_size: 3000,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
        }
    }
}

impl SegmenterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_chars == 0 {
            anyhow::bail!("segmenter.max_chars must be greater than zero");
        }
        if self.block_duration_secs == 0 {
            anyhow::bail!("segmenter.block_duration_secs must be greater than zero");
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            Self::default()
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.paraphrase.api_key = Some(key);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        serde_yaml::from_str(&content)
            .context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("vidscript").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.captions.preferred_languages.is_empty() {
            anyhow::bail!("captions.preferred_languages must not be empty");
        }
        if self.captions.legacy_languages.is_empty() {
            anyhow::bail!("captions.legacy_languages must not be empty");
        }
        if self.fallback.languages.is_empty() {
            anyhow::bail!("fallback.languages must not be empty");
        }

        self.segmenter.validate()?;

        if self.paraphrase.chunk_size == 0 {
            anyhow::bail!("paraphrase.chunk_size must be greater than zero");
        }
        if self.network.request_timeout_secs == 0 {
            anyhow::bail!("network.request_timeout_secs must be greater than zero");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Caption API: {:?}", self.captions.api);
        println!("  Preferred Languages: {}", self.captions.preferred_languages.join(", "));
        println!("  Legacy Languages: {}", self.captions.legacy_languages.join(", "));
        println!("  yt-dlp: {}", self.fallback.yt_dlp_path);
        println!("  Fallback Languages: {}", self.fallback.languages.join(", "));
        println!(
            "  Segmenter: {} chars, {}s blocks, {}s gap",
            self.segmenter.max_chars, self.segmenter.block_duration_secs, self.segmenter.gap_secs
        );
        println!("  Paraphrase Endpoint: {}", self.paraphrase.endpoint);
        println!("  Paraphrase Model: {}", self.paraphrase.model);
        println!(
            "  API Key: {}",
            if self.paraphrase.api_key.is_some() { "set" } else { "not set" }
        );
        println!("  Request Timeout: {}s", self.network.request_timeout_secs);
    }
}
