use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ChatModel;
use crate::config::{NetworkConfig, ParaphraseConfig};
use crate::TranscriptorError;

/// Chat completions request
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    pub choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIMessage,
}

/// Client for an OpenAI-compatible chat completions endpoint
pub struct OpenAI {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAI {
    pub fn new(config: &ParaphraseConfig, network: &NetworkConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .context("No API key configured (set OPENAI_API_KEY or paraphrase.api_key)")?;

        let client = Client::builder()
            .timeout(Duration::from_secs(network.request_timeout_secs))
            .build()
            .context("Failed to build model HTTP client")?;

        Ok(Self {
            client,
            api_key,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Use a different model than the configured one
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_request(&self, prompt: &str) -> OpenAIRequest {
        OpenAIRequest {
            model: self.model.clone(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAI {
    async fn complete(&self, prompt: &str) -> Result<String, TranscriptorError> {
        let api_url = format!("{}/v1/chat/completions", self.endpoint.trim_end_matches('/'));

        let response = self
            .client
            .post(&api_url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| {
                TranscriptorError::TransportFailure(format!("Failed to send request to model API: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            tracing::error!("Model API error ({}): {}", status, error_text);
            return Err(TranscriptorError::TransportFailure(format!(
                "Model API error ({}): {}",
                status, error_text
            )));
        }

        let body: OpenAIResponse = response.json().await.map_err(|e| {
            TranscriptorError::TransportFailure(format!("Failed to parse model API response: {}", e))
        })?;

        extract_text(&body)
    }
}

fn extract_text(response: &OpenAIResponse) -> Result<String, TranscriptorError> {
    response
        .choices
        .first()
        .map(|choice| choice.message.content.clone())
        .ok_or_else(|| TranscriptorError::TransportFailure("Model API returned no choices".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> ParaphraseConfig {
        ParaphraseConfig {
            api_key: Some("sk-test".to_string()),
            ..ParaphraseConfig::default()
        }
    }

    #[test]
    fn test_requires_api_key() {
        assert!(OpenAI::new(&ParaphraseConfig::default(), &NetworkConfig::default()).is_err());
    }

    #[test]
    fn test_request_shape() {
        let client = OpenAI::new(&config_with_key(), &NetworkConfig::default())
            .unwrap()
            .with_model("gpt-4o-mini");
        let request = serde_json::to_value(client.build_request("Rewrite this")).unwrap();

        assert_eq!(request["model"], "gpt-4o-mini");
        assert_eq!(request["messages"][0]["role"], "user");
        assert_eq!(request["messages"][0]["content"], "Rewrite this");
        assert_eq!(request["max_tokens"], 1500);
        assert!((request["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_extract_text() {
        let response: OpenAIResponse = serde_json::from_str(
            r#"{"id": "chatcmpl-1", "choices": [{"index": 0, "message": {"role": "assistant", "content": " Texto novo. "}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(&response).unwrap(), " Texto novo. ");

        let empty: OpenAIResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(extract_text(&empty).is_err());
    }
}
