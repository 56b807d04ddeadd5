//! Paraphrasing through a chat completions model.
//!
//! Text is cut into fixed-width chunks that are sent one after another; the rewritten
//! chunks are joined with single spaces.

use async_trait::async_trait;

use crate::config::ParaphraseConfig;
use crate::TranscriptorError;

pub mod chunker;
pub mod openai;

pub use chunker::chunk_text;

/// A language model answering a single user prompt
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, TranscriptorError>;
}

pub struct Paraphraser {
    model: Box<dyn ChatModel>,
    chunk_size: usize,
}

impl Paraphraser {
    pub fn new(model: Box<dyn ChatModel>, config: &ParaphraseConfig) -> Self {
        Self {
            model,
            chunk_size: config.chunk_size,
        }
    }

    /// Rewrite `text` in `language`, chunk by chunk
    pub async fn paraphrase(&self, text: &str, language: &str) -> Result<String, TranscriptorError> {
        if text.is_empty() {
            return Err(TranscriptorError::EmptyInput);
        }

        let chunks = chunk_text(text, self.chunk_size);
        let mut result = String::new();

        for (i, chunk) in chunks.iter().enumerate() {
            tracing::info!("Paraphrasing chunk {}/{}", i + 1, chunks.len());
            let reply = self.model.complete(&build_prompt(language, chunk)).await?;
            result.push_str(reply.trim());
            result.push(' ');
        }

        Ok(result.trim().to_string())
    }
}

fn build_prompt(language: &str, chunk: &str) -> String {
    format!(
        "Rewrite the following text in {}, keeping its meaning but using different words:\n\n{}",
        language, chunk
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;

    fn paraphraser(model: MockChatModel, chunk_size: usize) -> Paraphraser {
        Paraphraser::new(
            Box::new(model),
            &ParaphraseConfig {
                chunk_size,
                ..ParaphraseConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_chunks_sent_in_order() {
        let mut model = MockChatModel::new();
        let mut seq = Sequence::new();
        model
            .expect_complete()
            .withf(|prompt| prompt.ends_with("\n\nabcd") && prompt.contains("in Português (Brasil)"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("  first part \n".to_string()));
        model
            .expect_complete()
            .withf(|prompt| prompt.ends_with("\n\nef"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("second part".to_string()));

        let result = paraphraser(model, 4)
            .paraphrase("abcdef", "Português (Brasil)")
            .await
            .unwrap();
        assert_eq!(result, "first part second part");
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let mut model = MockChatModel::new();
        model.expect_complete().never();

        assert_eq!(
            paraphraser(model, 3000).paraphrase("", "English").await,
            Err(TranscriptorError::EmptyInput)
        );
    }

    #[tokio::test]
    async fn test_failure_returns_no_partial_output() {
        let mut model = MockChatModel::new();
        let mut seq = Sequence::new();
        model
            .expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("ok".to_string()));
        model
            .expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(TranscriptorError::TransportFailure("Model API error (429)".to_string())));

        assert_eq!(
            paraphraser(model, 2).paraphrase("abcd", "English").await,
            Err(TranscriptorError::TransportFailure("Model API error (429)".to_string()))
        );
    }

    #[test]
    fn test_build_prompt() {
        assert_eq!(
            build_prompt("English", "texto"),
            "Rewrite the following text in English, keeping its meaning but using different words:\n\ntexto"
        );
    }
}
