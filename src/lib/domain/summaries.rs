//! Conversation summaries

use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::mock;

/// Inserted in place of a summary when no LLM credential is configured.
pub const MISSING_CREDENTIAL_SUMMARY: &str =
    "⚠️ Resumo indisponível: a chave da API de IA não está configurada.";

const SUMMARY_INSTRUCTIONS: &str = "Resuma em até três frases curtas, em português, os principais \
tópicos da conversa abaixo entre um visitante e o assistente do portfólio. Responda apenas com o \
resumo, sem saudações nem listas.";

/// Summarizer errors
#[derive(Debug, Error)]
pub enum SummarizerError {
    /// The provider answered with an error status
    #[error("the summarization provider failed ({status}): {body}")]
    Upstream {
        /// HTTP status returned by the provider
        status: u16,

        /// Response body, for diagnostics
        body: String,
    },

    /// The provider answered without any generated text
    #[error("the summarization provider returned no text")]
    EmptyResponse,

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// Text-in, text-out summarization provider
#[async_trait]
pub trait Summarizer: Clone + Send + Sync + 'static {
    /// Generates text for `prompt`.
    async fn summarize(&self, prompt: &str) -> Result<String, SummarizerError>;
}

#[cfg(test)]
mock! {
    pub Summarizer {}

    impl Clone for Summarizer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Summarizer for Summarizer {
        async fn summarize(&self, prompt: &str) -> Result<String, SummarizerError>;
    }
}

/// Builds the topic-summary prompt for a plain-text transcript.
pub fn summary_prompt(transcript: &str) -> String {
    format!("{SUMMARY_INSTRUCTIONS}\n\n{transcript}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_ends_with_transcript() {
        let prompt = summary_prompt("Ana: oi\n\nAssistente: olá");

        assert!(prompt.starts_with("Resuma"));
        assert!(prompt.ends_with("\n\nAna: oi\n\nAssistente: olá"));
    }
}
