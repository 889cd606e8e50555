//! Field extraction: send one document's text to the model, get one record.
//!
//! The pipeline only ever talks to [`FieldExtractor`], so tests and
//! alternative backends can stand in for the model without touching stage
//! logic. [`LlmFieldExtractor`] is the production implementation over an
//! `edgequake_llm` provider.
//!
//! There is deliberately no retry here: a failed or unparsable reply drops
//! the document and the batch moves on.

use super::reply::parse_reply;
use crate::error::ItemError;
use crate::prompts::extraction_prompt;
use crate::record::Record;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Turns the text of one report into a flat record of raw field keys.
pub trait FieldExtractor: Send + Sync {
    /// Extract the report fields of `text`, a document of `category`.
    fn extract_fields<'a>(
        &'a self,
        text: &'a str,
        category: &'a str,
    ) -> BoxFuture<'a, Result<Record, ItemError>>;
}

/// [`FieldExtractor`] backed by a chat-completion model.
pub struct LlmFieldExtractor {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    max_tokens: usize,
}

impl LlmFieldExtractor {
    pub fn new(provider: Arc<dyn LLMProvider>, temperature: f32, max_tokens: usize) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }
}

impl FieldExtractor for LlmFieldExtractor {
    fn extract_fields<'a>(
        &'a self,
        text: &'a str,
        category: &'a str,
    ) -> BoxFuture<'a, Result<Record, ItemError>> {
        Box::pin(async move {
            let start = Instant::now();
            let messages = vec![ChatMessage::user(extraction_prompt(category, text))];
            let options = build_options(self.temperature, self.max_tokens);

            let response = self
                .provider
                .chat(&messages, Some(&options))
                .await
                .map_err(|e| ItemError::LlmFailed {
                    detail: e.to_string(),
                })?;

            debug!(
                "{} input tokens, {} output tokens, {:?}",
                response.prompt_tokens,
                response.completion_tokens,
                start.elapsed()
            );

            parse_reply(&response.content)
        })
    }
}

/// Build `CompletionOptions` for an extraction call.
fn build_options(temperature: f32, max_tokens: usize) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(temperature),
        max_tokens: Some(max_tokens),
        ..Default::default()
    }
}
