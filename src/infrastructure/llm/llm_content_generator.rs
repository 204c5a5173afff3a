use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{ContentGenerator, GeneratedContent, GenerationError};
use crate::infrastructure::observability::sanitize_prompt;

use super::chat_client::{ChatClient, ChatError, ChatMessage, ModelParams};

const SYSTEM_PROMPT: &str = "You turn passages from educational documents into study notes. \
Reply with a single JSON object and nothing else, using exactly these keys: \
\"topic\" (short topic label), \"subtopic\" (short subtopic label or empty string), \
\"content\" (a clear explanation of the passage for a student). \
If the passage has no teachable content, reply with {\"topic\": \"\", \"subtopic\": \"\", \"content\": \"\"}.";

/// Reply schema expected from the model.
#[derive(Debug, Deserialize)]
struct GenerationReply {
    #[serde(default)]
    topic: String,
    #[serde(default)]
    subtopic: Option<String>,
    #[serde(default)]
    content: String,
}

pub struct LlmContentGenerator {
    client: Arc<ChatClient>,
    params: ModelParams,
}

impl LlmContentGenerator {
    pub fn new(client: Arc<ChatClient>, params: ModelParams) -> Self {
        Self { client, params }
    }
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    #[tracing::instrument(skip(self, segment, topic_hint), fields(segment_chars = segment.len()))]
    async fn generate(
        &self,
        segment: &str,
        topic_hint: Option<&str>,
    ) -> Result<GeneratedContent, GenerationError> {
        let prompt = build_prompt(segment, topic_hint);
        tracing::debug!(prompt = %sanitize_prompt(&prompt), "Requesting content generation");

        let request = self.params.request(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ]);

        let reply = self
            .client
            .complete(&request)
            .await
            .map_err(generation_error)?;

        parse_generated_content(&reply)
    }
}

/// Only outages and timeouts are worth a retry. A rejected request or an
/// unreadable reply will not improve on the second attempt.
pub fn generation_error(error: ChatError) -> GenerationError {
    match error {
        ChatError::Timeout => GenerationError::Timeout,
        ChatError::Unavailable(reason) => GenerationError::CapabilityUnavailable(reason),
        ChatError::Rejected(status) => {
            tracing::warn!(%status, "Generation request rejected");
            GenerationError::EmptyResult
        }
        ChatError::InvalidResponse(reason) => {
            tracing::warn!(error = %reason, "Generation reply unreadable");
            GenerationError::EmptyResult
        }
    }
}

fn build_prompt(segment: &str, topic_hint: Option<&str>) -> String {
    match topic_hint {
        Some(hint) => format!("Topic hint: {hint}\n\nPassage:\n{segment}"),
        None => format!("Passage:\n{segment}"),
    }
}

/// Validates a model reply into [`GeneratedContent`]. Accepts bare JSON,
/// JSON inside a markdown fence, or the first JSON object or array embedded
/// in surrounding prose. An array yields its first element.
pub fn parse_generated_content(reply: &str) -> Result<GeneratedContent, GenerationError> {
    let body = strip_code_fence(reply.trim());

    let value: serde_json::Value = serde_json::from_str(body)
        .ok()
        .or_else(|| extract_json_block(body).and_then(|block| serde_json::from_str(block).ok()))
        .ok_or_else(|| {
            tracing::warn!(reply = %sanitize_prompt(reply), "Generator reply is not JSON");
            GenerationError::EmptyResult
        })?;

    let value = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or(GenerationError::EmptyResult)?,
        other => other,
    };

    let reply: GenerationReply =
        serde_json::from_value(value).map_err(|_| GenerationError::EmptyResult)?;

    let content = reply.content.trim();
    if content.is_empty() {
        return Err(GenerationError::EmptyResult);
    }

    Ok(GeneratedContent {
        topic: reply.topic.trim().to_string(),
        subtopic: reply
            .subtopic
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        content: content.to_string(),
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let closing = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(closing)?;
    (end > start).then(|| &text[start..=end])
}
