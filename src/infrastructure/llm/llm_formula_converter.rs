use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{FormulaConverter, FormulaError};

use super::chat_client::{ChatClient, ChatError, ChatMessage, ModelParams};

const UNRECOGNIZED_MARKER: &str = "UNRECOGNIZED";

const SYSTEM_PROMPT: &str = "Convert the mathematical expression you are given into LaTeX. \
Reply with the LaTeX only, without dollar signs, code fences or commentary. \
If the input is not a mathematical expression, reply with UNRECOGNIZED.";

/// Formula conversion backed by a chat model. Replies are wrapped as inline
/// LaTeX (`$…$`).
pub struct LlmFormulaConverter {
    client: Arc<ChatClient>,
    params: ModelParams,
}

impl LlmFormulaConverter {
    pub fn new(client: Arc<ChatClient>, params: ModelParams) -> Self {
        Self { client, params }
    }
}

#[async_trait]
impl FormulaConverter for LlmFormulaConverter {
    #[tracing::instrument(skip(self, span), fields(span_chars = span.len()))]
    async fn convert(&self, span: &str) -> Result<String, FormulaError> {
        let request = self.params.request(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(span),
        ]);

        let reply = self.client.complete(&request).await.map_err(|e| match e {
            ChatError::Timeout => FormulaError::Timeout,
            ChatError::Rejected(status) => FormulaError::Unrecognized(format!("rejected: {status}")),
            other => FormulaError::CapabilityUnavailable(other.to_string()),
        })?;

        to_markup(span, &reply)
    }
}

pub fn to_markup(span: &str, reply: &str) -> Result<String, FormulaError> {
    let latex = reply
        .trim()
        .trim_start_matches("```latex")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
        .trim_matches('$')
        .trim();

    if latex.is_empty() || latex.eq_ignore_ascii_case(UNRECOGNIZED_MARKER) {
        return Err(FormulaError::Unrecognized(span.to_string()));
    }

    Ok(format!("${latex}$"))
}
