use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};

use crate::application::ports::{OcrEngine, OcrError};
use crate::infrastructure::text_processing::sanitize_extracted_text;

use super::chat_client::{ChatClient, ChatError, ChatMessage, ModelParams};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

pub const OCR_PROMPT: &str = "Transcribe all text in this image exactly as written, in reading order. \
Keep line breaks between paragraphs and table rows. Write mathematical expressions as plain text. \
Do not describe the image. If there is no text, reply with nothing.";

/// OCR through a vision-capable chat model.
pub struct VisionOcrEngine {
    client: Arc<ChatClient>,
    params: ModelParams,
}

impl VisionOcrEngine {
    pub fn new(client: Arc<ChatClient>, params: ModelParams) -> Self {
        Self { client, params }
    }
}

#[async_trait]
impl OcrEngine for VisionOcrEngine {
    #[tracing::instrument(skip(self, image_png), fields(image_bytes = image_png.len()))]
    async fn extract(&self, image_png: &[u8]) -> Result<String, OcrError> {
        if !image_png.starts_with(PNG_MAGIC) {
            return Err(OcrError::UnsupportedInput(
                "expected a PNG-encoded image".to_string(),
            ));
        }

        let b64 = general_purpose::STANDARD.encode(image_png);
        let data_uri = format!("data:image/png;base64,{b64}");
        let request = self
            .params
            .request(vec![ChatMessage::user_with_image(data_uri, OCR_PROMPT)]);

        let text = self.client.complete(&request).await.map_err(|e| match e {
            ChatError::Timeout => OcrError::Timeout,
            ChatError::Rejected(status) => {
                OcrError::UnsupportedInput(format!("image rejected: {status}"))
            }
            other => OcrError::CapabilityUnavailable(other.to_string()),
        })?;

        tracing::debug!(chars = text.len(), "OCR reply received");
        Ok(sanitize_extracted_text(&text))
    }
}
