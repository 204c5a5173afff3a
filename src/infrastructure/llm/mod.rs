mod chat_client;
mod llm_content_generator;
mod llm_formula_converter;
mod vision_ocr_engine;

pub use chat_client::{
    ChatClient, ChatError, ChatMessage, ChatRequest, ContentPart, ImageUrl, MessageContent,
    ModelParams, parse_completion,
};
pub use llm_content_generator::{LlmContentGenerator, generation_error, parse_generated_content};
pub use llm_formula_converter::{LlmFormulaConverter, to_markup};
pub use vision_ocr_engine::{OCR_PROMPT, VisionOcrEngine};
