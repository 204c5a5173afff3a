pub mod imaging;
pub mod llm;
pub mod observability;
pub mod text_processing;
