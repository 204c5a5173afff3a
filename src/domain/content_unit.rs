use serde::Serialize;

/// One topic/subtopic/content record, the atomic output of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentUnit {
    topic: String,
    subtopic: String,
    content: String,
    video_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentUnitError {
    #[error("topic must not be empty")]
    EmptyTopic,
    #[error("content must not be empty")]
    EmptyContent,
}

impl ContentUnit {
    pub fn new(
        topic: impl Into<String>,
        subtopic: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, ContentUnitError> {
        let topic = topic.into().trim().to_string();
        let content = content.into().trim().to_string();

        if topic.is_empty() {
            return Err(ContentUnitError::EmptyTopic);
        }
        if content.is_empty() {
            return Err(ContentUnitError::EmptyContent);
        }

        Ok(Self {
            topic,
            subtopic: subtopic.into().trim().to_string(),
            content,
            video_link: None,
        })
    }

    pub fn with_video_link(mut self, link: impl Into<String>) -> Self {
        let link = link.into();
        self.video_link = (!link.trim().is_empty()).then(|| link.trim().to_string());
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn subtopic(&self) -> &str {
        &self.subtopic
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn video_link(&self) -> Option<&str> {
        self.video_link.as_deref()
    }
}
