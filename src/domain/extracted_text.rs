use serde::Serialize;

pub const SEGMENT_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    Native,
    Ocr,
}

/// A run of text from a single page. `start`/`end` are byte offsets into
/// [`ExtractedText::raw_text`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSegment {
    pub page: u32,
    pub start: usize,
    pub end: usize,
    pub source: TextSource,
    pub text: String,
}

/// Text pulled out of a document, in page order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExtractedText {
    segments: Vec<TextSegment>,
    page_count: u32,
    raw: String,
}

impl ExtractedText {
    pub fn builder(page_count: u32) -> ExtractedTextBuilder {
        ExtractedTextBuilder {
            text: ExtractedText {
                segments: Vec::new(),
                page_count,
                raw: String::new(),
            },
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[TextSegment] {
        &self.segments
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn raw_text(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

pub struct ExtractedTextBuilder {
    text: ExtractedText,
}

impl ExtractedTextBuilder {
    /// Appends a page's text. Blank text is ignored so it never produces an
    /// empty segment.
    pub fn push(&mut self, page: u32, source: TextSource, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if text.trim().is_empty() {
            return self;
        }

        if !self.text.raw.is_empty() {
            self.text.raw.push_str(SEGMENT_SEPARATOR);
        }
        let start = self.text.raw.len();
        self.text.raw.push_str(&text);
        let end = self.text.raw.len();

        self.text.segments.push(TextSegment {
            page,
            start,
            end,
            source,
            text,
        });
        self
    }

    pub fn build(self) -> ExtractedText {
        self.text
    }
}
