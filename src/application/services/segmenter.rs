use std::sync::LazyLock;

use regex::Regex;

static NUMBERED_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)*[.)]?\s+\S").unwrap());
static NAMED_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:chapter|section|unit|lesson|part)\s+[0-9IVXLC]+\b").unwrap()
});

const MAX_HEADING_CHARS: usize = 80;

/// A run of text that becomes one candidate content unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    pub heading: Option<String>,
    pub text: String,
}

/// Splits text on paragraph breaks and heading-like lines.
#[derive(Debug, Clone)]
pub struct Segmenter {
    max_segment_chars: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(4000)
    }
}

#[derive(Default)]
struct Draft {
    heading: Option<String>,
    lines: Vec<String>,
    body_lines: usize,
}

impl Segmenter {
    pub fn new(max_segment_chars: usize) -> Self {
        Self {
            max_segment_chars: max_segment_chars.max(1),
        }
    }

    pub fn segment(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut draft = Draft::default();

        for line in text.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                // A heading waits for its body across blank lines.
                if draft.body_lines > 0 {
                    self.flush(&mut draft, &mut segments);
                }
                continue;
            }

            if is_heading(trimmed) {
                if draft.body_lines > 0 {
                    self.flush(&mut draft, &mut segments);
                }
                draft.heading = Some(trimmed.trim_end_matches(':').trim().to_string());
                draft.lines.push(trimmed.to_string());
                continue;
            }

            draft.body_lines += 1;
            draft.lines.push(trimmed.to_string());
        }

        self.flush(&mut draft, &mut segments);
        segments
    }

    fn flush(&self, draft: &mut Draft, segments: &mut Vec<Segment>) {
        let Draft { heading, lines, .. } = std::mem::take(draft);
        let text = lines.join("\n");
        if text.trim().is_empty() {
            return;
        }

        for piece in self.split_oversized(&text) {
            segments.push(Segment {
                index: segments.len(),
                heading: heading.clone(),
                text: piece,
            });
        }
    }

    /// Packs whole sentences into pieces no longer than the limit. A single
    /// sentence over the limit is cut at character boundaries.
    fn split_oversized(&self, text: &str) -> Vec<String> {
        if text.chars().count() <= self.max_segment_chars {
            return vec![text.to_string()];
        }

        let mut pieces = Vec::new();
        let mut current = String::new();

        for sentence in split_into_sentences(text) {
            let sentence_chars = sentence.chars().count();
            let current_chars = current.chars().count();

            if current_chars > 0 && current_chars + 1 + sentence_chars > self.max_segment_chars {
                pieces.push(std::mem::take(&mut current));
            }

            if sentence_chars > self.max_segment_chars {
                let chars: Vec<char> = sentence.chars().collect();
                pieces.extend(
                    chars
                        .chunks(self.max_segment_chars)
                        .map(|chunk| chunk.iter().collect::<String>()),
                );
                continue;
            }

            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&sentence);
        }

        if !current.trim().is_empty() {
            pieces.push(current);
        }
        pieces
    }
}

pub fn is_heading(line: &str) -> bool {
    let chars = line.chars().count();
    if chars == 0 || chars > MAX_HEADING_CHARS {
        return false;
    }

    if NAMED_HEADING.is_match(line) {
        return true;
    }
    if line.ends_with(':') {
        return true;
    }
    if NUMBERED_HEADING.is_match(line) && !line.ends_with(['.', '!', '?']) {
        return true;
    }

    let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 3 && letters.iter().all(|c| c.is_uppercase())
}

fn split_into_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        let at_boundary = matches!(ch, '.' | '!' | '?')
            && chars.peek().is_none_or(|next| next.is_whitespace());
        if at_boundary {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    if !current.trim().is_empty() {
        sentences.push(current.trim().to_string());
    }
    sentences
}
