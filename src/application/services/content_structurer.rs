use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::ports::{ContentGenerator, GeneratedContent, GenerationError};
use crate::domain::ContentUnit;

use super::fan_out::fan_out_ordered;
use super::resilience::{CallPolicy, call_with_retry};
use super::segmenter::{Segment, Segmenter};

pub const FALLBACK_TOPIC: &str = "General Content";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StructuringReport {
    pub segments: usize,
    pub emitted: usize,
    pub empty: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Structured {
    pub units: Vec<ContentUnit>,
    pub processing_time: Duration,
    pub report: StructuringReport,
}

enum SegmentOutcome {
    Unit(ContentUnit),
    Empty,
    Failed,
}

/// Turns normalized text into ordered content units, one generation call
/// per segment.
pub struct ContentStructurer {
    generator: Arc<dyn ContentGenerator>,
    segmenter: Segmenter,
    max_in_flight: usize,
}

impl ContentStructurer {
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
        segmenter: Segmenter,
        max_in_flight: usize,
    ) -> Self {
        Self {
            generator,
            segmenter,
            max_in_flight,
        }
    }

    #[tracing::instrument(skip(self, text, policy), fields(chars = text.len()))]
    pub async fn structure(
        &self,
        text: &str,
        topic_hint: Option<&str>,
        policy: CallPolicy,
    ) -> Structured {
        let started = Instant::now();
        let topic_hint = topic_hint.map(str::trim).filter(|hint| !hint.is_empty());

        let segments = self.segmenter.segment(text);
        let mut report = StructuringReport {
            segments: segments.len(),
            ..StructuringReport::default()
        };

        let outcomes = fan_out_ordered(segments, self.max_in_flight, |_, segment| {
            self.structure_segment(segment, topic_hint, policy)
        })
        .await;

        let mut units = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                SegmentOutcome::Unit(unit) => units.push(unit),
                SegmentOutcome::Empty => report.empty += 1,
                SegmentOutcome::Failed => report.failed += 1,
            }
        }
        report.emitted = units.len();

        let processing_time = started.elapsed();
        tracing::info!(
            segments = report.segments,
            emitted = report.emitted,
            empty = report.empty,
            failed = report.failed,
            elapsed_ms = processing_time.as_millis() as u64,
            "Structuring complete"
        );

        Structured {
            units,
            processing_time,
            report,
        }
    }

    async fn structure_segment(
        &self,
        segment: Segment,
        topic_hint: Option<&str>,
        policy: CallPolicy,
    ) -> SegmentOutcome {
        let generated = call_with_retry("content_generate", policy, || {
            self.generator.generate(&segment.text, topic_hint)
        })
        .await;

        match generated {
            Ok(generated) => build_unit(generated, &segment, topic_hint),
            Err(GenerationError::EmptyResult) => {
                tracing::debug!(segment = segment.index, "Generator returned nothing for segment");
                SegmentOutcome::Empty
            }
            Err(e) => {
                tracing::warn!(
                    segment = segment.index,
                    chars = segment.text.len(),
                    error = %e,
                    "Segment generation failed, dropping segment"
                );
                SegmentOutcome::Failed
            }
        }
    }
}

fn build_unit(
    generated: GeneratedContent,
    segment: &Segment,
    topic_hint: Option<&str>,
) -> SegmentOutcome {
    let topic = non_blank(&generated.topic)
        .or(topic_hint)
        .unwrap_or(FALLBACK_TOPIC);
    let subtopic = generated
        .subtopic
        .as_deref()
        .and_then(non_blank)
        .or(segment.heading.as_deref())
        .unwrap_or_default();

    match ContentUnit::new(topic, subtopic, generated.content) {
        Ok(unit) => SegmentOutcome::Unit(unit),
        Err(e) => {
            tracing::debug!(segment = segment.index, error = %e, "Discarding generated unit");
            SegmentOutcome::Empty
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
