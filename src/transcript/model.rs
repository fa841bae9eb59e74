use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::offset::deserialize_offset;

/// A single recognized word with its time offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Transcribed text, punctuation included
    pub text: String,
    /// Offset from the start of the audio where the word begins
    pub start_time: Duration,
    /// Offset from the start of the audio where the word ends
    pub end_time: Duration,
}

impl Word {
    pub fn new(text: impl Into<String>, start_time: Duration, end_time: Duration) -> Self {
        Self {
            text: text.into(),
            start_time,
            end_time,
        }
    }

    /// Spoken length of the word (zero for malformed offsets)
    pub fn duration(&self) -> Duration {
        self.end_time.saturating_sub(self.start_time)
    }
}

/// One independently timed unit of recognized speech
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Words in transcript order
    pub words: Vec<Word>,
    /// Full transcript of the best alternative
    pub transcript: String,
    /// Recognizer confidence in `0.0..=1.0`
    pub confidence: f32,
}

impl RecognitionResult {
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            words,
            ..Self::default()
        }
    }

    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = transcript.into();
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Confidence as a percentage for display
    pub fn confidence_percent(&self) -> f32 {
        self.confidence * 100.0
    }
}

/// An ordered recognition response, one entry per recognition result
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranscriptionResponse {
    pub results: Vec<RecognitionResult>,
}

impl TranscriptionResponse {
    pub fn new(results: Vec<RecognitionResult>) -> Self {
        Self { results }
    }

    /// Parse the JSON body returned by the recognition service.
    ///
    /// Only the first (best) alternative of each result is kept. A result
    /// without alternatives becomes an empty result so that result order is
    /// preserved.
    pub fn from_json(json: &str) -> Result<Self> {
        let wire: WireResponse = serde_json::from_str(json)?;
        Ok(wire.into())
    }

    pub fn results(&self) -> &[RecognitionResult] {
        &self.results
    }

    /// Words across all results
    pub fn word_count(&self) -> usize {
        self.results.iter().map(|r| r.words.len()).sum()
    }

    /// True when no result carries any word
    pub fn is_empty(&self) -> bool {
        self.results.iter().all(RecognitionResult::is_empty)
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    results: Vec<WireResult>,
}

#[derive(Debug, Deserialize)]
struct WireResult {
    #[serde(default)]
    alternatives: Vec<WireAlternative>,
}

#[derive(Debug, Deserialize)]
struct WireAlternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    words: Vec<WireWord>,
}

#[derive(Debug, Deserialize)]
struct WireWord {
    #[serde(default)]
    word: String,
    #[serde(
        rename = "startTime",
        alias = "start_time",
        alias = "startOffset",
        default,
        deserialize_with = "deserialize_offset"
    )]
    start_time: Duration,
    #[serde(
        rename = "endTime",
        alias = "end_time",
        alias = "endOffset",
        default,
        deserialize_with = "deserialize_offset"
    )]
    end_time: Duration,
}

impl From<WireResponse> for TranscriptionResponse {
    fn from(wire: WireResponse) -> Self {
        let results = wire
            .results
            .into_iter()
            .map(|result| match result.alternatives.into_iter().next() {
                Some(best) => RecognitionResult {
                    words: best
                        .words
                        .into_iter()
                        .map(|w| Word::new(w.word, w.start_time, w.end_time))
                        .collect(),
                    transcript: best.transcript,
                    confidence: best.confidence,
                },
                None => RecognitionResult::default(),
            })
            .collect();

        Self { results }
    }
}
