//! Sentence segmentation of timed words into subtitle cues.
//!
//! Each recognition result is walked independently. Words accumulate into a
//! sentence until a word ends in `.` or `?`, or the result runs out of words.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Duration;

use crate::error::{Result, SubtitleError};
use crate::transcript::{RecognitionResult, Word};

/// One sentence worth of words, not yet numbered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    /// Start offset of the first word
    pub start_time: Duration,
    /// End offset of the closing word
    pub end_time: Duration,
    /// Every word followed by a single space, trailing space included
    pub text: String,
    /// Indices of the covered words within their recognition result
    pub words: Range<usize>,
}

impl Cue {
    /// Time from the first word's start to the closing word's end
    pub fn duration(&self) -> Duration {
        self.end_time.saturating_sub(self.start_time)
    }

    /// Number of recognized words in the cue
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

enum SegmenterState {
    Accumulating {
        first: usize,
        start_time: Duration,
        text: String,
    },
    CueClosed,
}

/// Whether a word ends a sentence. Empty words never do.
pub fn is_sentence_terminal(word: &str) -> bool {
    matches!(word.chars().last(), Some('.') | Some('?'))
}

/// Group the words of one recognition result into cues
pub fn segment(words: &[Word]) -> Result<Vec<Cue>> {
    let mut cues = Vec::new();
    let mut state = SegmenterState::CueClosed;
    let last = words.len().saturating_sub(1);

    for (index, word) in words.iter().enumerate() {
        if word.end_time < word.start_time {
            return Err(SubtitleError::MalformedWord {
                index,
                word: word.text.clone(),
                start: word.start_time,
                end: word.end_time,
            });
        }

        let (first, start_time, mut text) =
            match std::mem::replace(&mut state, SegmenterState::CueClosed) {
                SegmenterState::Accumulating {
                    first,
                    start_time,
                    text,
                } => (first, start_time, text),
                SegmenterState::CueClosed => (index, word.start_time, String::new()),
            };

        text.push_str(&word.text);
        text.push(' ');

        if index == last || is_sentence_terminal(&word.text) {
            cues.push(Cue {
                start_time,
                end_time: word.end_time,
                text,
                words: first..index + 1,
            });
        } else {
            state = SegmenterState::Accumulating {
                first,
                start_time,
                text,
            };
        }
    }

    Ok(cues)
}

/// Segment every result in order; one cue list per result
pub fn segment_results(results: &[RecognitionResult]) -> Result<Vec<Vec<Cue>>> {
    results.iter().map(|result| segment(&result.words)).collect()
}

/// Segment results on the blocking pool.
///
/// Handles are awaited in submission order, so the output is identical to
/// [`segment_results`].
pub async fn segment_results_parallel(results: &[RecognitionResult]) -> Result<Vec<Vec<Cue>>> {
    let handles: Vec<_> = results
        .iter()
        .map(|result| {
            let words = result.words.clone();
            tokio::task::spawn_blocking(move || segment(&words))
        })
        .collect();

    let joined = futures::future::try_join_all(handles)
        .await
        .map_err(|e| SubtitleError::Task(e.to_string()))?;

    joined.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start_ms: u64, end_ms: u64) -> Word {
        Word::new(text, Duration::from_millis(start_ms), Duration::from_millis(end_ms))
    }

    fn sample() -> Vec<Word> {
        vec![word("Hi.", 0, 300), word("Bye", 500, 900), word("now.", 900, 1200)]
    }

    #[test]
    fn test_two_sentences() {
        let cues = segment(&sample()).unwrap();

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "Hi. ");
        assert_eq!(cues[0].start_time, Duration::ZERO);
        assert_eq!(cues[0].end_time, Duration::from_millis(300));
        assert_eq!(cues[1].text, "Bye now. ");
        assert_eq!(cues[1].start_time, Duration::from_millis(500));
        assert_eq!(cues[1].end_time, Duration::from_millis(1200));
        assert_eq!(cues[1].words, 1..3);
    }

    #[test]
    fn test_cue_duration_and_word_count() {
        let cues = segment(&sample()).unwrap();

        assert_eq!(cues[0].word_count(), 1);
        assert_eq!(cues[0].duration(), Duration::from_millis(300));
        assert_eq!(cues[1].word_count(), 2);
        assert_eq!(cues[1].duration(), Duration::from_millis(700));
    }

    #[test]
    fn test_empty_input_produces_no_cues() {
        assert!(segment(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_last_word_closes_without_punctuation() {
        let cues = segment(&[word("hello", 100, 400)]).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "hello ");
        assert_eq!(cues[0].words, 0..1);

        let cues = segment(&[word("One.", 0, 100), word("two", 200, 300), word("three", 300, 450)]).unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[1].text, "two three ");
        assert_eq!(cues[1].end_time, Duration::from_millis(450));
    }

    #[test]
    fn test_question_mark_and_abbreviation_close() {
        let cues = segment(&[
            word("Ready?", 0, 200),
            word("Mr.", 300, 400),
            word("Smith", 400, 600),
            word("waits!", 600, 900),
        ])
        .unwrap();

        let texts: Vec<&str> = cues.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Ready? ", "Mr. ", "Smith waits! "]);
    }

    #[test]
    fn test_empty_word_is_not_terminal() {
        assert!(!is_sentence_terminal(""));

        let cues = segment(&[word("", 0, 100), word("end.", 100, 200)]).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, " end. ");

        let cues = segment(&[word("start", 0, 100), word("", 100, 100)]).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "start  ");
    }

    #[test]
    fn test_malformed_word_is_rejected() {
        let err = segment(&[word("fine.", 0, 100), word("broken", 500, 400)]).unwrap_err();
        match err {
            SubtitleError::MalformedWord { index, word, .. } => {
                assert_eq!(index, 1);
                assert_eq!(word, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cues_partition_words() {
        let words = vec![
            word("We", 0, 100),
            word("start.", 100, 300),
            word("Is", 400, 500),
            word("this", 500, 600),
            word("it?", 600, 800),
            word("Yes", 900, 1000),
        ];
        let cues = segment(&words).unwrap();

        let mut expected_start = 0;
        for cue in &cues {
            assert_eq!(cue.words.start, expected_start);
            assert!(cue.start_time <= cue.end_time);
            expected_start = cue.words.end;
        }
        assert_eq!(expected_start, words.len());

        let rejoined: String = cues.iter().map(|c| c.text.as_str()).collect();
        let original: String = words.iter().map(|w| format!("{} ", w.text)).collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn test_results_are_segmented_independently() {
        let results = vec![
            RecognitionResult::new(vec![word("No", 0, 100), word("stop", 100, 200)]),
            RecognitionResult::default(),
            RecognitionResult::new(vec![word("here", 300, 400)]),
        ];
        let cues = segment_results(&results).unwrap();

        assert_eq!(cues.len(), 3);
        assert_eq!(cues[0].len(), 1);
        assert_eq!(cues[0][0].text, "No stop ");
        assert!(cues[1].is_empty());
        assert_eq!(cues[2][0].text, "here ");
    }

    #[tokio::test]
    async fn test_parallel_matches_sequential() {
        let results: Vec<RecognitionResult> = (0..16)
            .map(|n| {
                let base = n * 10_000;
                RecognitionResult::new(vec![
                    word("First.", base, base + 100),
                    word("then", base + 200, base + 300),
                    word("more", base + 300, base + 400),
                ])
            })
            .collect();

        let sequential = segment_results(&results).unwrap();
        let parallel = segment_results_parallel(&results).await.unwrap();
        assert_eq!(sequential, parallel);
    }

    #[tokio::test]
    async fn test_parallel_propagates_malformed_word() {
        let results = vec![RecognitionResult::new(vec![word("bad", 10, 5)])];
        assert!(segment_results_parallel(&results).await.is_err());
    }
}
