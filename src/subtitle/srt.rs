use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::time::Duration;

use super::segmenter::Cue;
use super::timestamp::{format_timestamp, parse_timestamp};
use crate::error::{Result, SubtitleError};

/// SRT (SubRip Subtitle) entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrtEntry {
    /// Sequential number, starting at 1
    pub index: u32,
    /// Start timestamp
    pub start: Duration,
    /// End timestamp
    pub end: Duration,
    /// Subtitle text, kept byte for byte
    pub text: String,
}

impl SrtEntry {
    /// Entry with an explicit index
    pub fn new(index: u32, start: Duration, end: Duration, text: String) -> Self {
        Self {
            index,
            start,
            end,
            text,
        }
    }

    /// Number a cue
    pub fn from_cue(index: u32, cue: &Cue) -> Self {
        Self::new(index, cue.start_time, cue.end_time, cue.text.clone())
    }
}

impl fmt::Display for SrtEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{} --> {}\n{}\n",
            self.index,
            format_timestamp(self.start),
            format_timestamp(self.end),
            self.text
        )
    }
}

/// Renders cues into one SRT document, carrying the cue counter across
/// recognition results.
#[derive(Debug, Clone)]
pub struct SrtWriter {
    next_index: u32,
    buffer: String,
    written: usize,
}

impl SrtWriter {
    /// Writer whose first cue is numbered 1
    pub fn new() -> Self {
        Self::with_start_index(1)
    }

    /// Continue numbering from `index`
    pub fn with_start_index(index: u32) -> Self {
        Self {
            next_index: index,
            buffer: String::new(),
            written: 0,
        }
    }

    /// Append one cue and return the index it was given
    pub fn push_cue(&mut self, cue: &Cue) -> u32 {
        let index = self.next_index;
        self.buffer.push_str(&SrtEntry::from_cue(index, cue).to_string());
        self.buffer.push('\n');
        self.next_index += 1;
        self.written += 1;
        index
    }

    /// Append the cues of one recognition result; returns the indices used
    pub fn push_cues(&mut self, cues: &[Cue]) -> Range<u32> {
        let first = self.next_index;
        for cue in cues {
            self.push_cue(cue);
        }
        first..self.next_index
    }

    /// Index the next cue will receive
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Cues written so far
    pub fn len(&self) -> usize {
        self.written
    }

    /// True until the first cue is written
    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Document rendered so far
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Consume the writer and return the document
    pub fn finish(self) -> String {
        self.buffer
    }
}

impl Default for SrtWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render every result's cues, in order, as one document
pub fn format_document(results: &[Vec<Cue>]) -> String {
    let mut writer = SrtWriter::new();
    for cues in results {
        writer.push_cues(cues);
    }
    writer.finish()
}

/// Number cues the same way [`format_document`] does, without rendering
pub fn number_cues(results: &[Vec<Cue>]) -> Vec<SrtEntry> {
    results
        .iter()
        .flatten()
        .zip(1u32..)
        .map(|(cue, index)| SrtEntry::from_cue(index, cue))
        .collect()
}

/// Parse an SRT document back into entries. Text lines are kept verbatim.
pub fn parse_document(content: &str) -> Result<Vec<SrtEntry>> {
    let mut entries = Vec::new();
    let mut lines = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .map(|(n, line)| (n + 1, line))
        .peekable();

    while let Some((line_no, line)) = lines.next() {
        if line.is_empty() {
            continue;
        }

        let index: u32 = line.trim().parse().map_err(|_| SubtitleError::InvalidSrt {
            line: line_no,
            reason: format!("expected cue index, found {:?}", line),
        })?;

        let (timing_no, timing) = lines.next().ok_or_else(|| SubtitleError::InvalidSrt {
            line: line_no + 1,
            reason: "missing timing line".to_string(),
        })?;
        let (start, end) = parse_timing(timing).map_err(|reason| SubtitleError::InvalidSrt {
            line: timing_no,
            reason,
        })?;

        let mut text_lines = Vec::new();
        while let Some((_, text)) = lines.peek() {
            if text.is_empty() {
                break;
            }
            text_lines.push(*text);
            lines.next();
        }

        entries.push(SrtEntry::new(index, start, end, text_lines.join("\n")));
    }

    Ok(entries)
}

fn parse_timing(line: &str) -> std::result::Result<(Duration, Duration), String> {
    let (start, end) = line
        .split_once(" --> ")
        .ok_or_else(|| format!("expected 'start --> end', found {:?}", line))?;
    let start = parse_timestamp(start).map_err(|e| e.to_string())?;
    let end = parse_timestamp(end).map_err(|e| e.to_string())?;
    Ok((start, end))
}

/// Validate SRT entries for common issues. Purely diagnostic.
pub fn validate(entries: &[SrtEntry]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut expected_index = 1u32;

    for (i, entry) in entries.iter().enumerate() {
        if entry.index != expected_index {
            issues.push(format!(
                "Entry {}: Index {} breaks the sequence (expected {})",
                i + 1,
                entry.index,
                expected_index
            ));
        }
        expected_index = entry.index.saturating_add(1);

        if entry.end < entry.start {
            issues.push(format!("Entry {}: End time is before start time", entry.index));
        }

        if entry.text.trim().is_empty() {
            issues.push(format!("Entry {}: Empty text", entry.index));
        }
    }

    for pair in entries.windows(2) {
        if pair[0].end > pair[1].start {
            issues.push(format!(
                "Entries {} and {}: Overlapping timestamps",
                pair[0].index, pair[1].index
            ));
        }
    }

    issues
}

/// Summary numbers for a rendered document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleStats {
    pub cue_count: usize,
    pub word_count: usize,
    pub first_start: Option<Duration>,
    pub last_end: Option<Duration>,
    pub longest_cue: Duration,
}

impl SubtitleStats {
    /// Statistics over segmented cues, all results flattened in order
    pub fn from_cues(results: &[Vec<Cue>]) -> Self {
        let mut stats = Self::default();
        for cue in results.iter().flatten() {
            stats.cue_count += 1;
            stats.word_count += cue.word_count();
            stats.first_start.get_or_insert(cue.start_time);
            stats.last_end = Some(cue.end_time);
            stats.longest_cue = stats.longest_cue.max(cue.duration());
        }
        stats
    }

    /// Statistics over parsed entries (word counts split on whitespace)
    pub fn from_entries(entries: &[SrtEntry]) -> Self {
        let mut stats = Self::default();
        for entry in entries {
            stats.cue_count += 1;
            stats.word_count += entry.text.split_whitespace().count();
            stats.first_start.get_or_insert(entry.start);
            stats.last_end = Some(entry.end);
            stats.longest_cue = stats.longest_cue.max(entry.end.saturating_sub(entry.start));
        }
        stats
    }
}
