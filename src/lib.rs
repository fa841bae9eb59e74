//! Speech Subtitles
//!
//! Turns word-timed speech recognition responses into sentence-grouped SRT
//! subtitles. The segmentation and formatting core is pure; reading
//! responses and writing documents sit behind small async traits.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod subtitle;
pub mod transcript;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder, LoadReport};
pub use crate::error::{Result, SubtitleError};
pub use crate::pipeline::{BatchProcessor, ProcessingResult, SubtitlePipeline};
pub use crate::subtitle::{format_document, segment, Cue, SrtEntry, SrtWriter, SubtitleStats};
pub use crate::transcript::{RecognitionResult, TranscriptionResponse, Word};
