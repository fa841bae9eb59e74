pub mod segmenter;
pub mod sink;
pub mod srt;
pub mod timestamp;

pub use segmenter::{is_sentence_terminal, segment, segment_results, segment_results_parallel, Cue};
pub use sink::{input_basename, FileSink, StdoutSink, SubtitleSink};
pub use srt::{format_document, number_cues, parse_document, validate, SrtEntry, SrtWriter, SubtitleStats};
pub use timestamp::{format_timestamp, parse_timestamp, wall_clock};
