pub mod model;
pub mod offset;
pub mod source;

pub use model::{RecognitionResult, TranscriptionResponse, Word};
pub use offset::parse_offset;
pub use source::{InMemorySource, JsonFileSource, TranscriptSource};
