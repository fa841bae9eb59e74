use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::model::TranscriptionResponse;
use crate::error::Result;

/// Anything that can hand over a finished recognition response
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Human readable name for logs
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<TranscriptionResponse>;
}

/// Replays a recognition response previously saved as JSON
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TranscriptSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<TranscriptionResponse> {
        debug!("📄 Reading recognition response: {}", self.path.display());
        let json = tokio::fs::read_to_string(&self.path).await?;
        TranscriptionResponse::from_json(&json)
    }
}

/// Serves an already loaded response, mostly for tests and embedding
#[derive(Debug, Clone)]
pub struct InMemorySource {
    name: String,
    response: TranscriptionResponse,
}

impl InMemorySource {
    pub fn new(name: impl Into<String>, response: TranscriptionResponse) -> Self {
        Self {
            name: name.into(),
            response,
        }
    }
}

#[async_trait]
impl TranscriptSource for InMemorySource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    async fn fetch(&self) -> Result<TranscriptionResponse> {
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubtitleError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_json_file_source_reads_response() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("talk.json");
        tokio::fs::write(
            &path,
            r#"{"results":[{"alternatives":[{"transcript":"Hello.","confidence":0.8,"words":[{"word":"Hello.","startTime":"0s","endTime":"0.5s"}]}]}]}"#,
        )
        .await
        .unwrap();

        let source = JsonFileSource::new(&path);
        let response = source.fetch().await.unwrap();

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].words[0].text, "Hello.");
        assert!(source.describe().ends_with("talk.json"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = JsonFileSource::new("/definitely/not/here.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SubtitleError::Io(_)));
    }

    #[tokio::test]
    async fn test_in_memory_source() {
        let source = InMemorySource::new("memory", TranscriptionResponse::default());
        assert_eq!(source.describe(), "memory");
        assert!(source.fetch().await.unwrap().results.is_empty());
    }
}
