use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::{Result, SubtitleError};

/// Destination for a finished subtitle document
#[async_trait]
pub trait SubtitleSink: Send + Sync {
    /// Store `document` for the input named `basename`; returns where it went
    async fn store(&self, basename: &str, document: &str) -> Result<String>;
}

/// Writes `<dir>/<basename><suffix>.<extension>`
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    suffix: String,
    extension: String,
    overwrite: bool,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            suffix: "-subtitle".to_string(),
            extension: "srt".to_string(),
            overwrite: true,
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Output path for an input basename
    pub fn output_path(&self, basename: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}.{}", basename, self.suffix, self.extension))
    }
}

#[async_trait]
impl SubtitleSink for FileSink {
    async fn store(&self, basename: &str, document: &str) -> Result<String> {
        let path = self.output_path(basename);

        if !self.overwrite && tokio::fs::try_exists(&path).await? {
            return Err(SubtitleError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            )));
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, document).await?;

        info!("💾 SRT file saved: {} ({} bytes)", path.display(), document.len());
        Ok(path.display().to_string())
    }
}

/// Prints documents to standard output
#[derive(Debug, Clone, Default)]
pub struct StdoutSink;

#[async_trait]
impl SubtitleSink for StdoutSink {
    async fn store(&self, _basename: &str, document: &str) -> Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(document.as_bytes()).await?;
        stdout.flush().await?;
        Ok("<stdout>".to_string())
    }
}

/// Input file name with its last extension removed.
///
/// `talk.final.json` becomes `talk.final`; names without an extension are
/// kept whole.
pub fn input_basename(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "transcript".to_string())
}
