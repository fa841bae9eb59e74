use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{Result, SubtitleError};
use crate::subtitle::{
    format_document, input_basename, number_cues, segment_results, segment_results_parallel, validate,
    FileSink, SubtitleSink, SubtitleStats,
};
use crate::transcript::{JsonFileSource, TranscriptSource, TranscriptionResponse};

/// A rendered SRT document and what is known about it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedSubtitles {
    pub document: String,
    pub stats: SubtitleStats,
    /// Non-fatal validation findings
    pub issues: Vec<String>,
}

/// Processing result for a single response file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    pub input: String,
    pub output: Option<String>,
    pub stats: SubtitleStats,
    pub issues: Vec<String>,
    pub processing_time: Duration,
    pub status: ProcessingStatus,
    pub error_message: Option<String>,
}

/// Overall batch processing results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_time: Duration,
    pub results: Vec<DocumentResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingStatus {
    Completed,
    Failed,
}

/// Turns one recognition response into one subtitle document
#[derive(Debug, Clone)]
pub struct SubtitlePipeline {
    config: Config,
}

impl SubtitlePipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Segment every result and render the whole document.
    ///
    /// Fails on the first malformed word; nothing partial is returned.
    pub async fn render(&self, response: &TranscriptionResponse) -> Result<RenderedSubtitles> {
        self.log_transcripts(response);

        let cues = if self.config.segmentation.parallel {
            segment_results_parallel(&response.results).await?
        } else {
            segment_results(&response.results)?
        };

        let document = format_document(&cues);
        let stats = SubtitleStats::from_cues(&cues);
        let issues = validate(&number_cues(&cues));
        for issue in &issues {
            warn!("SRT validation: {}", issue);
        }

        debug!(
            "🎬 Rendered {} cues from {} words ({} bytes)",
            stats.cue_count,
            stats.word_count,
            document.len()
        );

        Ok(RenderedSubtitles {
            document,
            stats,
            issues,
        })
    }

    /// Fetch, render and store one document
    pub async fn run(
        &self,
        source: &dyn TranscriptSource,
        sink: &dyn SubtitleSink,
        basename: &str,
    ) -> Result<DocumentResult> {
        let start_time = Instant::now();
        info!("🎤 Generating subtitles for: {}", source.describe());

        let response = source.fetch().await?;
        info!("📊 {} recognition results, {} words", response.results.len(), response.word_count());

        let rendered = self.render(&response).await?;
        let output = sink.store(basename, &rendered.document).await?;

        Ok(DocumentResult {
            input: source.describe(),
            output: Some(output),
            stats: rendered.stats,
            issues: rendered.issues,
            processing_time: start_time.elapsed(),
            status: ProcessingStatus::Completed,
            error_message: None,
        })
    }

    /// File sink for an input, honoring the configured output directory
    pub fn sink_for(&self, input: &Path) -> FileSink {
        let dir = match &self.config.output.base_dir {
            Some(dir) => dir.clone(),
            None => input
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        FileSink::new(dir)
            .with_suffix(self.config.output.file_suffix.clone())
            .with_extension(self.config.output.extension.clone())
            .with_overwrite(self.config.output.overwrite)
    }

    fn log_transcripts(&self, response: &TranscriptionResponse) {
        for (i, result) in response.results.iter().enumerate() {
            if self.config.logging.log_transcripts {
                info!("{}", "-".repeat(20));
                info!("📝 Transcript #{}: {}", i + 1, result.transcript);
                info!("🎯 Confidence: {:.1}%", result.confidence_percent());
            } else {
                debug!(
                    "📝 Transcript #{} ({:.1}%): {}",
                    i + 1,
                    result.confidence_percent(),
                    result.transcript
                );
            }
        }
    }
}

/// Processes several response files with bounded concurrency
pub struct BatchProcessor {
    pipeline: Arc<SubtitlePipeline>,
    worker_semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl BatchProcessor {
    /// Fails when the configuration does not validate
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let max_workers = config.performance.max_workers;
        info!("🔧 Initializing BatchProcessor with {} workers", max_workers);

        Ok(Self {
            pipeline: Arc::new(SubtitlePipeline::new(config)),
            worker_semaphore: Arc::new(Semaphore::new(max_workers)),
            max_concurrent: max_workers,
        })
    }

    pub fn pipeline(&self) -> &SubtitlePipeline {
        &self.pipeline
    }

    /// Process every input file; results come back in input order
    pub async fn process_files(&self, inputs: Vec<PathBuf>) -> Result<ProcessingResult> {
        let start_time = Instant::now();
        let total_inputs = inputs.len();

        if inputs.is_empty() {
            warn!("No recognition responses to process");
            return Ok(ProcessingResult {
                total: 0,
                successful: 0,
                failed: 0,
                total_time: start_time.elapsed(),
                results: Vec::new(),
            });
        }

        let (tx, mut rx) = mpsc::channel(self.max_concurrent);

        for (index, input) in inputs.into_iter().enumerate() {
            let pipeline = Arc::clone(&self.pipeline);
            let semaphore = Arc::clone(&self.worker_semaphore);
            let tx = tx.clone();

            tokio::spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        info!("📄 Processing response {}/{}: {}", index + 1, total_inputs, input.display());
                        process_single_file(&pipeline, &input).await
                    }
                    Err(e) => failed_result(&input, Duration::ZERO, &SubtitleError::Task(e.to_string())),
                };

                if let Err(e) = tx.send((index, result)).await {
                    error!("Failed to send result: {}", e);
                }
            });
        }

        // Drop the original sender to close the channel when all tasks complete
        drop(tx);

        let mut collected = Vec::with_capacity(total_inputs);
        while let Some((index, result)) = rx.recv().await {
            match result.status {
                ProcessingStatus::Completed => {
                    info!(
                        "✅ Completed: {} in {:.2}s ({} cues)",
                        result.input,
                        result.processing_time.as_secs_f64(),
                        result.stats.cue_count
                    );
                }
                ProcessingStatus::Failed => {
                    warn!(
                        "❌ Failed: {} - {}",
                        result.input,
                        result.error_message.as_deref().unwrap_or("Unknown error")
                    );
                }
            }
            collected.push((index, result));
        }

        if collected.len() != total_inputs {
            return Err(SubtitleError::Task(format!(
                "{} of {} workers did not report back",
                total_inputs - collected.len(),
                total_inputs
            )));
        }

        collected.sort_by_key(|(index, _)| *index);
        let results: Vec<DocumentResult> = collected.into_iter().map(|(_, result)| result).collect();
        let successful = results
            .iter()
            .filter(|r| r.status == ProcessingStatus::Completed)
            .count();

        Ok(ProcessingResult {
            total: results.len(),
            successful,
            failed: results.len() - successful,
            total_time: start_time.elapsed(),
            results,
        })
    }
}

async fn process_single_file(pipeline: &SubtitlePipeline, input: &Path) -> DocumentResult {
    let start_time = Instant::now();
    let source = JsonFileSource::new(input);
    let sink = pipeline.sink_for(input);
    let basename = input_basename(input);

    match pipeline.run(&source, &sink, &basename).await {
        Ok(result) => result,
        Err(e) => failed_result(input, start_time.elapsed(), &e),
    }
}

fn failed_result(input: &Path, elapsed: Duration, error: &SubtitleError) -> DocumentResult {
    DocumentResult {
        input: input.display().to_string(),
        output: None,
        stats: SubtitleStats::default(),
        issues: Vec::new(),
        processing_time: elapsed,
        status: ProcessingStatus::Failed,
        error_message: Some(error.to_string()),
    }
}
