use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SubtitleError};

/// Configuration for subtitle generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output file settings
    pub output: OutputConfig,

    /// Segmentation settings
    pub segmentation: SegmentationConfig,

    /// Performance and resource settings
    pub performance: PerformanceConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for subtitle files (None = next to each input)
    pub base_dir: Option<PathBuf>,

    /// Appended to the input basename
    pub file_suffix: String,

    /// Output file extension
    pub extension: String,

    /// Replace existing subtitle files
    pub overwrite: bool,
}

/// Outcome of the configuration file lookup
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// File the configuration was read from (None = defaults)
    pub path: Option<PathBuf>,

    /// Files that were found but could not be parsed
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Segment recognition results on the blocking thread pool
    pub parallel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Maximum number of response files processed at once
    pub max_workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when -v is not given
    pub level: String,

    /// Log each result's transcript and confidence at info level
    pub log_transcripts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            file_suffix: "-subtitle".to_string(),
            extension: "srt".to_string(),
            overwrite: true,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_workers: num_cpus::get().min(8), // Use available cores, max 8
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_transcripts: true,
        }
    }
}

impl Config {
    /// Candidate configuration files, in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("speech-subtitles.toml"),
            PathBuf::from("config/speech-subtitles.toml"),
        ];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("speech-subtitles").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/speech-subtitles/config.toml"));
        paths
    }

    /// Load configuration from the first readable file, then apply
    /// environment overrides. Falls back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let (config, report) = Self::load_with_report()?;
        for warning in &report.warnings {
            tracing::warn!("{}", warning);
        }
        if let Some(path) = &report.path {
            tracing::info!("📄 Loaded configuration from: {}", path.display());
        }
        Ok(config)
    }

    /// Same lookup as [`Config::load`], without logging. The report says
    /// which file was used and which files were skipped, so callers can log
    /// once their subscriber is installed.
    pub fn load_with_report() -> Result<(Self, LoadReport)> {
        Self::load_from_paths(&Self::search_paths())
    }

    fn load_from_paths(paths: &[PathBuf]) -> Result<(Self, LoadReport)> {
        let mut config = Self::default();
        let mut report = LoadReport::default();

        for path in paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(parsed) => {
                        config = parsed;
                        report.path = Some(path.clone());
                        break;
                    }
                    Err(e) => {
                        report
                            .warnings
                            .push(format!("Failed to parse config file {}: {}", path.display(), e));
                    }
                }
            }
        }

        config.apply_env()?;
        Ok((config, report))
    }

    /// Load one specific file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&config_str)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(output_dir) = std::env::var("SPEECH_SUBTITLES_OUTPUT_DIR") {
            self.output.base_dir = Some(PathBuf::from(output_dir));
        }

        if let Ok(workers) = std::env::var("SPEECH_SUBTITLES_WORKERS") {
            self.performance.max_workers = workers.trim().parse().map_err(|_| {
                SubtitleError::Config(format!("SPEECH_SUBTITLES_WORKERS is not a number: {:?}", workers))
            })?;
        }

        if let Ok(log_level) = std::env::var("SPEECH_SUBTITLES_LOG_LEVEL") {
            self.logging.level = log_level;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.performance.max_workers == 0 {
            return Err(SubtitleError::Config("max_workers must be greater than 0".to_string()));
        }

        if self.output.extension.is_empty() {
            return Err(SubtitleError::Config("output extension must not be empty".to_string()));
        }

        let has_separator = |s: &str| s.contains('/') || s.contains('\\');
        if has_separator(&self.output.file_suffix) || has_separator(&self.output.extension) {
            return Err(SubtitleError::Config(
                "file_suffix and extension must not contain path separators".to_string(),
            ));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Subtitle Configuration:\n\
            - Workers: {}\n\
            - Output Directory: {}\n\
            - Output Name: <input>{}.{}\n\
            - Parallel Segmentation: {}\n\
            - Log Level: {}",
            self.performance.max_workers,
            self.output
                .base_dir
                .as_ref()
                .map(|dir| dir.display().to_string())
                .unwrap_or_else(|| "(next to input)".to_string()),
            self.output.file_suffix,
            self.output.extension,
            self.segmentation.parallel,
            self.logging.level
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.performance.max_workers = workers;
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.config.output.base_dir = Some(dir);
        self
    }

    pub fn with_file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.output.file_suffix = suffix.into();
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.config.output.overwrite = overwrite;
        self
    }

    pub fn enable_parallel(mut self, enable: bool) -> Self {
        self.config.segmentation.parallel = enable;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.file_suffix, "-subtitle");
        assert_eq!(config.output.extension, "srt");
        assert!(config.output.base_dir.is_none());
        assert!(!config.segmentation.parallel);
        assert!(config.performance.max_workers >= 1);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_workers(8)
            .with_output_dir(PathBuf::from("out"))
            .enable_parallel(true)
            .build();

        assert_eq!(config.performance.max_workers, 8);
        assert_eq!(config.output.base_dir, Some(PathBuf::from("out")));
        assert!(config.segmentation.parallel);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());
        assert!(ConfigBuilder::new().with_workers(0).build().validate().is_err());
        assert!(ConfigBuilder::new().with_file_suffix("../x").build().validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[output]\nfile_suffix = \".en\"\n").unwrap();
        assert_eq!(config.output.file_suffix, ".en");
        assert_eq!(config.output.extension, "srt");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("speech-subtitles.toml");
        let config = ConfigBuilder::new()
            .with_workers(3)
            .with_output_dir(temp_dir.path().to_path_buf())
            .build();

        config.save(&path).unwrap();
        let reloaded = Config::from_file(&path).unwrap();

        assert_eq!(reloaded.output.base_dir, config.output.base_dir);
        assert!(reloaded.summary().contains("Output Name: <input>-subtitle.srt"));
    }

    #[test]
    fn test_load_report_names_first_parsable_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        let broken = temp_dir.path().join("broken.toml");
        let good = temp_dir.path().join("good.toml");
        std::fs::write(&broken, "[output\n").unwrap();
        std::fs::write(&good, "[output]\nfile_suffix = \".en\"\n").unwrap();

        let (config, report) =
            Config::load_from_paths(&[missing, broken.clone(), good.clone()]).unwrap();

        assert_eq!(config.output.file_suffix, ".en");
        assert_eq!(report.path, Some(good));
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains(&broken.display().to_string()));
    }

    #[test]
    fn test_load_report_without_files_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let (config, report) =
            Config::load_from_paths(&[temp_dir.path().join("none.toml")]).unwrap();

        assert!(report.path.is_none());
        assert!(report.warnings.is_empty());
        assert_eq!(config.output.file_suffix, "-subtitle");
    }
}
