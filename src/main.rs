use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use tracing::{error, info, warn};

use speech_subtitles::config::{Config, LoadReport};
use speech_subtitles::pipeline::BatchProcessor;
use speech_subtitles::subtitle::{input_basename, StdoutSink};
use speech_subtitles::transcript::JsonFileSource;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("speech-subtitles")
        .version(env!("CARGO_PKG_VERSION"))
        .author("TigreRoll")
        .about("Generate sentence-grouped SRT subtitles from speech recognition responses")
        .arg(
            Arg::new("input")
                .value_name("RESPONSE_JSON")
                .help("Recognition response files (JSON) to convert")
                .required(true)
                .num_args(1..),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .help("Directory for subtitle files (default: next to each input)"),
        )
        .arg(
            Arg::new("workers")
                .short('w')
                .long("workers")
                .value_name("NUM")
                .help("Number of files processed concurrently")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (TOML)"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .help("Segment recognition results in parallel")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stdout")
                .long("stdout")
                .help("Print the subtitle document instead of writing a file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    // Load before the subscriber exists (it needs the log level), report after
    let (mut config, report) = match matches.get_one::<String>("config") {
        Some(path) => {
            let path = PathBuf::from(path);
            let config = Config::from_file(&path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?;
            let report = LoadReport {
                path: Some(path),
                ..LoadReport::default()
            };
            (config, report)
        }
        None => match Config::load_with_report() {
            Ok(loaded) => loaded,
            Err(e) => {
                let report = LoadReport {
                    warnings: vec![format!("Failed to load config, using defaults: {}", e)],
                    ..LoadReport::default()
                };
                (Config::default(), report)
            }
        },
    };

    // Configure logging based on verbose flag
    if matches.get_flag("verbose") {
        tracing_subscriber::fmt()
            .with_target(true)
            .with_thread_ids(true)
            .with_env_filter("debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_target(false)
            .with_env_filter(format!("speech_subtitles={},warn", config.logging.level))
            .init();
    }

    for warning in &report.warnings {
        warn!("{}", warning);
    }
    if let Some(path) = &report.path {
        info!("📄 Loaded configuration from: {}", path.display());
    }

    if let Some(dir) = matches.get_one::<String>("output-dir") {
        config.output.base_dir = Some(PathBuf::from(dir));
    }
    if let Some(workers) = matches.get_one::<usize>("workers") {
        config.performance.max_workers = *workers;
    }
    if matches.get_flag("parallel") {
        config.segmentation.parallel = true;
    }
    config.validate().context("Invalid configuration")?;

    let inputs: Vec<PathBuf> = matches
        .get_many::<String>("input")
        .map(|values| values.map(PathBuf::from).collect())
        .unwrap_or_default();

    for input in &inputs {
        if !input.is_file() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
    }

    if matches.get_flag("stdout") {
        if inputs.len() != 1 {
            anyhow::bail!("--stdout takes exactly one input file");
        }
        let input = &inputs[0];
        let processor = BatchProcessor::new(config)?;
        processor
            .pipeline()
            .run(&JsonFileSource::new(input), &StdoutSink, &input_basename(input))
            .await
            .with_context(|| format!("Failed to generate subtitles for {}", input.display()))?;
        return Ok(());
    }

    info!("🚀 Speech Subtitles starting...");
    for line in config.summary().lines() {
        info!("{}", line);
    }

    let processor = BatchProcessor::new(config)?;
    let results = processor.process_files(inputs).await?;

    info!("🎉 Processing completed in {:.2}s", results.total_time.as_secs_f64());
    info!("✅ Successful: {}", results.successful);
    info!("❌ Failed: {}", results.failed);

    let issue_count: usize = results.results.iter().map(|r| r.issues.len()).sum();
    if issue_count > 0 {
        warn!("⚠️  {} validation issues reported", issue_count);
    }

    if results.failed > 0 {
        for failed in results.results.iter().filter(|r| r.error_message.is_some()) {
            error!(
                "{}: {}",
                failed.input,
                failed.error_message.as_deref().unwrap_or("Unknown error")
            );
        }
        anyhow::bail!("{} of {} files failed", results.failed, results.total);
    }

    Ok(())
}
