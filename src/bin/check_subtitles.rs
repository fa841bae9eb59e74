use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::path::PathBuf;
use tracing::{info, warn};

use speech_subtitles::subtitle::{format_timestamp, parse_document, validate, SubtitleStats};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("check_subtitles=info,speech_subtitles=info")
        .init();

    let matches = Command::new("check-subtitles")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse an SRT file and report validation issues")
        .arg(
            Arg::new("file")
                .value_name("SRT_FILE")
                .help("Subtitle file to check")
                .required(true),
        )
        .get_matches();

    let path = matches
        .get_one::<String>("file")
        .map(PathBuf::from)
        .context("missing SRT_FILE")?;

    info!("🔍 Checking subtitles: {}", path.display());

    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let entries = parse_document(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    let stats = SubtitleStats::from_entries(&entries);
    info!("   - {} cues, {} words", stats.cue_count, stats.word_count);
    if let (Some(first), Some(last)) = (stats.first_start, stats.last_end) {
        info!("   - Span: {} --> {}", format_timestamp(first), format_timestamp(last));
    }
    info!("   - Longest cue: {:.3}s", stats.longest_cue.as_secs_f64());

    let issues = validate(&entries);
    if issues.is_empty() {
        info!("✅ No issues found");
    } else {
        for issue in &issues {
            warn!("⚠️  {}", issue);
        }
        info!("📋 {} issues found", issues.len());
    }

    Ok(())
}
