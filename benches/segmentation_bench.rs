use criterion::{black_box, criterion_group, criterion_main, Criterion};
use speech_subtitles::subtitle::{format_document, segment, segment_results};
use speech_subtitles::transcript::{RecognitionResult, TranscriptionResponse, Word};
use speech_subtitles::Config;
use std::time::Duration;

const WORDS: [&str; 8] = ["so", "the", "door", "is", "open", "now.", "right", "here?"];

fn make_words(count: u64, offset_ms: u64) -> Vec<Word> {
    (0..count)
        .map(|i| {
            let start = offset_ms + i * 350;
            Word::new(
                WORDS[(i % WORDS.len() as u64) as usize],
                Duration::from_millis(start),
                Duration::from_millis(start + 300),
            )
        })
        .collect()
}

fn make_results(results: u64, words_per_result: u64) -> Vec<RecognitionResult> {
    (0..results)
        .map(|r| RecognitionResult::new(make_words(words_per_result, r * 60_000)))
        .collect()
}

fn bench_segmentation(c: &mut Criterion) {
    let short = make_words(50, 0);
    c.bench_function("segment_50_words", |b| {
        b.iter(|| black_box(segment(black_box(&short)).unwrap()))
    });

    let long = make_words(10_000, 0);
    c.bench_function("segment_10k_words", |b| {
        b.iter(|| black_box(segment(black_box(&long)).unwrap()))
    });
}

fn bench_srt_generation(c: &mut Criterion) {
    let results = make_results(100, 120);
    let cues = segment_results(&results).unwrap();

    c.bench_function("srt_format_100_results", |b| {
        b.iter(|| black_box(format_document(black_box(&cues))))
    });

    c.bench_function("srt_end_to_end_100_results", |b| {
        b.iter(|| {
            let cues = segment_results(black_box(&results)).unwrap();
            black_box(format_document(&cues))
        })
    });
}

fn bench_response_parsing(c: &mut Criterion) {
    let mut json = String::from(r#"{"results":[{"alternatives":[{"transcript":"bench","confidence":0.9,"words":["#);
    for i in 0..2_000u64 {
        if i > 0 {
            json.push(',');
        }
        json.push_str(&format!(
            r#"{{"word":"{}","startTime":"{}.{:03}s","endTime":"{}.{:03}s"}}"#,
            WORDS[(i % 8) as usize],
            i / 2,
            (i % 2) * 500,
            i / 2,
            (i % 2) * 500 + 300
        ));
    }
    json.push_str("]}]}]}");

    c.bench_function("parse_response_2k_words", |b| {
        b.iter(|| black_box(TranscriptionResponse::from_json(black_box(&json)).unwrap()))
    });
}

fn bench_config_operations(c: &mut Criterion) {
    c.bench_function("config_validation", |b| {
        let config = Config::default();
        b.iter(|| black_box(config.validate().is_ok()))
    });
}

criterion_group!(
    benches,
    bench_segmentation,
    bench_srt_generation,
    bench_response_parsing,
    bench_config_operations
);
criterion_main!(benches);
