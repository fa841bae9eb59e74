//! Word time offsets as they appear in recognition responses.
//!
//! Offsets are protobuf `Duration` values. In JSON they are either a decimal
//! string with an `s` suffix (`"1.500s"`) or an object with `seconds` and
//! `nanos`. Parsing is exact; no floating point is involved.

use crate::error::{Result, SubtitleError};
use serde::{Deserialize, Deserializer};
use std::time::Duration;

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Parse a protobuf-JSON duration string such as `"2s"` or `"1.500s"`
pub fn parse_offset(text: &str) -> Result<Duration> {
    let trimmed = text.trim();
    let number = trimmed
        .strip_suffix('s')
        .ok_or_else(|| SubtitleError::InvalidOffset(format!("missing 's' suffix: {:?}", text)))?;

    if number.starts_with('-') {
        return Err(SubtitleError::InvalidOffset(format!("negative offset: {:?}", text)));
    }

    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (number, ""),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SubtitleError::InvalidOffset(format!("bad seconds in {:?}", text)));
    }
    if fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SubtitleError::InvalidOffset(format!("bad fraction in {:?}", text)));
    }

    let seconds: u64 = whole
        .parse()
        .map_err(|_| SubtitleError::InvalidOffset(format!("seconds out of range: {:?}", text)))?;

    let mut nanos: u32 = 0;
    if !fraction.is_empty() {
        // Right-pad to nine digits: ".5" is 500_000_000ns
        let padded = format!("{:0<9}", fraction);
        nanos = padded
            .parse()
            .map_err(|_| SubtitleError::InvalidOffset(format!("bad fraction in {:?}", text)))?;
    }

    Ok(Duration::new(seconds, nanos))
}

/// Build an offset from the `{seconds, nanos}` representation
pub fn offset_from_parts(seconds: i64, nanos: i32) -> Result<Duration> {
    if seconds < 0 || nanos < 0 {
        return Err(SubtitleError::InvalidOffset(format!(
            "negative offset: {}s {}ns",
            seconds, nanos
        )));
    }
    if nanos as u32 >= NANOS_PER_SEC {
        return Err(SubtitleError::InvalidOffset(format!("nanos out of range: {}", nanos)));
    }
    Ok(Duration::new(seconds as u64, nanos as u32))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOffset {
    Text(String),
    Parts {
        #[serde(default)]
        seconds: RawSeconds,
        #[serde(default)]
        nanos: i32,
    },
}

// int64 fields are strings in canonical protobuf JSON
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeconds {
    Int(i64),
    Text(String),
}

impl Default for RawSeconds {
    fn default() -> Self {
        RawSeconds::Int(0)
    }
}

/// Serde adapter for offset fields
pub fn deserialize_offset<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawOffset::deserialize(deserializer)?;
    let parsed = match raw {
        RawOffset::Text(text) => parse_offset(&text),
        RawOffset::Parts { seconds, nanos } => {
            let seconds = match seconds {
                RawSeconds::Int(value) => Ok(value),
                RawSeconds::Text(text) => text
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| SubtitleError::InvalidOffset(format!("bad seconds {:?}", text))),
            };
            seconds.and_then(|seconds| offset_from_parts(seconds, nanos))
        }
    };
    parsed.map_err(serde::de::Error::custom)
}
