//! SRT timestamp rendering and parsing.

use crate::error::{Result, SubtitleError};
use std::time::Duration;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Render the whole-second part of an offset as a time of day (`HH:MM:SS`).
///
/// Offsets are rendered as if they were a UTC clock reading, so anything at
/// or past 24 hours wraps around to `00:00:00`. Every clock string in an SRT
/// document goes through this function.
pub fn wall_clock(offset: Duration) -> String {
    let seconds_of_day = offset.as_secs() % SECONDS_PER_DAY;
    let hours = seconds_of_day / 3600;
    let minutes = (seconds_of_day % 3600) / 60;
    let seconds = seconds_of_day % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Sub-second part in milliseconds, truncated and zero-padded to 3 digits
pub fn millis(offset: Duration) -> String {
    format!("{:03}", offset.subsec_millis())
}

/// Format an offset as an SRT timestamp (`HH:MM:SS,mmm`)
pub fn format_timestamp(offset: Duration) -> String {
    format!("{},{}", wall_clock(offset), millis(offset))
}

/// Parse an SRT timestamp (`HH:MM:SS,mmm`)
pub fn parse_timestamp(timestamp: &str) -> Result<Duration> {
    let invalid = |reason: &str| SubtitleError::InvalidOffset(format!("{}: {:?}", reason, timestamp));

    let (clock, millis) = timestamp
        .trim()
        .split_once(',')
        .ok_or_else(|| invalid("missing millisecond separator"))?;

    let hms: Vec<&str> = clock.split(':').collect();
    if hms.len() != 3 || millis.len() != 3 {
        return Err(invalid("expected HH:MM:SS,mmm"));
    }

    let field = |part: &str| -> Result<u64> {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("non-numeric field"));
        }
        part.parse::<u64>().map_err(|_| invalid("field out of range"))
    };

    let hours = field(hms[0])?;
    let minutes = field(hms[1])?;
    let seconds = field(hms[2])?;
    let milliseconds = field(millis)?;

    if minutes >= 60 || seconds >= 60 {
        return Err(invalid("minutes and seconds must be below 60"));
    }

    let total_seconds = hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .ok_or_else(|| invalid("field out of range"))?;

    Duration::from_secs(total_seconds)
        .checked_add(Duration::from_millis(milliseconds))
        .ok_or_else(|| invalid("field out of range"))
}
