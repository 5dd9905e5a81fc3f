//! Tolerant SRT/VTT cue parser
//!
//! Imported subtitle files arrive from the wild: mixed line endings,
//! missing index lines, comma or dot millisecond delimiters, stray markup.
//! The parser never fails the whole import; a block that cannot be
//! understood is dropped and the rest of the file still loads.

use crate::subtitles::SubtitleCue;
use log::debug;

const TIME_SEPARATOR: &str = "-->";

/// Parse a subtitle file's contents into cues, in source order
///
/// Empty input yields an empty list. Malformed blocks are skipped
/// individually and never abort the parse.
pub fn parse(content: &str) -> Vec<SubtitleCue> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");

    let mut cues = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in normalized.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            if !block.is_empty() {
                if let Some(cue) = parse_block(&block) {
                    cues.push(cue);
                }
                block.clear();
            }
        } else {
            block.push(line);
        }
    }

    debug!("Parsed {} subtitle cues", cues.len());
    cues
}

fn parse_block(lines: &[&str]) -> Option<SubtitleCue> {
    if lines.len() < 2 {
        return None;
    }

    // A purely numeric first line is an SRT index when a time-range line
    // follows; otherwise the first line must be the time range itself.
    let has_index = is_index_line(lines[0]) && lines[1].contains(TIME_SEPARATOR);
    let time_line = if has_index { lines[1] } else { lines[0] };
    let text_lines = if has_index { &lines[2..] } else { &lines[1..] };

    let (start_raw, end_raw) = time_line.split_once(TIME_SEPARATOR)?;
    let start = parse_timestamp(start_raw)?;
    let end = parse_timestamp(end_raw)?;

    let text = strip_tags(&text_lines.join("\n"));

    Some(SubtitleCue { start, end, text })
}

fn is_index_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit())
}

/// Parse an `H:MM:SS,mmm` or `H:MM:SS.mmm` timestamp into seconds
fn parse_timestamp(raw: &str) -> Option<f64> {
    let mut parts = raw.trim().split(':');
    let hours: f64 = parts.next()?.trim().parse().ok()?;
    let minutes: f64 = parts.next()?.trim().parse().ok()?;
    let seconds: f64 = parts.next()?.trim().replace(',', ".").parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let total = hours * 3600.0 + minutes * 60.0 + seconds;
    total.is_finite().then_some(total)
}

/// Remove `<...>` markup spans, leaving unterminated brackets alone
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}
