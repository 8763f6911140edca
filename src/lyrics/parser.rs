//! Lyric text parsers
//!
//! LRCLIB returns lyrics in two shapes: plain text, one line per row, and
//! LRC-style synced text:
//! [00:12.34] Hello world
//! [00:15.00] Another line

/// A lyric line with its timestamp in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncedLine {
    pub time: f64,
    pub text: String,
}

/// Parse plain lyrics into trimmed, non-empty lines. Order is preserved.
pub fn parse_plain(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse LRC-style synced lyrics.
///
/// Only lines carrying a `[MM:SS.ff]` or `[MM:SS.fff]` tag are kept; anything
/// else (metadata tags, malformed timestamps, plain text) is dropped without
/// error. A two-digit fraction is centiseconds, a three-digit one is
/// milliseconds. Lines whose text is empty after removing the tag are dropped.
pub fn parse_synced(text: &str) -> Vec<SyncedLine> {
    let mut out = Vec::new();

    for line in text.lines() {
        let Some((range, time)) = find_timestamp(line) else {
            continue;
        };

        let mut rest = String::with_capacity(line.len() - (range.end - range.start));
        rest.push_str(&line[..range.start]);
        rest.push_str(&line[range.end..]);
        let text = rest.trim();
        if text.is_empty() {
            continue;
        }

        out.push(SyncedLine {
            time,
            text: text.to_string(),
        });
    }

    out
}

/// Find the first well-formed timestamp tag in `line`, returning its byte
/// range (brackets included) and the decoded time in seconds.
fn find_timestamp(line: &str) -> Option<(std::ops::Range<usize>, f64)> {
    for (start, _) in line.match_indices('[') {
        let after = &line[start + 1..];
        let Some(end_rel) = after.find(']') else {
            break;
        };
        if let Some(time) = parse_timestamp(&after[..end_rel]) {
            return Some((start..start + 1 + end_rel + 1, time));
        }
    }
    None
}

/// Parse `MM:SS.ff` / `MM:SS.fff` (digit counts are exact). Returns seconds.
fn parse_timestamp(s: &str) -> Option<f64> {
    if !s.is_ascii() {
        return None;
    }
    let bytes = s.as_bytes();
    if !(bytes.len() == 8 || bytes.len() == 9) {
        return None;
    }
    if bytes[2] != b':' || bytes[5] != b'.' {
        return None;
    }

    let digits = |range: std::ops::Range<usize>| -> Option<u64> {
        let part = &s[range];
        if part.bytes().all(|b| b.is_ascii_digit()) {
            part.parse().ok()
        } else {
            None
        }
    };

    let minutes = digits(0..2)?;
    let seconds = digits(3..5)?;
    let fraction = &s[6..];
    let ms = match fraction.len() {
        // ".12" means 120ms: right-pad with a zero.
        2 => digits(6..8)? * 10,
        3 => digits(6..9)?,
        _ => return None,
    };

    Some(minutes as f64 * 60.0 + seconds as f64 + ms as f64 / 1000.0)
}
