//! Transcript reconstruction for raw subtitle payloads.
//!
//! Some subtitle providers hand back clean text; others hand back the raw
//! timed-text event stream (`wireMagic: pb3` header, `tStartMs` timing
//! fields, text in `utf8` segments). The latter is reduced to spoken text.

use std::sync::LazyLock;

use regex::Regex;

/// Substrings that only appear in raw timed-text payloads.
const RAW_MARKERS: &[&str] = &["wireMagic", "pb3", "tStartMs", "dDurationMs", "segs"];

/// Token preceding each text segment in a raw payload.
const SEGMENT_DELIMITER: &str = "\"utf8\"";

/// Start of the next timed event; text never runs past it.
const TIMING_MARKER: &str = "tStartMs";

/// Runs of Hangul, optionally interleaved with digits, whitespace and light
/// punctuation. Starts and ends on a Hangul character.
static TARGET_SCRIPT_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\p{Hangul}(?:[\p{Hangul}\d\s.,!?~'\-]*\p{Hangul})?")
        .expect("valid target script regex")
});

/// Whether `payload` looks like a raw timed-text blob.
#[must_use]
pub fn is_raw_payload(payload: &str) -> bool {
    RAW_MARKERS.iter().any(|marker| payload.contains(marker))
}

/// Reduce a subtitle payload to plain spoken text.
///
/// Clean payloads come back trimmed. Raw payloads go through segment
/// extraction, then the script-run scan if segments yield nothing. If both
/// come up empty the original payload is returned untouched.
#[must_use]
pub fn reconstruct(payload: &str) -> String {
    if !is_raw_payload(payload) {
        return payload.trim().to_string();
    }

    let mut kept = extract_segments(payload);
    if kept.is_empty() {
        tracing::debug!("no delimited subtitle segments; scanning for script runs");
        kept = extract_script_runs(payload);
    }

    let joined = collapse_whitespace(&kept.join(" "));
    if joined.is_empty() {
        tracing::debug!(
            bytes = payload.len(),
            "could not reconstruct subtitle text; keeping raw payload"
        );
        return payload.to_string();
    }
    joined
}

fn extract_segments(payload: &str) -> Vec<String> {
    payload
        .split(SEGMENT_DELIMITER)
        .skip(1)
        .filter_map(|segment| {
            let text = segment
                .find(TIMING_MARKER)
                .map_or(segment, |end| &segment[..end]);
            let text = text.replace("\\n", " ");
            let text = text.trim_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation());
            (text.chars().count() > 1).then(|| text.to_string())
        })
        .collect()
}

fn extract_script_runs(payload: &str) -> Vec<String> {
    TARGET_SCRIPT_RUN
        .find_iter(payload)
        .map(|m| m.as_str().trim())
        .filter(|run| !RAW_MARKERS.iter().any(|marker| run.contains(marker)))
        .filter(|run| run.chars().count() > 3)
        .map(str::to_string)
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
