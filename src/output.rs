use serde::{Deserialize, Serialize};

use crate::{CaptionFragment, Transcript, TranscriptResult};

pub const DEFAULT_CHUNK_SECONDS: u64 = 30;

/// How caption fragments are flattened into transcript text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptFormat {
    /// All fragment texts joined by single spaces
    #[default]
    Text,
    /// One `[timestamp] text` line per time window
    Chunks,
}

/// Flatten a transcript into its title and text
pub fn flatten(transcript: &Transcript, format: TranscriptFormat, chunk_seconds: u64) -> TranscriptResult {
    let text = match format {
        TranscriptFormat::Text => render_text(&transcript.fragments),
        TranscriptFormat::Chunks => render_chunks(&transcript.fragments, chunk_seconds),
    };

    TranscriptResult {
        title: transcript.title.clone(),
        text,
    }
}

/// Join fragment texts with single spaces, ignoring timing
pub fn render_text(fragments: &[CaptionFragment]) -> String {
    fragments.iter().map(|f| f.text.as_str()).collect::<Vec<_>>().join(" ")
}

/// Group fragments into `chunk_seconds` windows, one line per window
pub fn render_chunks(fragments: &[CaptionFragment], chunk_seconds: u64) -> String {
    let window = chunk_seconds.max(1);
    let mut lines = Vec::new();
    let mut label = String::new();
    let mut window_start: Option<u64> = None;
    let mut texts: Vec<String> = Vec::new();

    for fragment in fragments {
        let start = fragment.start_timestamp.as_deref().and_then(parse_timestamp);

        let opens_window = match (window_start, start) {
            (None, _) if texts.is_empty() => true,
            (Some(ws), Some(s)) => s >= ws.saturating_add(window),
            (None, Some(_)) => true,
            _ => false,
        };

        if opens_window {
            if !texts.is_empty() {
                lines.push(chunk_line(&label, &texts));
                texts.clear();
            }
            window_start = start;
            label = match (&fragment.start_timestamp, start) {
                (Some(ts), Some(_)) => ts.trim().to_string(),
                (_, Some(s)) => format_timestamp(s),
                _ => format_timestamp(0),
            };
        }

        texts.push(fragment.text.replace('\n', ""));
    }

    if !texts.is_empty() {
        lines.push(chunk_line(&label, &texts));
    }

    lines.join("\n")
}

fn chunk_line(label: &str, texts: &[String]) -> String {
    format!("[{label}] {}", texts.join(" "))
}

/// Parse `SS`, `M:SS` or `H:MM:SS` (fractional seconds allowed) into whole seconds
pub fn parse_timestamp(ts: &str) -> Option<u64> {
    let parts: Vec<&str> = ts.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let (last, rest) = parts.split_last()?;
    let secs: f64 = last.parse().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }

    let mut total = 0u64;
    for part in rest {
        total = total.checked_mul(60)?.checked_add(part.parse::<u64>().ok()?)?;
    }
    total.checked_mul(60)?.checked_add(secs as u64)
}

/// Format whole seconds as `M:SS`, or `H:MM:SS` past the hour
pub fn format_timestamp(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Text returned to the tool host on success
pub fn render_payload(result: &TranscriptResult) -> String {
    format!("Title: {}\nTranscript: {}", result.title, result.text)
}

/// Render the flattened result as pretty JSON
pub fn render_json(result: &TranscriptResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
}
