pub mod config;
pub mod error;
pub mod events;
pub mod output;
pub mod tool;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use error::{ErrorKind, Result, ToolError};

/// Video IDs that are never fetched. LLM callers tend to copy the example
/// link from the tool description instead of the one the user supplied.
pub const BLOCKED_VIDEO_IDS: &[&str] = &["dQw4w9WgXcQ"];

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|be/|embed/|shorts/)([^&?]+)").expect("video id pattern is valid"));

/// A single timed caption fragment
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CaptionFragment {
    pub text: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub start_timestamp: Option<String>,
}

/// Accept timing as a string or a bare number; anything else counts as absent
fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Transcript for a video, as selected from the provider response
#[derive(Debug, Clone)]
pub struct Transcript {
    pub video_id: String,
    pub title: String,
    /// Language key the fragments were taken from, e.g. `en` or `en_auto`
    pub language: String,
    pub fragments: Vec<CaptionFragment>,
}

/// Flattened transcript handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptResult {
    pub title: String,
    pub text: String,
}

/// Extract video ID from various YouTube URL formats
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    VIDEO_ID_RE.captures(input).map(|caps| caps[1].to_string())
}

/// Whether the reference mentions a video ID on the blocklist
pub fn is_blocked(input: &str) -> bool {
    BLOCKED_VIDEO_IDS.iter().any(|id| input.contains(*id))
}

/// Resolve a caller-supplied reference to a fetchable video ID
pub fn resolve_video_id(input: &str) -> Result<String> {
    if is_blocked(input) {
        return Err(ToolError::BlockedVideo { url: input.to_string() });
    }
    extract_video_id(input).ok_or_else(|| ToolError::InvalidUrl { url: input.to_string() })
}
