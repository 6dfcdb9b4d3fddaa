use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{Result, ToolError};
use crate::{CaptionFragment, Transcript};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub const DEFAULT_ENDPOINT: &str = "https://notegpt.io/api/v2/video-transcript";
pub const DEFAULT_PLATFORM: &str = "youtube";

/// Body code the endpoint uses for a successful lookup
pub const SUCCESS_CODE: i64 = 100000;

/// (language key, variant kind) pairs, most preferred first
const VARIANT_PREFERENCE: &[(&str, &str)] = &[("en", "auto"), ("en_auto", "auto")];

/// Status and body of an endpoint response, before any validation
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Remote lookup of transcript data for a video ID
#[async_trait]
pub trait TranscriptApi: Send + Sync {
    async fn get(&self, video_id: &str) -> Result<RawResponse>;
}

/// Transcript endpoint reached over HTTP
pub struct HttpApi {
    client: reqwest::Client,
    endpoint: String,
    platform: String,
}

impl HttpApi {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            platform: platform.into(),
        }
    }

    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(Self::new(client, config.endpoint(), config.platform()))
    }
}

#[async_trait]
impl TranscriptApi for HttpApi {
    async fn get(&self, video_id: &str) -> Result<RawResponse> {
        debug!("Requesting transcript: {} video_id={video_id}", self.endpoint);

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("platform", self.platform.as_str()), ("video_id", video_id)])
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        debug!("Transcript endpoint answered HTTP {status} ({} bytes)", body.len());

        Ok(RawResponse { status, body })
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    code: Value,
    #[serde(default)]
    data: Value,
}

/// Fetch and validate the transcript for a video ID. A single attempt; any
/// failed gate ends the lookup.
pub async fn fetch_transcript(api: &dyn TranscriptApi, video_id: &str) -> Result<Transcript> {
    let raw = api.get(video_id).await?;
    parse_response(video_id, raw)
}

/// Validate an endpoint response and pick the best english caption track
pub fn parse_response(video_id: &str, raw: RawResponse) -> Result<Transcript> {
    let RawResponse { status, body } = raw;

    if !(200..300).contains(&status) {
        warn!("Transcript endpoint returned HTTP {status} for {video_id}");
        return Err(ToolError::Http { status, body });
    }

    let envelope: Envelope = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(source) => return Err(ToolError::Decode { source, body }),
    };

    if !is_success_code(&envelope.code) {
        let code = match &envelope.code {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        warn!("Transcript endpoint reported code {code} for {video_id}");
        return Err(ToolError::Upstream { code, status, body });
    }

    let title = envelope
        .data
        .pointer("/videoInfo/name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let selected = match envelope.data.get("transcripts") {
        Some(transcripts) => select_variant(transcripts),
        None => None,
    };

    let Some((language, variant)) = selected else {
        return Err(ToolError::NoTranscript {
            video_id: video_id.to_string(),
        });
    };

    let fragments = match decode_fragments(variant) {
        Ok(fragments) => fragments,
        Err(source) => return Err(ToolError::Decode { source, body }),
    };

    if fragments.is_empty() {
        return Err(ToolError::NoTranscript {
            video_id: video_id.to_string(),
        });
    }

    debug!(
        "Using caption track for {video_id}: lang={language} fragments={}",
        fragments.len()
    );

    Ok(Transcript {
        video_id: video_id.to_string(),
        title,
        language: language.to_string(),
        fragments,
    })
}

fn is_success_code(code: &Value) -> bool {
    match code {
        Value::Number(n) => n.as_i64() == Some(SUCCESS_CODE),
        Value::String(s) => s.trim().parse::<i64>().ok() == Some(SUCCESS_CODE),
        _ => false,
    }
}

/// First variant in preference order that is present and non-empty.
/// An empty `en` track falls through to `en_auto` like a missing one.
fn select_variant(transcripts: &Value) -> Option<(&'static str, &Value)> {
    VARIANT_PREFERENCE.iter().find_map(|(lang, kind)| {
        let variant = transcripts.get(*lang)?.get(*kind)?;
        match variant {
            Value::Null => None,
            Value::Array(items) if items.is_empty() => None,
            _ => Some((*lang, variant)),
        }
    })
}

fn decode_fragments(variant: &Value) -> std::result::Result<Vec<CaptionFragment>, serde_json::Error> {
    let fragments = Vec::<CaptionFragment>::deserialize(variant)?;
    Ok(fragments
        .into_iter()
        .map(|f| CaptionFragment {
            text: html_escape::decode_html_entities(&f.text).to_string(),
            start_timestamp: f.start_timestamp,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(body: Value) -> RawResponse {
        RawResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_parse_en_auto_track() {
        let raw = ok(json!({
            "code": 100000,
            "data": {
                "videoInfo": { "name": "Test Video" },
                "transcripts": {
                    "en": { "auto": [
                        { "text": "hello", "start_timestamp": "0:00" },
                        { "text": "world", "start_timestamp": "0:30" }
                    ]}
                }
            }
        }));

        let t = parse_response("abc", raw).unwrap();
        assert_eq!(t.title, "Test Video");
        assert_eq!(t.language, "en");
        assert_eq!(t.fragments.len(), 2);
        assert_eq!(t.fragments[1].text, "world");
        assert_eq!(t.fragments[1].start_timestamp.as_deref(), Some("0:30"));
    }

    #[test]
    fn test_falls_back_to_en_auto() {
        let raw = ok(json!({
            "code": 100000,
            "data": { "transcripts": { "en_auto": { "auto": [ { "text": "hi" } ] } } }
        }));

        let t = parse_response("abc", raw).unwrap();
        assert_eq!(t.language, "en_auto");
        assert_eq!(t.fragments[0].text, "hi");
        assert!(t.fragments[0].start_timestamp.is_none());
        assert_eq!(t.title, "");
    }

    #[test]
    fn test_empty_en_track_falls_through() {
        let raw = ok(json!({
            "code": 100000,
            "data": { "transcripts": {
                "en": { "auto": [] },
                "en_auto": { "auto": [ { "text": "fallback" } ] }
            }}
        }));

        let t = parse_response("abc", raw).unwrap();
        assert_eq!(t.language, "en_auto");
    }

    #[test]
    fn test_other_variants_ignored() {
        let raw = ok(json!({
            "code": 100000,
            "data": { "transcripts": {
                "en": { "custom": [ { "start": "00:00:00", "end": "00:00:05" } ], "auto": [ { "text": "x" } ] },
                "de": { "auto": [ { "text": "nein" } ] }
            }}
        }));

        let t = parse_response("abc", raw).unwrap();
        assert_eq!(t.fragments.len(), 1);
        assert_eq!(t.fragments[0].text, "x");
    }

    #[test]
    fn test_non_english_only_is_no_transcript() {
        let raw = ok(json!({
            "code": 100000,
            "data": { "transcripts": { "de": { "auto": [ { "text": "nein" } ] } } }
        }));

        let err = parse_response("abc", raw).unwrap_err();
        assert!(matches!(err, ToolError::NoTranscript { .. }));
    }

    #[test]
    fn test_empty_transcripts() {
        let raw = ok(json!({ "code": 100000, "data": { "transcripts": {} } }));
        let err = parse_response("abc", raw).unwrap_err();
        assert!(matches!(err, ToolError::NoTranscript { .. }));
    }

    #[test]
    fn test_missing_data() {
        let raw = ok(json!({ "code": 100000 }));
        let err = parse_response("abc", raw).unwrap_err();
        assert!(matches!(err, ToolError::NoTranscript { .. }));
    }

    #[test]
    fn test_upstream_code_wins_over_content() {
        let raw = ok(json!({
            "code": 100001,
            "data": { "transcripts": { "en": { "auto": [ { "text": "hello" } ] } } }
        }));

        match parse_response("abc", raw).unwrap_err() {
            ToolError::Upstream { code, status, .. } => {
                assert_eq!(code, "100001");
                assert_eq!(status, 200);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_string_success_code_accepted() {
        let raw = ok(json!({
            "code": "100000",
            "data": { "transcripts": { "en": { "auto": [ { "text": "hello" } ] } } }
        }));
        assert!(parse_response("abc", raw).is_ok());
    }

    #[test]
    fn test_http_error_status() {
        let raw = RawResponse {
            status: 502,
            body: "bad gateway".to_string(),
        };
        match parse_response("abc", raw).unwrap_err() {
            ToolError::Http { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_body_not_json() {
        let raw = RawResponse {
            status: 200,
            body: "<html>nope</html>".to_string(),
        };
        let err = parse_response("abc", raw).unwrap_err();
        assert!(matches!(err, ToolError::Decode { .. }));
    }

    #[test]
    fn test_malformed_fragments() {
        let raw = ok(json!({
            "code": 100000,
            "data": { "transcripts": { "en": { "auto": "not a list" } } }
        }));
        let err = parse_response("abc", raw).unwrap_err();
        assert!(matches!(err, ToolError::Decode { .. }));
    }

    #[test]
    fn test_numeric_timing_does_not_break_track() {
        let raw = ok(json!({
            "code": 100000,
            "data": { "transcripts": { "en": { "auto": [
                { "text": "hello", "start_timestamp": 0.0 },
                { "text": "world", "start_timestamp": 30 }
            ]}}}
        }));
        let t = parse_response("abc", raw).unwrap();
        assert_eq!(t.video_id, "abc");
        assert_eq!(t.fragments[0].start_timestamp.as_deref(), Some("0.0"));
        assert_eq!(t.fragments[1].start_timestamp.as_deref(), Some("30"));
        assert_eq!(crate::output::render_text(&t.fragments), "hello world");
    }

    #[test]
    fn test_html_entities_decoded() {
        let raw = ok(json!({
            "code": 100000,
            "data": { "transcripts": { "en": { "auto": [ { "text": "it&#39;s &quot;fine&quot;" } ] } } }
        }));
        let t = parse_response("abc", raw).unwrap();
        assert_eq!(t.fragments[0].text, "it's \"fine\"");
    }
}
