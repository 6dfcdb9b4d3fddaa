//! Entry point consumed by LLM tool-calling hosts.
//!
//! Every invocation ends with exactly one terminal status event and a plain
//! text answer; failures are reported in that text rather than returned.

use std::sync::Arc;

use eyre::eyre;
use log::{debug, info, warn};

use crate::config::Config;
use crate::error::{Result, ToolError};
use crate::events::{EventEmitter, NoopEmitter, StatusEvent};
use crate::output::{self, DEFAULT_CHUNK_SECONDS, TranscriptFormat};
use crate::youtube::{self, HttpApi, TranscriptApi};
use crate::{TranscriptResult, resolve_video_id};

pub const FAILURE_PREFIX: &str = "The tool failed with an error.";
const FAILURE_MESSAGE: &str = "The tool failed with an error. No transcript has been provided.";

pub struct TranscriptTool {
    api: Arc<dyn TranscriptApi>,
    format: TranscriptFormat,
    chunk_seconds: u64,
}

impl TranscriptTool {
    pub fn new(api: Arc<dyn TranscriptApi>) -> Self {
        Self {
            api,
            format: TranscriptFormat::default(),
            chunk_seconds: DEFAULT_CHUNK_SECONDS,
        }
    }

    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        let api = HttpApi::from_config(config)?;
        Ok(Self::new(Arc::new(api)).with_format(config.format(), config.chunk_seconds()))
    }

    pub fn with_format(mut self, format: TranscriptFormat, chunk_seconds: u64) -> Self {
        self.format = format;
        self.chunk_seconds = chunk_seconds;
        self
    }

    /// Provides the title and full English transcript of a YouTube video.
    ///
    /// Returns either `Title: ...\nTranscript: ...` or a message starting
    /// with [`FAILURE_PREFIX`].
    pub async fn get_youtube_transcript(&self, url: &str, emitter: &dyn EventEmitter) -> String {
        match self.run(url, emitter).await {
            Ok(result) => {
                info!("Retrieved transcript for {url} ({} chars)", result.text.len());
                emitter
                    .emit(StatusEvent::done(format!("Successfully retrieved transcript for {url}")))
                    .await;
                output::render_payload(&result)
            }
            Err(err) => {
                warn!("Transcript lookup for {url} failed: {err}");
                emitter.emit(StatusEvent::done(failure_description(url, &err))).await;
                failure_text(&err)
            }
        }
    }

    /// Same lookup without status events, for callers that want the error
    pub async fn fetch(&self, url: &str) -> Result<TranscriptResult> {
        self.run(url, &NoopEmitter).await
    }

    async fn run(&self, url: &str, emitter: &dyn EventEmitter) -> Result<TranscriptResult> {
        let video_id = resolve_video_id(url)?;
        emitter
            .emit(StatusEvent::progress(format!("Fetching transcript for {url}")))
            .await;

        self.fetch_isolated(video_id).await
    }

    /// Fetch and flatten on a separate task so a panic surfaces as an error
    async fn fetch_isolated(&self, video_id: String) -> Result<TranscriptResult> {
        let api = Arc::clone(&self.api);
        let (format, chunk_seconds) = (self.format, self.chunk_seconds);
        let handle = tokio::spawn(async move {
            let transcript = youtube::fetch_transcript(api.as_ref(), &video_id).await?;
            debug!(
                "Flattening {} fragments of {} as {format:?}",
                transcript.fragments.len(),
                transcript.video_id
            );
            Ok::<_, ToolError>(output::flatten(&transcript, format, chunk_seconds))
        });

        match handle.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => {
                let payload = e.into_panic();
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(ToolError::Unknown(eyre!("transcript lookup panicked: {msg}")))
            }
            Err(e) => Err(ToolError::Unknown(eyre!("transcript lookup did not complete: {e}"))),
        }
    }
}

fn failure_description(url: &str, err: &ToolError) -> String {
    match err {
        ToolError::BlockedVideo { .. } => format!("{url} is not a valid youtube link"),
        ToolError::InvalidUrl { .. } => format!("Could not find a YouTube video id in {url}"),
        ToolError::NoTranscript { .. } => format!("Failed to retrieve transcript for {url}. No results"),
        other => format!("Failed to retrieve transcript for {url}. ({})", other.kind()),
    }
}

fn failure_text(err: &ToolError) -> String {
    match err.diagnostics() {
        Some(detail) => format!("{FAILURE_MESSAGE}\nError Traceback: \n{detail}"),
        None => FAILURE_MESSAGE.to_string(),
    }
}
