use thiserror::Error;

/// Coarse failure category, stable for callers that need to branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidUrl,
    Network,
    Decode,
    Upstream,
    NoTranscript,
    Unknown,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::InvalidUrl => "invalid url",
            ErrorKind::Network => "network error",
            ErrorKind::Decode => "malformed response",
            ErrorKind::Upstream => "upstream error",
            ErrorKind::NoTranscript => "no transcript",
            ErrorKind::Unknown => "unknown error",
        };
        write!(f, "{s}")
    }
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("could not extract video ID from: {url}")]
    InvalidUrl { url: String },

    #[error("{url} is not a real youtube link")]
    BlockedVideo { url: String },

    #[error("transcript endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("request to transcript endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode transcript response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("transcript endpoint reported code {code} (HTTP {status}): {body}")]
    Upstream { code: String, status: u16, body: String },

    #[error("no english transcript available for video {video_id}")]
    NoTranscript { video_id: String },

    #[error(transparent)]
    Unknown(#[from] eyre::Report),
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::InvalidUrl { .. } | ToolError::BlockedVideo { .. } => ErrorKind::InvalidUrl,
            ToolError::Http { .. } | ToolError::Transport(_) => ErrorKind::Network,
            ToolError::Decode { .. } => ErrorKind::Decode,
            ToolError::Upstream { .. } => ErrorKind::Upstream,
            ToolError::NoTranscript { .. } => ErrorKind::NoTranscript,
            ToolError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Diagnostic text appended to the failure message, if any.
    ///
    /// Invalid links and missing transcripts explain themselves and carry none.
    pub fn diagnostics(&self) -> Option<String> {
        match self {
            ToolError::InvalidUrl { .. } | ToolError::BlockedVideo { .. } | ToolError::NoTranscript { .. } => None,
            ToolError::Http { status, body } => Some(format!("HTTP status {status}\n{body}")),
            ToolError::Transport(e) => Some(format!("{e:?}")),
            ToolError::Decode { source, .. } => Some(source.to_string()),
            ToolError::Upstream { code, status, body } => Some(format!("code {code} (HTTP status {status})\n{body}")),
            ToolError::Unknown(report) => Some(format!("{report:?}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;
