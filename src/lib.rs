pub mod chunk;
pub mod config;
pub mod error;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod reduce;
pub mod summarize;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use error::{Error, ErrorKind, FailureReason, Result};

/// Canonical 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single timed caption fragment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptFragment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// How the caption track was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrackKind {
    Manual,
    Generated,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Manual => write!(f, "manual"),
            TrackKind::Generated => write!(f, "auto-generated"),
        }
    }
}

/// Raw transcript for a video, as returned by the provider
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub video_id: VideoId,
    pub title: String,
    pub language: String,
    pub kind: TrackKind,
    pub fragments: Vec<TranscriptFragment>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Video,
}

/// A single summarization request
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryRequest {
    pub video_url: String,
    #[serde(default = "default_language")]
    pub target_language: String,
    #[serde(default)]
    pub mode: Mode,
}

fn default_language() -> String {
    "en".to_string()
}

impl SummaryRequest {
    pub fn new(video_url: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
            target_language: target_language.into(),
            mode: Mode::Video,
        }
    }

    /// Trimmed, lower-cased target language; blank falls back to `en`
    pub fn resolved_language(&self) -> String {
        let lang = self.target_language.trim().to_lowercase();
        if lang.is_empty() { default_language() } else { lang }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Partial,
    Failed,
}

/// Final outcome of one request. Built once by the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResult {
    pub status: Status,
    pub summary: String,
    pub language: String,
    pub title: Option<String>,
    pub source_language: Option<String>,
    pub truncated: bool,
    pub chunks: usize,
    pub error: Option<ErrorKind>,
}

impl SummaryResult {
    pub fn failed(kind: ErrorKind, language: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            summary: String::new(),
            language: language.into(),
            title: None,
            source_language: None,
            truncated: false,
            chunks: 0,
            error: Some(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status != Status::Failed
    }
}

static VIDEO_ID_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_-]{11}$").unwrap());

// Checked in order; first match wins. Hosts are anchored so a YouTube-looking
// path on another domain is rejected.
static URL_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^([0-9A-Za-z_-]{11})$",
        r"^(?:https?://)?(?:[\w-]+\.)?youtube\.com/watch\?(?:[^#]*&)?v=([0-9A-Za-z_-]+)",
        r"^(?:https?://)?(?:www\.)?youtu\.be/([0-9A-Za-z_-]+)",
        r"^(?:https?://)?(?:[\w-]+\.)?youtube(?:-nocookie)?\.com/embed/([0-9A-Za-z_-]+)",
        r"^(?:https?://)?(?:[\w-]+\.)?youtube\.com/shorts/([0-9A-Za-z_-]+)",
        r"^(?:https?://)?(?:[\w-]+\.)?youtube\.com/live/([0-9A-Za-z_-]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Extract video ID from the known YouTube URL shapes
pub fn extract_video_id(input: &str) -> Result<VideoId> {
    let input = input.trim();

    let token = URL_SHAPES
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| caps[1].to_string());

    match token {
        Some(id) if VIDEO_ID_GRAMMAR.is_match(&id) => Ok(VideoId(id)),
        _ => Err(Error::InvalidUrl {
            input: input.to_string(),
        }),
    }
}
