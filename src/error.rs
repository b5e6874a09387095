use std::time::Duration;

use serde::Serialize;

/// Stable error codes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidUrl,
    VideoNotFound,
    TranscriptUnavailable,
    ProviderError,
    RateLimited,
    SummarizationFailed,
    Timeout,
    InternalError,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidUrl => "invalid_url",
            ErrorKind::VideoNotFound => "video_not_found",
            ErrorKind::TranscriptUnavailable => "transcript_unavailable",
            ErrorKind::ProviderError => "provider_error",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::SummarizationFailed => "summarization_failed",
            ErrorKind::Timeout => "timeout",
            ErrorKind::InternalError => "internal_error",
        }
    }

    /// Message safe to show the caller. Never includes provider detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            ErrorKind::InvalidUrl => "the URL does not look like a YouTube video link",
            ErrorKind::VideoNotFound => "the video could not be found",
            ErrorKind::TranscriptUnavailable => "the video has no captions available",
            ErrorKind::ProviderError => "the transcript service is unavailable, try again later",
            ErrorKind::RateLimited => "the summarization service is busy, try again later",
            ErrorKind::SummarizationFailed => "the summarization service rejected the request",
            ErrorKind::Timeout => "the request took too long to complete",
            ErrorKind::InternalError => "an internal error occurred",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Why a summarization call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    RateLimited,
    ProviderError,
    PolicyRejected,
    Timeout,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::RateLimited => write!(f, "rate_limited"),
            FailureReason::ProviderError => write!(f, "provider_error"),
            FailureReason::PolicyRejected => write!(f, "policy_rejected"),
            FailureReason::Timeout => write!(f, "timeout"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not extract a video id from {input:?}")]
    InvalidUrl { input: String },

    #[error("video {video_id} not found: {reason}")]
    VideoNotFound { video_id: String, reason: String },

    #[error("no transcript available for video {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    #[error("transcript provider failed: {0}")]
    Provider(String),

    #[error("summarization failed ({reason}): {message}")]
    Summarization { reason: FailureReason, message: String },

    #[error("deadline of {0:?} exceeded")]
    Timeout(Duration),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Error::VideoNotFound { .. } => ErrorKind::VideoNotFound,
            Error::TranscriptUnavailable { .. } => ErrorKind::TranscriptUnavailable,
            Error::Provider(_) => ErrorKind::ProviderError,
            Error::Summarization {
                reason: FailureReason::RateLimited,
                ..
            } => ErrorKind::RateLimited,
            Error::Summarization { .. } => ErrorKind::SummarizationFailed,
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::Internal(_) => ErrorKind::InternalError,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
