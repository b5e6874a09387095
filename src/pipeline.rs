use std::future::Future;

use futures::{StreamExt, TryStreamExt, stream};
use log::{debug, error, info};
use tokio::time::Instant;

use crate::chunk::{self, Chunk};
use crate::config::Settings;
use crate::normalize::normalize;
use crate::reduce::reduce;
use crate::summarize::{LanguageModel, StyleHint, Summarizer};
use crate::youtube::TranscriptProvider;
use crate::{Error, Status, SummaryRequest, SummaryResult, VideoId, extract_video_id};

/// Pipeline step a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Fetch,
    Normalize,
    Summarize,
    Reduce,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Extract => write!(f, "extract"),
            Stage::Fetch => write!(f, "fetch"),
            Stage::Normalize => write!(f, "normalize"),
            Stage::Summarize => write!(f, "summarize"),
            Stage::Reduce => write!(f, "reduce"),
        }
    }
}

#[derive(Debug)]
struct StageError {
    stage: Stage,
    error: Error,
}

impl StageError {
    fn at(stage: Stage) -> impl FnOnce(Error) -> StageError {
        move |error| StageError { stage, error }
    }
}

/// URL in, summary out. Holds only read-only state, so one instance can
/// serve any number of concurrent requests.
pub struct Pipeline<T, M> {
    transcripts: T,
    summarizer: Summarizer<M>,
    settings: Settings,
}

impl<T: TranscriptProvider, M: LanguageModel> Pipeline<T, M> {
    pub fn new(transcripts: T, model: M, settings: Settings) -> Self {
        let summarizer = Summarizer::new(model, settings.retry.clone(), settings.call_timeout);
        Self {
            transcripts,
            summarizer,
            settings,
        }
    }

    /// Run one request end to end. Never returns an error: failures come back
    /// as a `failed` result carrying the error kind.
    pub async fn summarize(&self, request: &SummaryRequest) -> SummaryResult {
        let language = request.resolved_language();

        let video_id = match extract_video_id(&request.video_url) {
            Ok(id) => id,
            Err(e) => {
                error!("Request failed at {}: kind={} ({e})", Stage::Extract, e.kind());
                return SummaryResult::failed(e.kind(), language);
            }
        };

        info!("Summarizing {video_id} into {language}");
        let deadline = Instant::now() + self.settings.request_timeout;

        match self.run(&video_id, &language, deadline).await {
            Ok(result) => {
                info!(
                    "Summarized {video_id}: status={:?} chunks={} truncated={}",
                    result.status, result.chunks, result.truncated
                );
                result
            }
            Err(StageError { stage, error }) => {
                let kind = error.kind();
                error!("Request for {video_id} failed at {stage}: kind={kind} ({error})");
                SummaryResult::failed(kind, language)
            }
        }
    }

    async fn run(&self, video_id: &VideoId, language: &str, deadline: Instant) -> Result<SummaryResult, StageError> {
        let transcript = self
            .within(deadline, Stage::Fetch, self.transcripts.fetch(video_id, Some(language)))
            .await?;
        debug!(
            "Fetched {} fragments for {video_id} (lang={}, {})",
            transcript.fragments.len(),
            transcript.language,
            transcript.kind
        );

        let normalized = normalize(
            &transcript.fragments,
            Some(transcript.language.as_str()),
            self.settings.max_transcript_chars,
        );
        if normalized.text.is_empty() {
            return Err(StageError {
                stage: Stage::Normalize,
                error: Error::TranscriptUnavailable {
                    video_id: video_id.to_string(),
                    reason: "transcript is empty after normalization".to_string(),
                },
            });
        }

        let chunks = chunk::split(&normalized.text, self.settings.max_chunk_chars);
        debug!("Split {} characters into {} chunk(s)", normalized.length, chunks.len());

        let partials = self
            .within(deadline, Stage::Summarize, self.summarize_chunks(&chunks, language))
            .await?;

        let summary = self
            .within(deadline, Stage::Reduce, reduce(&self.summarizer, partials, language))
            .await?;

        Ok(SummaryResult {
            status: if normalized.truncated {
                Status::Partial
            } else {
                Status::Success
            },
            summary,
            language: language.to_string(),
            title: Some(transcript.title).filter(|t| !t.is_empty()),
            source_language: Some(transcript.language),
            truncated: normalized.truncated,
            chunks: chunks.len(),
            error: None,
        })
    }

    /// Summaries come back in chunk order regardless of completion order.
    /// The first failure stops any further calls.
    async fn summarize_chunks(&self, chunks: &[Chunk], language: &str) -> crate::Result<Vec<String>> {
        let total = chunks.len();
        stream::iter(chunks)
            .map(|chunk| {
                let style = if total == 1 {
                    StyleHint::Whole
                } else {
                    StyleHint::Section {
                        index: chunk.index + 1,
                        total,
                    }
                };
                self.summarizer.summarize(&chunk.text, language, style)
            })
            .buffered(self.settings.max_concurrency.max(1))
            .try_collect::<Vec<String>>()
            .await
    }

    async fn within<F, R>(&self, deadline: Instant, stage: Stage, fut: F) -> Result<R, StageError>
    where
        F: Future<Output = crate::Result<R>>,
    {
        match tokio::time::timeout_at(deadline, fut).await {
            Ok(outcome) => outcome.map_err(StageError::at(stage)),
            Err(_) => Err(StageError {
                stage,
                error: Error::Timeout(self.settings.request_timeout),
            }),
        }
    }
}
