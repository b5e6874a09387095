use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;

use crate::{Error, FailureReason, Result};

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// System and user messages for one completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// What kind of summary the model is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleHint {
    /// The whole transcript fits in one call
    Whole,
    /// One section of a longer transcript, 1-based
    Section { index: usize, total: usize },
    /// Merge section summaries into one
    Merge,
}

pub fn build_prompt(text: &str, target_language: &str, style: StyleHint) -> Prompt {
    match style {
        StyleHint::Whole => Prompt {
            system: format!(
                "You are an expert content summarizer. Write a clear, concise summary of the \
                 video transcript in the language with code \"{target_language}\", whatever \
                 language the transcript is in. Capture the key points, main arguments and \
                 important details. Use bullet points for key takeaways."
            ),
            user: format!("Summarize the following transcript:\n\n{text}"),
        },
        StyleHint::Section { index, total } => Prompt {
            system: format!(
                "You are an expert content summarizer. Create a detailed summary of section \
                 {index} of {total} in the language with code \"{target_language}\". Maintain \
                 important details, arguments, and connections. This summary will later be \
                 part of a comprehensive final summary."
            ),
            user: format!(
                "Summarize the following section:\n\
                 - Include key topics, arguments, examples\n\
                 - Ensure logical flow and clarity\n\n\
                 Text: {text}"
            ),
        },
        StyleHint::Merge => Prompt {
            system: format!(
                "You are an expert summarizer. Create a well-structured summary in the language \
                 with code \"{target_language}\" from the provided intermediate summaries, which \
                 are in chronological order. Keep that order and ensure logical connections."
            ),
            user: format!(
                "Summarize comprehensively:\n\
                 - Keep key points and logical flow\n\
                 - Make it understandable for someone unfamiliar with the content\n\
                 - Highlight any action items\n\n\
                 Intermediate summaries:\n{text}"
            ),
        },
    }
}

/// Provider failure, classified at the HTTP boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    RateLimited,
    Timeout,
    ServerError,
    InvalidRequest,
    Unauthorized,
    PolicyRejected,
    Malformed,
}

impl FailureKind {
    pub fn reason(&self) -> FailureReason {
        match self {
            FailureKind::RateLimited => FailureReason::RateLimited,
            FailureKind::Timeout => FailureReason::Timeout,
            FailureKind::PolicyRejected => FailureReason::PolicyRejected,
            FailureKind::ServerError
            | FailureKind::InvalidRequest
            | FailureKind::Unauthorized
            | FailureKind::Malformed => FailureReason::ProviderError,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct ProviderFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ProviderFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A hosted model that turns a prompt into text
pub trait LanguageModel {
    fn complete(&self, prompt: &Prompt) -> impl Future<Output = std::result::Result<String, ProviderFailure>> + Send;
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Chat completions endpoint speaking the OpenAI wire format (Groq by default)
#[derive(Debug, Clone)]
pub struct OpenAiCompatible {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiCompatible {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 8000,
        }
    }

    pub fn with_api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }
}

impl LanguageModel for OpenAiCompatible {
    async fn complete(&self, prompt: &Prompt) -> std::result::Result<String, ProviderFailure> {
        debug!("Summarizing via {} with model {}", self.api_base, self.model);

        let body = serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "messages": [
                {
                    "role": "system",
                    "content": prompt.system
                },
                {
                    "role": "user",
                    "content": prompt.user
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderFailure::new(
                classify_status(status.as_u16(), &body),
                format!("model API returned {status}: {body}"),
            ));
        }

        let completion: ChatCompletion = resp
            .json()
            .await
            .map_err(|e| ProviderFailure::new(FailureKind::Malformed, e.to_string()))?;
        extract_text(completion)
    }
}

fn classify_transport(e: reqwest::Error) -> ProviderFailure {
    let kind = if e.is_timeout() {
        FailureKind::Timeout
    } else if e.is_builder() {
        FailureKind::InvalidRequest
    } else {
        FailureKind::ServerError
    };
    ProviderFailure::new(kind, e.to_string())
}

fn classify_status(status: u16, body: &str) -> FailureKind {
    match status {
        429 => FailureKind::RateLimited,
        408 | 504 => FailureKind::Timeout,
        401 | 403 => FailureKind::Unauthorized,
        400..=499 if is_policy_rejection(body) => FailureKind::PolicyRejected,
        500..=599 => FailureKind::ServerError,
        _ => FailureKind::InvalidRequest,
    }
}

fn is_policy_rejection(body: &str) -> bool {
    let body = body.to_lowercase();
    ["content_policy", "content_filter", "policy_violation", "safety"]
        .iter()
        .any(|marker| body.contains(marker))
}

fn extract_text(completion: ChatCompletion) -> std::result::Result<String, ProviderFailure> {
    let Some(choice) = completion.choices.into_iter().next() else {
        return Err(ProviderFailure::new(FailureKind::Malformed, "response had no choices"));
    };

    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(ProviderFailure::new(
            FailureKind::PolicyRejected,
            "completion stopped by content filter",
        ));
    }

    match choice.message.and_then(|m| m.content) {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(ProviderFailure::new(FailureKind::Malformed, "response had no text")),
    }
}

/// Which failures are retried, how often, and how long to wait
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub retryable: Vec<FailureKind>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            retryable: vec![FailureKind::RateLimited, FailureKind::Timeout, FailureKind::ServerError],
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable(&self, kind: FailureKind) -> bool {
        self.retryable.contains(&kind)
    }

    /// Delay after the given zero-based attempt
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Summarization client: prompt building, per-call timeout, and retries
#[derive(Debug, Clone)]
pub struct Summarizer<M> {
    model: M,
    policy: RetryPolicy,
    call_timeout: Duration,
}

impl<M: LanguageModel> Summarizer<M> {
    pub fn new(model: M, policy: RetryPolicy, call_timeout: Duration) -> Self {
        Self {
            model,
            policy,
            call_timeout,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub async fn summarize(&self, text: &str, target_language: &str, style: StyleHint) -> Result<String> {
        let prompt = build_prompt(text, target_language, style);
        self.complete_with_retry(&prompt).await.map_err(|failure| Error::Summarization {
            reason: failure.kind.reason(),
            message: failure.message,
        })
    }

    async fn complete_with_retry(&self, prompt: &Prompt) -> std::result::Result<String, ProviderFailure> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            let outcome = match tokio::time::timeout(self.call_timeout, self.model.complete(prompt)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ProviderFailure::new(
                    FailureKind::Timeout,
                    format!("no response within {:?}", self.call_timeout),
                )),
            };

            match outcome {
                Ok(text) => return Ok(text),
                Err(failure) if self.policy.is_retryable(failure.kind) && attempt + 1 < max_attempts => {
                    let delay = self.policy.delay(attempt);
                    debug!("Attempt {} failed: {failure}, retrying in {delay:?}", attempt + 1);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => {
                    warn!("Summarization failed after {} attempt(s): {failure}", attempt + 1);
                    return Err(failure);
                }
            }
        }
    }
}
