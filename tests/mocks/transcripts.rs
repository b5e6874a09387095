use std::sync::{Arc, Mutex};
use std::time::Duration;

use vidsum::youtube::TranscriptProvider;
use vidsum::{Error, Result, TrackKind, Transcript, TranscriptFragment, VideoId};

#[derive(Clone)]
pub enum Outcome {
    Fragments(Vec<TranscriptFragment>),
    NotFound,
    Unavailable,
    ProviderDown,
}

#[derive(Clone)]
pub struct MockTranscripts {
    pub outcome: Outcome,
    pub language: String,
    pub delay: Option<Duration>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockTranscripts {
    pub fn with_text(language: &str, text: &str) -> Self {
        let fragments = text
            .split_inclusive(". ")
            .enumerate()
            .map(|(i, sentence)| TranscriptFragment {
                text: sentence.to_string(),
                start: i as f64 * 2.0,
                duration: 2.0,
            })
            .collect();
        Self::new(Outcome::Fragments(fragments), language)
    }

    pub fn failing(outcome: Outcome) -> Self {
        Self::new(outcome, "en")
    }

    fn new(outcome: Outcome, language: &str) -> Self {
        Self {
            outcome,
            language: language.to_string(),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl TranscriptProvider for MockTranscripts {
    async fn fetch(&self, video_id: &VideoId, _preferred_language: Option<&str>) -> Result<Transcript> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.outcome {
            Outcome::Fragments(fragments) => Ok(Transcript {
                video_id: video_id.clone(),
                title: "Mock video".to_string(),
                language: self.language.clone(),
                kind: TrackKind::Manual,
                fragments: fragments.clone(),
            }),
            Outcome::NotFound => Err(Error::VideoNotFound {
                video_id: video_id.to_string(),
                reason: "Video unavailable".to_string(),
            }),
            Outcome::Unavailable => Err(Error::TranscriptUnavailable {
                video_id: video_id.to_string(),
                reason: "captions disabled".to_string(),
            }),
            Outcome::ProviderDown => Err(Error::Provider("connection refused".to_string())),
        }
    }
}
