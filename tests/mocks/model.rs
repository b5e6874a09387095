use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vidsum::summarize::{FailureKind, LanguageModel, Prompt, ProviderFailure};

#[derive(Clone)]
pub struct MockModel {
    pub reply: String,
    pub calls: Arc<Mutex<Vec<Prompt>>>,
    /// Failures returned, in order, before any success
    pub failures: Arc<Mutex<VecDeque<FailureKind>>>,
    /// Fail every merge call with this kind
    pub fail_merge: Option<FailureKind>,
    /// Fail the section with this 1-based index
    pub fail_section: Option<(usize, FailureKind)>,
    /// Later sections answer sooner, to shuffle completion order
    pub reverse_latency: bool,
}

impl MockModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(VecDeque::new())),
            fail_merge: None,
            fail_section: None,
            reverse_latency: false,
        }
    }

    pub fn failing_first(reply: &str, failures: &[FailureKind]) -> Self {
        let model = Self::new(reply);
        model.failures.lock().unwrap().extend(failures.iter().copied());
        model
    }
}

pub fn section_index(prompt: &Prompt) -> Option<usize> {
    prompt
        .system
        .split("section ")
        .nth(1)?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}

pub fn is_merge(prompt: &Prompt) -> bool {
    prompt.user.contains("Intermediate summaries:")
}

impl LanguageModel for MockModel {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderFailure> {
        self.calls.lock().unwrap().push(prompt.clone());

        let scripted = self.failures.lock().unwrap().pop_front();
        if let Some(kind) = scripted {
            return Err(ProviderFailure::new(kind, "scripted failure"));
        }

        if is_merge(prompt) {
            if let Some(kind) = self.fail_merge {
                return Err(ProviderFailure::new(kind, "scripted merge failure"));
            }
            return Ok(format!("merged: {}", self.reply));
        }

        match section_index(prompt) {
            Some(index) => {
                if let Some((_, kind)) = self.fail_section.filter(|(failing, _)| *failing == index) {
                    return Err(ProviderFailure::new(kind, "scripted section failure"));
                }
                if self.reverse_latency {
                    let wait = 60u64.saturating_sub(index as u64 * 10);
                    tokio::time::sleep(Duration::from_millis(wait)).await;
                }
                Ok(format!("<section {index}>"))
            }
            None => Ok(self.reply.clone()),
        }
    }
}
