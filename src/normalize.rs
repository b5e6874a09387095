use std::sync::LazyLock;

use log::info;
use regex::Regex;
use serde::Serialize;

use crate::TranscriptFragment;

// Caption-only artifacts. Kept narrow so spoken text in brackets survives.
static ARTIFACTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        \[\s*(?:music|applause|laughter|laughs|cheering|cheers|inaudible|silence|noise|
              background\ noise|foreign|blank_audio|no\ audio|crosstalk|sighs|coughs)\s*\]
        | \(\s*(?:music|applause|laughter|laughs|inaudible)\s*\)
        | \[\s*speaker(?:[\s_]*\d+)?\s*\]:?
        | (?-i:\[\s*[A-Z][A-Z\ .'-]{0,30}\s*\]:)
        | >>
        | [♪♫]+",
    )
    .unwrap()
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Plain-text transcript ready for the model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTranscript {
    pub text: String,
    pub language: Option<String>,
    /// Length of `text` in characters
    pub length: usize,
    pub truncated: bool,
    /// Length in characters before truncation
    pub original_length: usize,
}

/// Join fragments in timestamp order, strip caption artifacts, collapse
/// whitespace, and keep at most `max_chars` characters.
pub fn normalize(fragments: &[TranscriptFragment], language: Option<&str>, max_chars: usize) -> NormalizedTranscript {
    let mut ordered: Vec<&TranscriptFragment> = fragments.iter().collect();
    // Stable sort keeps provider order for equal timestamps.
    ordered.sort_by(|a, b| a.start.total_cmp(&b.start));

    let joined = ordered.iter().map(|f| f.text.as_str()).collect::<Vec<_>>().join(" ");
    let stripped = ARTIFACTS.replace_all(&joined, " ");
    let text = WHITESPACE.replace_all(&stripped, " ").trim().to_string();

    let original_length = text.chars().count();
    let (text, truncated) = truncate(text, max_chars);
    if truncated {
        info!("Transcript truncated from {original_length} to {max_chars} characters");
    }

    NormalizedTranscript {
        length: text.chars().count(),
        text,
        language: language.map(str::to_string),
        truncated,
        original_length,
    }
}

fn truncate(text: String, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (text[..byte_idx].trim_end().to_string(), true),
        None => (text, false),
    }
}
