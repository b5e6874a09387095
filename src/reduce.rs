use log::debug;

use crate::summarize::{LanguageModel, StyleHint, Summarizer};
use crate::{Error, Result};

pub const SECTION_SEPARATOR: &str = "\n\n=== Next Section ===\n\n";

/// Combine ordered section summaries into one.
///
/// A single summary is returned unchanged; several are merged by one more
/// model call that keeps their order.
pub async fn reduce<M: LanguageModel>(
    summarizer: &Summarizer<M>,
    mut summaries: Vec<String>,
    target_language: &str,
) -> Result<String> {
    match summaries.len() {
        0 => Err(Error::Internal("nothing to reduce".to_string())),
        1 => Ok(summaries.remove(0)),
        n => {
            debug!("Merging {n} section summaries");
            let combined = summaries.join(SECTION_SEPARATOR);
            summarizer.summarize(&combined, target_language, StyleHint::Merge).await
        }
    }
}
