use serde::Serialize;

use crate::{ErrorKind, Status, SummaryResult};

#[derive(Serialize)]
struct SuccessBody<'a> {
    summary: &'a str,
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    status: Status,
    truncated: bool,
    chunks: usize,
    source_language: Option<&'a str>,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: &'static str,
}

#[derive(Serialize)]
struct FailureBody {
    error: ErrorBody,
}

/// Render the result as plain text: the summary, or `error[code]: message`
pub fn render_text(result: &SummaryResult) -> String {
    match result.error {
        Some(kind) => format!("error[{}]: {}", kind.code(), kind.public_message()),
        None if result.truncated => format!(
            "{}\n\n(note: the transcript was too long and only its beginning was summarized)",
            result.summary
        ),
        None => result.summary.clone(),
    }
}

/// Render the result as the JSON response body
pub fn render_json(result: &SummaryResult) -> String {
    let value = match result.error {
        Some(kind) => serde_json::to_value(FailureBody {
            error: ErrorBody {
                code: kind.code(),
                message: kind.public_message(),
            },
        }),
        None => serde_json::to_value(SuccessBody {
            summary: &result.summary,
            language: &result.language,
            title: result.title.as_deref(),
            status: result.status,
            truncated: result.truncated,
            chunks: result.chunks,
            source_language: result.source_language.as_deref(),
        }),
    };
    value
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or_else(|_| internal_error_body())
}

fn internal_error_body() -> String {
    let kind = ErrorKind::InternalError;
    serde_json::json!({ "error": { "code": kind.code(), "message": kind.public_message() } }).to_string()
}
