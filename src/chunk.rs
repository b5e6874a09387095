use log::warn;
use serde::Serialize;

/// A contiguous slice of the normalized transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
    /// Cost in characters
    pub cost: usize,
    /// Cut mid-word because no boundary fit the budget
    pub forced: bool,
}

/// Cost of a piece of text. Characters stand in for tokens.
pub fn cost(text: &str) -> usize {
    text.chars().count()
}

/// Split `text` into ordered chunks of at most `max_cost` characters.
///
/// Each chunk ends at the last sentence or paragraph break that fits the
/// budget. A break in the first half of the window is ignored in favour of the
/// last word boundary, so a short sentence early on does not produce a tiny
/// chunk. A run with no whitespace at all is cut at the character limit.
pub fn split(text: &str, max_cost: usize) -> Vec<Chunk> {
    let max_cost = max_cost.max(1);
    let mut chunks = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        let (piece, remainder, forced) = match rest.char_indices().nth(max_cost) {
            None => (rest, "", false),
            Some((limit, _)) => {
                let (cut, forced) = find_cut(rest, limit);
                (rest[..cut].trim_end(), &rest[cut..], forced)
            }
        };

        if forced {
            warn!(
                "Chunk {} force-split at {max_cost} characters: no boundary in window",
                chunks.len()
            );
        }

        chunks.push(Chunk {
            index: chunks.len(),
            text: piece.to_string(),
            cost: cost(piece),
            forced,
        });
        rest = remainder.trim_start();
    }

    chunks
}

/// Byte offset to cut `rest` at, given `limit` is the byte offset of the first
/// character past the budget. `rest` starts with a non-whitespace character.
fn find_cut(rest: &str, limit: usize) -> (usize, bool) {
    let window = &rest[..limit];

    if let Some(cut) = sentence_break(rest, window).filter(|&cut| cut > limit / 2) {
        return (cut, false);
    }
    if let Some(cut) = word_break(rest, window) {
        return (cut, false);
    }
    (limit, true)
}

fn sentence_break(rest: &str, window: &str) -> Option<usize> {
    let terminal = window.char_indices().rev().find_map(|(i, c)| {
        if !matches!(c, '.' | '!' | '?' | '…') {
            return None;
        }
        let end = i + c.len_utf8();
        rest[end..].chars().next().filter(|n| n.is_whitespace()).map(|_| end)
    });
    let paragraph = window.rfind("\n\n").filter(|&i| i > 0);

    terminal.max(paragraph)
}

fn word_break(rest: &str, window: &str) -> Option<usize> {
    if rest[window.len()..].starts_with(char::is_whitespace) {
        return Some(window.len());
    }
    window.rfind(char::is_whitespace).filter(|&i| i > 0)
}
