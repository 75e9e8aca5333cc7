use crate::models::UpstreamChunk;

pub const DATA_PREFIX: &str = "data: ";
pub const DONE_SENTINEL: &str = "[DONE]";

/// Outcome of interpreting one upstream event line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Non-empty text at `choices[0].delta.content`.
    Fragment(String),
    /// Blank lines, comments, other fields, malformed JSON, empty deltas.
    Ignored,
    /// `data: [DONE]`.
    Sentinel,
}

pub fn parse_line(line: &str) -> ParsedLine {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return ParsedLine::Ignored;
    };

    if payload.trim_end() == DONE_SENTINEL {
        return ParsedLine::Sentinel;
    }

    match serde_json::from_str::<UpstreamChunk>(payload) {
        Ok(chunk) => match chunk.first_delta() {
            Some(text) if !text.is_empty() => ParsedLine::Fragment(text),
            _ => ParsedLine::Ignored,
        },
        Err(e) => {
            tracing::trace!("Skipping malformed upstream line: {e}");
            ParsedLine::Ignored
        }
    }
}
