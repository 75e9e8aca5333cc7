//! Incremental text decoding for the upstream byte stream.
//!
//! Upstream chunks arrive at arbitrary byte boundaries, so both a UTF-8
//! sequence and an event line may be split between two reads. Each stage
//! here carries the incomplete tail over to the next call.

use tracing::warn;

/// Longest unterminated line kept while waiting for its `\n`.
pub const MAX_LINE_LEN: usize = 1 << 20;

/// Streaming UTF-8 decoder. Incomplete trailing sequences are held back until
/// the next chunk; invalid bytes become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::with_capacity(self.pending.len());

        loop {
            let (valid, invalid_len) = match std::str::from_utf8(&self.pending) {
                Ok(_) => (self.pending.len(), None),
                Err(e) => (e.valid_up_to(), e.error_len()),
            };
            out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));

            match invalid_len {
                // Everything decoded, or only an incomplete sequence remains.
                None => {
                    self.pending.drain(..valid);
                    break;
                }
                Some(len) => {
                    out.push(char::REPLACEMENT_CHARACTER);
                    self.pending.drain(..valid + len);
                }
            }
        }

        out
    }

    /// Flushes whatever is still held back. A truncated sequence at end of
    /// stream decodes to U+FFFD.
    pub fn finish(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }
}

/// Splits decoded text into lines, keeping a partial last line buffered.
/// Both `\n` and `\r\n` terminators are accepted. A line that outgrows the
/// limit is dropped whole, up to and including its terminator.
#[derive(Debug)]
pub struct LineSplitter {
    partial: String,
    limit: usize,
    overflowed: bool,
}

impl Default for LineSplitter {
    fn default() -> Self {
        Self::with_limit(MAX_LINE_LEN)
    }
}

impl LineSplitter {
    pub fn with_limit(limit: usize) -> Self {
        Self { partial: String::new(), limit, overflowed: false }
    }

    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.partial.push_str(text);

        let mut lines = Vec::new();
        while let Some(pos) = self.partial.find('\n') {
            let mut line: String = self.partial.drain(..=pos).collect();
            if std::mem::take(&mut self.overflowed) {
                continue;
            }
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            lines.push(line);
        }

        if self.partial.len() > self.limit {
            warn!(len = self.partial.len(), "Discarding over-long upstream line");
            self.partial.clear();
            self.overflowed = true;
        }
        lines
    }

    /// Returns the unterminated last line, if any.
    pub fn finish(&mut self) -> Option<String> {
        if std::mem::take(&mut self.overflowed) {
            self.partial.clear();
            return None;
        }
        if self.partial.is_empty() {
            return None;
        }
        let mut line = std::mem::take(&mut self.partial);
        if line.ends_with('\r') {
            line.pop();
        }
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multibyte_char_split_across_chunks() {
        let bytes = "héllo 🌍".as_bytes();
        // 'é' is two bytes starting at index 1; the globe is four bytes at the end.
        let mut decoder = Utf8Decoder::default();
        let mut out = decoder.decode(&bytes[..2]);
        assert_eq!(out, "h");
        out.push_str(&decoder.decode(&bytes[2..bytes.len() - 2]));
        assert_eq!(out, "héllo ");
        out.push_str(&decoder.decode(&bytes[bytes.len() - 2..]));
        assert_eq!(out, "héllo 🌍");
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn byte_at_a_time_decoding() {
        let text = "日本語のテキスト";
        let mut decoder = Utf8Decoder::default();
        let decoded: String = text.as_bytes().iter().map(|b| decoder.decode(&[*b])).collect();
        assert_eq!(decoded, text);
    }

    #[test]
    fn invalid_bytes_are_replaced() {
        let mut decoder = Utf8Decoder::default();
        assert_eq!(decoder.decode(b"a\xffb"), "a\u{FFFD}b");
    }

    #[test]
    fn truncated_sequence_at_end_is_replaced() {
        let mut decoder = Utf8Decoder::default();
        assert_eq!(decoder.decode(&"é".as_bytes()[..1]), "");
        assert_eq!(decoder.finish(), "\u{FFFD}");
    }

    #[test]
    fn lines_are_completed_across_pushes() {
        let mut splitter = LineSplitter::default();
        assert!(splitter.push("data: {\"a\"").is_empty());
        assert_eq!(splitter.push(":1}\n\ndata: x"), vec!["data: {\"a\":1}", ""]);
        assert_eq!(splitter.finish().as_deref(), Some("data: x"));
        assert_eq!(splitter.finish(), None);
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let mut splitter = LineSplitter::default();
        assert_eq!(splitter.push("one\r\ntwo\r"), vec!["one"]);
        assert_eq!(splitter.push("\n"), vec!["two"]);
    }

    #[test]
    fn over_long_line_is_dropped_through_its_terminator() {
        let mut splitter = LineSplitter::with_limit(8);
        assert!(splitter.push("data: 0123456789").is_empty());
        assert!(splitter.push("abcdef").is_empty());
        assert_eq!(splitter.push("xyz\ndata: ok\n"), vec!["data: ok"]);
        assert_eq!(splitter.finish(), None);
    }

    #[test]
    fn over_long_unterminated_tail_is_not_flushed() {
        let mut splitter = LineSplitter::with_limit(4);
        assert!(splitter.push("abcdefgh").is_empty());
        assert_eq!(splitter.finish(), None);
    }
}
