//! Pure transform from upstream event-stream bytes to text fragments.
//! No I/O happens here; the service layer feeds chunks in as they arrive.

pub mod decoder;
pub mod parser;

use decoder::{LineSplitter, Utf8Decoder};
use parser::{parse_line, ParsedLine};

#[derive(Debug, Default)]
pub struct FragmentExtractor {
    decoder: Utf8Decoder,
    lines: LineSplitter,
    ignored: usize,
    saw_sentinel: bool,
}

impl FragmentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one upstream chunk and returns the fragments it completed, in
    /// stream order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let text = self.decoder.decode(chunk);
        let lines = self.lines.push(&text);
        self.collect(lines)
    }

    /// Drains the held-back bytes and the unterminated last line.
    pub fn finish(&mut self) -> Vec<String> {
        let text = self.decoder.finish();
        let mut lines = self.lines.push(&text);
        lines.extend(self.lines.finish());
        self.collect(lines)
    }

    pub fn ignored_lines(&self) -> usize {
        self.ignored
    }

    pub fn saw_sentinel(&self) -> bool {
        self.saw_sentinel
    }

    fn collect(&mut self, lines: Vec<String>) -> Vec<String> {
        let mut fragments = Vec::new();
        for line in lines {
            match parse_line(&line) {
                ParsedLine::Fragment(text) => fragments.push(text),
                ParsedLine::Sentinel => self.saw_sentinel = true,
                ParsedLine::Ignored => {
                    if !line.is_empty() {
                        self.ignored += 1;
                    }
                }
            }
        }
        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta_line(text: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({ "choices": [{ "delta": { "content": text } }] })
        )
    }

    fn extract_all(chunks: &[&[u8]]) -> String {
        let mut extractor = FragmentExtractor::new();
        let mut out = String::new();
        for chunk in chunks {
            out.extend(extractor.push(chunk));
        }
        out.extend(extractor.finish());
        out
    }

    #[test]
    fn hello_scenario() {
        let body = format!("{}{}data: [DONE]\n\n", delta_line("Hel"), delta_line("lo"));
        let mut extractor = FragmentExtractor::new();
        assert_eq!(extractor.push(body.as_bytes()), vec!["Hel", "lo"]);
        assert!(extractor.finish().is_empty());
        assert!(extractor.saw_sentinel());
    }

    #[test]
    fn order_is_preserved_for_any_chunking() {
        let deltas = ["The ", "quick ", "brown ", "fox", " — ", "狐", "🦊"];
        let body: String = deltas.iter().map(|d| delta_line(d)).collect::<String>() + "data: [DONE]\n";
        let bytes = body.as_bytes();
        let expected = deltas.concat();

        for size in [1, 2, 3, 5, 7, 13, 64, bytes.len()] {
            let chunks: Vec<&[u8]> = bytes.chunks(size).collect();
            assert_eq!(extract_all(&chunks), expected, "chunk size {size}");
        }
    }

    #[test]
    fn malformed_line_does_not_stop_later_lines() {
        let body = format!("{}data: {{not valid json\n{}", delta_line("a"), delta_line("b"));
        let mut extractor = FragmentExtractor::new();
        assert_eq!(extractor.push(body.as_bytes()), vec!["a", "b"]);
        assert_eq!(extractor.ignored_lines(), 1);
    }

    #[test]
    fn sentinel_emits_nothing() {
        let mut extractor = FragmentExtractor::new();
        assert!(extractor.push(b"data: [DONE]\n").is_empty());
        assert!(extractor.finish().is_empty());
        assert_eq!(extractor.ignored_lines(), 0);
    }

    #[test]
    fn unterminated_last_line_is_processed_at_finish() {
        let line = delta_line("tail");
        let unterminated = line.trim_end();
        let mut extractor = FragmentExtractor::new();
        assert!(extractor.push(unterminated.as_bytes()).is_empty());
        assert_eq!(extractor.finish(), vec!["tail"]);
    }

    #[test]
    fn multibyte_split_inside_json_payload() {
        let body = delta_line("é");
        let bytes = body.as_bytes();
        let split = body.find('é').unwrap() + 1;
        assert_eq!(extract_all(&[&bytes[..split], &bytes[split..]]), "é");
    }

    #[test]
    fn runaway_line_is_skipped_and_stream_recovers() {
        let mut extractor = FragmentExtractor::new();
        let filler = vec![b'a'; decoder::MAX_LINE_LEN + 1];
        assert!(extractor.push(b"data: ").is_empty());
        assert!(extractor.push(&filler).is_empty());
        let rest = format!("\n{}", delta_line("after"));
        assert_eq!(extractor.push(rest.as_bytes()), vec!["after"]);
        assert!(extractor.finish().is_empty());
    }
}
