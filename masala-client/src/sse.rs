//! Incremental SSE frame parser
//!
//! Accumulates raw bytes and yields the `data:` payload of each complete
//! frame (frames are separated by a blank line). Comment lines and
//! non-data fields are ignored; multi-line data is joined with `\n`.

/// Incremental parser over a byte stream
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk; returns the data payloads of every frame completed
    /// by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut payloads = Vec::new();
        while let Some((frame, rest_at)) = next_frame(&self.buffer) {
            if let Some(data) = parse_frame(&frame) {
                payloads.push(data);
            }
            self.buffer.drain(..rest_at);
        }
        payloads
    }
}

/// Find the next complete frame; returns (frame text, index past the
/// separator). Accepts both `\n\n` and `\r\n\r\n` separators.
fn next_frame(buffer: &str) -> Option<(String, usize)> {
    let lf = buffer.find("\n\n").map(|i| (i, 2));
    let crlf = buffer.find("\r\n\r\n").map(|i| (i, 4));
    let (idx, sep_len) = match (lf, crlf) {
        (Some(a), Some(b)) => {
            if a.0 <= b.0 {
                a
            } else {
                b
            }
        }
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };
    Some((buffer[..idx].to_string(), idx + sep_len))
}

/// Extract the joined data payload of one frame, if any
fn parse_frame(frame: &str) -> Option<String> {
    let mut data_lines: Vec<&str> = Vec::new();
    for line in frame.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(rest) = line.strip_prefix("data:") {
            data_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
        // event:/id:/retry: fields and `:` comments are ignored
    }
    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_frame() {
        let mut parser = SseParser::new();
        let out = parser.push(b"data: {\"type\":\"heartbeat\"}\n\n");
        assert_eq!(out, vec!["{\"type\":\"heartbeat\"}"]);
    }

    #[test]
    fn frame_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"data: {\"type\":").is_empty());
        let out = parser.push(b"\"connected\"}\n\n");
        assert_eq!(out, vec!["{\"type\":\"connected\"}"]);
    }

    #[test]
    fn multiple_frames_in_one_chunk() {
        let mut parser = SseParser::new();
        let out = parser.push(b"data: 1\n\ndata: 2\n\ndata: 3\n\n");
        assert_eq!(out, vec!["1", "2", "3"]);
    }

    #[test]
    fn comments_and_other_fields_are_ignored() {
        let mut parser = SseParser::new();
        let out = parser.push(b": keep-alive\n\nevent: noise\nid: 7\ndata: x\n\n");
        assert_eq!(out, vec!["x"]);
    }

    #[test]
    fn crlf_separators() {
        let mut parser = SseParser::new();
        let out = parser.push(b"data: a\r\n\r\ndata: b\r\n\r\n");
        assert_eq!(out, vec!["a", "b"]);
    }

    #[test]
    fn multi_line_data_is_joined() {
        let mut parser = SseParser::new();
        let out = parser.push(b"data: first\ndata: second\n\n");
        assert_eq!(out, vec!["first\nsecond"]);
    }
}
