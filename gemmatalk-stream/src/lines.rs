//! Line reassembly across transport chunk boundaries.

use gemmatalk_types::Line;

/// Accumulates raw chunks and yields complete lines in arrival order.
///
/// Splitting happens on the `\n` byte before UTF-8 decoding, so a multi-byte
/// character split across two chunks is reassembled intact. A trailing `\r`
/// is dropped from every line.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
    /// Bytes at the front of `buf` already known to contain no newline.
    scanned: usize,
}

impl LineBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Line> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        let mut cursor = self.scanned;
        while let Some(offset) = self.buf[cursor..].iter().position(|&b| b == b'\n') {
            let end = cursor + offset;
            lines.push(Line::complete(decode_line(&self.buf[start..end])));
            start = end + 1;
            cursor = start;
        }

        self.buf.drain(..start);
        self.scanned = self.buf.len();
        lines
    }

    /// Flush the unterminated tail at end of stream, if any.
    pub fn finish(&mut self) -> Option<Line> {
        self.scanned = 0;
        if self.buf.is_empty() {
            return None;
        }
        let text = decode_line(&self.buf);
        self.buf.clear();
        Some(Line::partial(text))
    }

    /// Number of buffered bytes not yet part of a complete line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
