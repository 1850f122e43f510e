/// Assembles lines out of arbitrarily chunked worker output.
///
/// A line is complete once `\n` is seen; it is returned with trailing whitespace removed
/// (a TTY terminates lines with `\r\n`). Bytes after the last terminator stay pending until
/// more output arrives. Pending bytes are never turned into a line on their own: callers
/// [`discard`](LineFramer::discard) them when the stream ends or shutdown interrupts it.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Pop the next complete line, if any.
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.buf.iter().position(|b| *b == b'\n')?;
        let raw: Vec<u8> = self.buf.drain(..=end).collect();
        Some(String::from_utf8_lossy(&raw).trim_end().to_string())
    }

    /// Bytes buffered without a terminator.
    #[inline]
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Drop the unterminated tail, returning how many bytes were lost.
    pub fn discard(&mut self) -> usize {
        let n = self.buf.len();
        self.buf.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(f: &mut LineFramer) -> Vec<String> {
        std::iter::from_fn(|| f.next_line()).collect()
    }

    #[test]
    fn lines_span_chunks() {
        let mut f = LineFramer::new();
        let mut out = Vec::new();
        for chunk in ["ab", "c\nde", "f\n"] {
            f.push(chunk.as_bytes());
            out.extend(drain(&mut f));
        }
        assert_eq!(out, vec!["abc", "def"]);
        assert_eq!(f.pending(), 0);
    }

    #[test]
    fn several_lines_in_one_chunk() {
        let mut f = LineFramer::new();
        f.push(b"one\r\ntwo\n\nthree");
        assert_eq!(drain(&mut f), vec!["one", "two", ""]);
        assert_eq!(f.pending(), "three".len());
    }

    #[test]
    fn partial_tail_is_never_emitted() {
        let mut f = LineFramer::new();
        f.push(b"partial");
        assert!(f.next_line().is_none());
        assert_eq!(f.discard(), 7);
        assert!(f.next_line().is_none());
    }

    #[test]
    fn multibyte_char_split_across_chunks() {
        let bytes = "grüße\n".as_bytes();
        let mut f = LineFramer::new();
        f.push(&bytes[..3]);
        assert!(f.next_line().is_none());
        f.push(&bytes[3..]);
        assert_eq!(f.next_line().as_deref(), Some("grüße"));
    }
}
