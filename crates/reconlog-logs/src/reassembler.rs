/// Token that opens a multi-line error block
const BLOCK_OPEN: &[u8] = b"err=<";

/// Byte that closes a multi-line error block
const BLOCK_CLOSE: u8 = b'>';

/// Physical lines an open block may hold before it is flushed as-is
const DEFAULT_MAX_FRAGMENTS: usize = 1024;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum State {
    #[default]
    Idle,
    Collecting,
}

/// Joins klog `err=<` continuation blocks back into one logical line
///
/// klog prints multi-line error values as `err=<` followed by indented lines
/// and a closing `>`. Lines outside such a block pass straight through.
/// Works on raw bytes so lines that are not UTF-8 survive untouched.
#[derive(Debug)]
pub struct Reassembler {
    state: State,

    /// Partial logical line while collecting
    buffer: Vec<u8>,

    /// Physical lines in the current buffer
    fragments: usize,

    /// Flush an unclosed block once it reaches this many lines
    max_fragments: usize,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::with_max_fragments(DEFAULT_MAX_FRAGMENTS)
    }
}

impl Reassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reassembler that gives up on a block after `max_fragments` lines
    pub fn with_max_fragments(max_fragments: usize) -> Self {
        Self {
            state: State::Idle,
            buffer: Vec::new(),
            fragments: 0,
            max_fragments: max_fragments.max(1),
        }
    }

    /// Feed one physical line (without terminator), returning a logical line
    /// once one is complete
    pub fn push(&mut self, line: &[u8]) -> Option<Vec<u8>> {
        match self.state {
            State::Idle => {
                if contains(line, BLOCK_OPEN) && !line.contains(&BLOCK_CLOSE) {
                    self.state = State::Collecting;
                    self.buffer = line.to_vec();
                    self.fragments = 1;
                    self.flush_if_full()
                } else {
                    Some(line.to_vec())
                }
            }
            State::Collecting => {
                self.buffer.push(b' ');
                self.buffer.extend_from_slice(line.trim_ascii());
                self.fragments += 1;

                if line.contains(&BLOCK_CLOSE) {
                    tracing::debug!(lines = self.fragments, "reassembled error block");
                    Some(self.take())
                } else {
                    self.flush_if_full()
                }
            }
        }
    }

    /// Whether an error block is open
    pub fn is_collecting(&self) -> bool {
        self.state == State::Collecting
    }

    /// Take whatever partial block is still buffered at end of input
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        if !self.is_collecting() {
            return None;
        }
        tracing::debug!(lines = self.fragments, "unterminated error block at end of input");
        Some(self.take())
    }

    fn flush_if_full(&mut self) -> Option<Vec<u8>> {
        if self.fragments < self.max_fragments {
            return None;
        }
        tracing::warn!(
            lines = self.fragments,
            "error block never closed, flushing it as one line"
        );
        Some(self.take())
    }

    fn take(&mut self) -> Vec<u8> {
        self.state = State::Idle;
        self.fragments = 0;
        std::mem::take(&mut self.buffer)
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &[u8]) -> Option<Vec<u8>> {
        Some(s.to_vec())
    }

    #[test]
    fn test_plain_lines_pass_through() {
        let mut r = Reassembler::new();
        assert_eq!(r.push(b"first"), some(b"first"));
        assert_eq!(r.push(b"  second  "), some(b"  second  "));
        assert!(!r.is_collecting());
    }

    #[test]
    fn test_single_line_block_is_not_collected() {
        let mut r = Reassembler::new();
        let line = br#"E0101 12:00:00.000000 1 x.go:1] "m" err=<boom>"#;
        assert_eq!(r.push(line), some(line));
    }

    #[test]
    fn test_two_line_block() {
        let mut r = Reassembler::new();
        assert_eq!(r.push(b"level... err=<line1"), None);
        assert!(r.is_collecting());
        assert_eq!(
            r.push(b"continuation> rest"),
            some(b"level... err=<line1 continuation> rest")
        );
        assert!(!r.is_collecting());
    }

    #[test]
    fn test_indented_block() {
        let mut r = Reassembler::new();
        assert_eq!(r.push(br#"E0101 12:00:00.000000 1 x.go:1] "Reconciler error" err=<"#), None);
        assert_eq!(r.push(b"\tfailed to create machine:"), None);
        assert_eq!(r.push(b"\t  quota exceeded   "), None);
        assert_eq!(
            r.push(br#" > controller="machine""#),
            some(br#"E0101 12:00:00.000000 1 x.go:1] "Reconciler error" err=< failed to create machine: quota exceeded > controller="machine""#)
        );
        assert_eq!(r.push(b"next"), some(b"next"));
    }

    #[test]
    fn test_block_keeps_non_utf8_bytes() {
        let mut r = Reassembler::new();
        assert_eq!(r.push(b"a err=<caf\xe9"), None);
        assert_eq!(r.push(b"  \xff end>"), some(b"a err=<caf\xe9 \xff end>"));
    }

    #[test]
    fn test_finish() {
        let mut r = Reassembler::new();
        assert_eq!(r.finish(), None);

        r.push(b"a err=<");
        r.push(b"b");
        assert_eq!(r.finish(), some(b"a err=< b"));
        assert!(!r.is_collecting());
        assert_eq!(r.finish(), None);
    }

    #[test]
    fn test_unclosed_block_is_capped() {
        let mut r = Reassembler::with_max_fragments(3);
        assert_eq!(r.push(b"a err=<"), None);
        assert_eq!(r.push(b"b"), None);
        assert_eq!(r.push(b"c"), some(b"a err=< b c"));
        assert!(!r.is_collecting());

        // the stream carries on normally after the flush
        assert_eq!(r.push(b"d"), some(b"d"));
        assert_eq!(r.finish(), None);
    }
}
