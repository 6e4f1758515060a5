use regex::Regex;

// @module: Sequential scanner over a single line of text

/// A cursor-based scanner over one line.
///
/// This is the explicit state machine behind all structural parsing in the
/// replacer: skips must match exactly at the cursor, and the unconsumed
/// remainder is always addressable. Keeping the cursor explicit makes skip
/// failures visible instead of silently matching tag syntax.
#[derive(Debug)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Current cursor position in bytes.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Advance past a match anchored at the cursor. Returns false (and does
    /// not move) when the pattern does not match exactly at the cursor.
    pub fn skip(&mut self, pattern: &Regex) -> bool {
        match pattern.find_at(self.input, self.pos) {
            Some(m) if m.start() == self.pos => {
                self.pos = m.end();
                true
            }
            _ => false,
        }
    }

    /// The unconsumed remainder of the input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }
}
