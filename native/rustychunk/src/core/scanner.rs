//! SIMD-accelerated markup scanning using memchr
//!
//! Uses memchr crate for fast byte searching with SIMD acceleration:
//! - SSE2 (default x86_64)
//! - AVX2 (runtime detection)
//! - NEON (aarch64)

use memchr::{memchr, memchr3, memmem};

/// Scanner for markup delimiter detection
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the current position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    /// Total input length
    #[inline]
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peek at byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Check if input starts with a byte sequence at current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input[self.pos..].starts_with(needle)
    }

    /// Find next '<' at or after `from` using SIMD
    #[inline]
    pub fn find_tag_start_from(&self, from: usize) -> Option<usize> {
        if from >= self.input.len() {
            return None;
        }
        memchr(b'<', &self.input[from..]).map(|i| from + i)
    }

    /// Find next '>' at or after `from`, ignoring quoting
    #[inline]
    pub fn find_tag_end_from(&self, from: usize) -> Option<usize> {
        if from >= self.input.len() {
            return None;
        }
        memchr(b'>', &self.input[from..]).map(|i| from + i)
    }

    /// Find tag end while handling quotes properly
    /// Returns the position of '>' that is not inside quotes
    pub fn find_tag_end_quoted(&self, from: usize) -> Option<usize> {
        let mut pos = from;
        while pos < self.input.len() {
            // Jump straight to the next byte that matters
            let rest = &self.input[pos..];
            let hit = memchr3(b'>', b'"', b'\'', rest)?;
            pos += hit;
            match self.input[pos] {
                b'>' => return Some(pos),
                quote => {
                    // Unterminated quote: fall back to the first bare '>'
                    match memchr(quote, &self.input[pos + 1..]) {
                        Some(close) => pos += close + 2,
                        None => return self.find_tag_end_from(pos + 1),
                    }
                }
            }
        }
        None
    }

    /// Find the next occurrence of `needle` at or after `from`
    #[inline]
    pub fn find_sequence(&self, from: usize, needle: &[u8]) -> Option<usize> {
        if from >= self.input.len() {
            return None;
        }
        memmem::find(&self.input[from..], needle).map(|i| from + i)
    }

    /// Find the closing tag `</name` (ASCII case-insensitive) at or after `from`.
    ///
    /// Used for raw-text elements whose content is not tokenized.
    pub fn find_closing_tag(&self, from: usize, name: &str) -> Option<usize> {
        let name = name.as_bytes();
        let mut pos = from;
        while pos < self.input.len() {
            let hit = memchr(b'<', &self.input[pos..])?;
            let start = pos + hit;
            let after = start + 2 + name.len();
            if self.input.get(start + 1) == Some(&b'/')
                && after <= self.input.len()
                && self.input[start + 2..after].eq_ignore_ascii_case(name)
                && self
                    .input
                    .get(after)
                    .is_none_or(|&b| b == b'>' || b == b'/' || is_whitespace(b))
            {
                return Some(start);
            }
            pos = start + 1;
        }
        None
    }

    /// Read a tag name starting at the current position.
    ///
    /// HTML names are looser than XML names: anything up to whitespace,
    /// '/', '>' or end of input belongs to the name.
    pub fn read_name(&mut self) -> Option<&'a [u8]> {
        let start = self.pos;
        let first = *self.input.get(start)?;
        if !first.is_ascii_alphabetic() {
            return None;
        }
        self.pos += 1;
        while self.pos < self.input.len() && is_name_char(self.input[self.pos]) {
            self.pos += 1;
        }
        Some(&self.input[start..self.pos])
    }
}

/// Whitespace as HTML defines it for tag syntax
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}

/// Check if byte can continue a tag name
#[inline]
fn is_name_char(b: u8) -> bool {
    !is_whitespace(b) && b != b'/' && b != b'>'
}

/// Check whether `<` at `pos` opens markup rather than being literal text
#[inline]
pub fn starts_markup(input: &[u8], pos: usize) -> bool {
    match input.get(pos + 1) {
        Some(b) if b.is_ascii_alphabetic() => true,
        Some(b'!') | Some(b'?') => true,
        Some(b'/') => input.get(pos + 2).is_some_and(|b| b.is_ascii_alphabetic()),
        _ => false,
    }
}
