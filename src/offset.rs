//! Byte/character offset handling.
//!
//! Every span in this crate is expressed in **character** offsets (Unicode
//! scalar values), because that is what span labelers and downstream
//! formatting layers count. Rust strings index by byte, and `regex` /
//! `str::find` report byte positions, so conversions happen at the edges.
//!
//! ```text
//! Text: "Café Zürich"
//!
//!   byte:  C  a  f  [é ]  ␠  Z  [ü ]  r  i  c  h
//!          0  1  2  3-4  5  6  7-8  9 10 11 12
//!
//!   char:  C  a  f  é  ␠  Z  ü  r  i  c  h
//!          0  1  2  3  4  5  6  7  8  9 10
//! ```
//!
//! [`SpanConverter`] precomputes both tables once per text so that each
//! conversion inside a scan loop is O(1). ASCII text skips the tables.

/// Number of characters in `text`.
#[must_use]
pub fn char_len(text: &str) -> usize {
    if text.is_ascii() {
        text.len()
    } else {
        text.chars().count()
    }
}

fn build_byte_to_char_map(text: &str) -> Vec<usize> {
    let mut map = vec![0usize; text.len() + 1];

    for (char_idx, (byte_idx, ch)) in text.char_indices().enumerate() {
        for slot in map.iter_mut().skip(byte_idx).take(ch.len_utf8()) {
            *slot = char_idx;
        }
    }
    map[text.len()] = text.chars().count();

    map
}

fn build_char_to_byte_map(text: &str) -> Vec<usize> {
    let mut map: Vec<usize> = text.char_indices().map(|(byte_idx, _)| byte_idx).collect();
    map.push(text.len());
    map
}

/// Converter for many offsets into the same text.
#[derive(Debug, Clone)]
pub struct SpanConverter {
    byte_to_char: Vec<usize>,
    char_to_byte: Vec<usize>,
    is_ascii: bool,
    byte_len: usize,
}

impl SpanConverter {
    /// Create a converter for the given text.
    #[must_use]
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            Self {
                byte_to_char: Vec::new(),
                char_to_byte: Vec::new(),
                is_ascii: true,
                byte_len: text.len(),
            }
        } else {
            Self {
                byte_to_char: build_byte_to_char_map(text),
                char_to_byte: build_char_to_byte_map(text),
                is_ascii: false,
                byte_len: text.len(),
            }
        }
    }

    /// Total number of characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        if self.is_ascii {
            self.byte_len
        } else {
            self.char_to_byte.len() - 1
        }
    }

    /// Convert byte offset to char offset (clamped to the end).
    #[must_use]
    pub fn byte_to_char(&self, byte_idx: usize) -> usize {
        if self.is_ascii {
            byte_idx.min(self.byte_len)
        } else {
            self.byte_to_char
                .get(byte_idx)
                .copied()
                .unwrap_or_else(|| self.char_len())
        }
    }

    /// Convert char offset to byte offset (clamped to the end).
    #[must_use]
    pub fn char_to_byte(&self, char_idx: usize) -> usize {
        if self.is_ascii {
            char_idx.min(self.byte_len)
        } else {
            self.char_to_byte
                .get(char_idx)
                .copied()
                .unwrap_or(self.byte_len)
        }
    }

    /// Slice `text` (the same text this converter was built from) by
    /// character offsets.
    #[must_use]
    pub fn slice<'a>(&self, text: &'a str, char_start: usize, char_end: usize) -> &'a str {
        let start = self.char_to_byte(char_start);
        let end = self.char_to_byte(char_end);
        if start >= end {
            return "";
        }
        &text[start..end]
    }

    /// Whether the underlying text is ASCII (identity mapping).
    #[must_use]
    pub const fn is_ascii(&self) -> bool {
        self.is_ascii
    }
}
