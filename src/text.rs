//! Stateless character classification and line-scanning primitives.
//!
//! Everything here works in grapheme clusters. Scans are single-pass and
//! recomputed per call; the line text can change between key events, so
//! nothing is indexed ahead of time.

use unicode_segmentation::UnicodeSegmentation;

use crate::traits::LineSource;

/// The three character classes word motions distinguish. A "run" is a
/// maximal contiguous sequence of one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Whitespace.
    Blank,
    /// Letters, digits, underscore.
    Word,
    /// Any other non-blank character.
    Punct,
}

/// Classify a single grapheme by its first scalar.
pub fn class_of(grapheme: &str) -> CharClass {
    match grapheme.chars().next() {
        None => CharClass::Blank,
        Some(c) if c.is_whitespace() => CharClass::Blank,
        Some(c) if c.is_alphanumeric() || c == '_' => CharClass::Word,
        Some(_) => CharClass::Punct,
    }
}

pub fn is_word_char(grapheme: &str) -> bool {
    class_of(grapheme) == CharClass::Word
}

pub fn is_blank(grapheme: &str) -> bool {
    class_of(grapheme) == CharClass::Blank
}

/// Split a line into grapheme clusters.
pub fn graphemes(line: &str) -> Vec<&str> {
    line.graphemes(true).collect()
}

/// Grapheme length of one line of a source.
pub fn line_len<T: LineSource + ?Sized>(src: &T, line: u32) -> u32 {
    src.line(line).graphemes(true).count() as u32
}

/// Offset of the first non-whitespace grapheme, or the line length if the
/// line is blank.
pub fn first_non_blank(line: &str) -> u32 {
    for (i, g) in line.graphemes(true).enumerate() {
        if !is_blank(g) {
            return i as u32;
        }
    }
    line.graphemes(true).count() as u32
}

/// True when the line contains nothing but whitespace.
pub fn line_is_blank(line: &str) -> bool {
    line.graphemes(true).all(is_blank)
}

/// Offset of the n-th occurrence of `target` strictly after `from`, if there
/// are that many.
pub fn find_char_forward(line: &str, from: u32, target: char, n: u32) -> Option<u32> {
    let mut remaining = n.max(1);
    for (i, g) in line.graphemes(true).enumerate() {
        if (i as u32) <= from {
            continue;
        }
        if g.chars().next() == Some(target) {
            remaining -= 1;
            if remaining == 0 {
                return Some(i as u32);
            }
        }
    }
    None
}

/// Offset of the n-th occurrence of `target` strictly before `from`, if there
/// are that many.
pub fn find_char_backward(line: &str, from: u32, target: char, n: u32) -> Option<u32> {
    let mut remaining = n.max(1);
    let cells = graphemes(line);
    let upper = (from as usize).min(cells.len());
    for i in (0..upper).rev() {
        if cells[i].chars().next() == Some(target) {
            remaining -= 1;
            if remaining == 0 {
                return Some(i as u32);
            }
        }
    }
    None
}

/// Extract the text of a characterwise range from a source, joining lines
/// with newlines. The range must be ordered; columns are clamped.
pub fn slice<T: LineSource + ?Sized>(src: &T, range: crate::types::Range) -> String {
    let start = range.start;
    let end = range.end;
    if range.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for line in start.line..=end.line.min(src.line_count().saturating_sub(1)) {
        let text = src.line(line);
        let cells = graphemes(&text);
        let from = if line == start.line { start.col as usize } else { 0 };
        let to = if line == end.line {
            (end.col as usize).min(cells.len())
        } else {
            cells.len()
        };
        if line != start.line {
            out.push('\n');
        }
        if from < to {
            out.push_str(&cells[from..to].concat());
        }
    }
    out
}
