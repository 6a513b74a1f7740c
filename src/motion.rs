//! The motion calculus: pure position computations over a line source.
//!
//! Counted motions apply their single-step function `count` times in a loop;
//! each step clamps independently at buffer edges, so large counts degrade
//! gracefully instead of jumping.

use crate::text::{self, CharClass, class_of, graphemes};
use crate::traits::LineSource;
use crate::types::Position;

/// How a motion combines with an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionShape {
    /// Characterwise, end-exclusive: the target position is not covered.
    Exclusive,
    /// Characterwise, end-inclusive: the character at the far end is covered.
    Inclusive,
    /// Whole lines.
    Linewise,
}

fn cells_of<T: LineSource + ?Sized>(src: &T, line: u32) -> Vec<String> {
    graphemes(&src.line(line))
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Advance one grapheme, treating the end-of-line slot as a newline cell.
fn next_pos<T: LineSource + ?Sized>(src: &T, pos: Position) -> Option<Position> {
    if pos.col < text::line_len(src, pos.line) {
        return Some(Position::new(pos.line, pos.col + 1));
    }
    if pos.line + 1 < src.line_count() {
        return Some(Position::new(pos.line + 1, 0));
    }
    None
}

/// Step back one grapheme, crossing onto the previous line's newline slot.
fn prev_pos<T: LineSource + ?Sized>(src: &T, pos: Position) -> Option<Position> {
    if pos.col > 0 {
        return Some(Position::new(pos.line, pos.col - 1));
    }
    if pos.line > 0 {
        let line = pos.line - 1;
        return Some(Position::new(line, text::line_len(src, line)));
    }
    None
}

/// The grapheme under a position; the end-of-line slot reads as "\n".
fn grapheme_at<T: LineSource + ?Sized>(src: &T, pos: Position) -> Option<String> {
    let cells = cells_of(src, pos.line);
    if (pos.col as usize) < cells.len() {
        return Some(cells[pos.col as usize].clone());
    }
    if pos.line + 1 < src.line_count() {
        return Some("\n".to_string());
    }
    None
}

fn class_at<T: LineSource + ?Sized>(src: &T, pos: Position) -> CharClass {
    match grapheme_at(src, pos) {
        Some(g) => class_of(&g),
        None => CharClass::Blank,
    }
}

/// `h`: left within the line, clamped at column 0.
pub fn left(pos: Position, count: u32) -> Position {
    Position::new(pos.line, pos.col.saturating_sub(count))
}

/// `l`: right within the line, clamped to the end-of-line slot.
pub fn right<T: LineSource + ?Sized>(src: &T, pos: Position, count: u32) -> Position {
    let max = text::line_len(src, pos.line);
    Position::new(pos.line, pos.col.saturating_add(count).min(max))
}

/// `j`/`k`: vertical move restoring the desired column through short lines.
pub fn vertical<T: LineSource + ?Sized>(
    src: &T,
    pos: Position,
    down: bool,
    count: u32,
    desired_col: u32,
) -> Position {
    let line = if down {
        pos.line
            .saturating_add(count)
            .min(src.line_count().saturating_sub(1))
    } else {
        pos.line.saturating_sub(count)
    };
    let len = text::line_len(src, line);
    let col = if len > 0 { desired_col.min(len - 1) } else { 0 };
    Position::new(line, col)
}

/// `$`: last character of the line (column 0 on an empty line).
pub fn line_end<T: LineSource + ?Sized>(src: &T, line: u32) -> Position {
    let len = text::line_len(src, line);
    Position::new(line, len.saturating_sub(1))
}

/// `^`: first non-blank of the line.
pub fn first_non_blank<T: LineSource + ?Sized>(src: &T, line: u32) -> Position {
    Position::new(line, text::first_non_blank(&src.line(line)))
}

fn word_forward_step<T: LineSource + ?Sized>(src: &T, pos: Position) -> Position {
    let last_line = src.line_count().saturating_sub(1);
    let mut line = pos.line.min(last_line);
    let mut col = pos.col;
    let cells = cells_of(src, line);
    // Leave the run under the cursor.
    if (col as usize) < cells.len() {
        let cls = class_of(&cells[col as usize]);
        if cls != CharClass::Blank {
            while (col as usize) < cells.len() && class_of(&cells[col as usize]) == cls {
                col += 1;
            }
        }
    }
    // Skip the blank run, crossing line boundaries.
    loop {
        let cells = cells_of(src, line);
        if (col as usize) >= cells.len() {
            if line >= last_line {
                return Position::new(line, cells.len() as u32);
            }
            line += 1;
            col = 0;
            continue;
        }
        if class_of(&cells[col as usize]) == CharClass::Blank {
            col += 1;
            continue;
        }
        return Position::new(line, col);
    }
}

/// `w`: start of the next word, applied `count` times.
pub fn word_forward<T: LineSource + ?Sized>(src: &T, pos: Position, count: u32) -> Position {
    let mut p = pos;
    // Each step clamps at the buffer edge; once it stops moving, the rest of
    // the count changes nothing.
    for _ in 0..count.max(1) {
        let next = word_forward_step(src, p);
        if next == p {
            break;
        }
        p = next;
    }
    p
}

fn word_backward_step<T: LineSource + ?Sized>(src: &T, pos: Position) -> Position {
    let mut p = match prev_pos(src, pos) {
        Some(p) => p,
        None => return pos,
    };
    // Skip blanks (the newline slot counts as blank).
    while class_at(src, p) == CharClass::Blank {
        p = match prev_pos(src, p) {
            Some(q) => q,
            None => return Position::ZERO,
        };
    }
    // Walk to the start of the run now under the cursor.
    let cls = class_at(src, p);
    while p.col > 0 {
        let before = Position::new(p.line, p.col - 1);
        if class_at(src, before) != cls {
            break;
        }
        p = before;
    }
    p
}

/// `b`: start of the previous word, applied `count` times.
pub fn word_backward<T: LineSource + ?Sized>(src: &T, pos: Position, count: u32) -> Position {
    let mut p = pos;
    for _ in 0..count.max(1) {
        let next = word_backward_step(src, p);
        if next == p {
            break;
        }
        p = next;
    }
    p
}

fn word_end_step<T: LineSource + ?Sized>(src: &T, pos: Position) -> Position {
    let mut p = match next_pos(src, pos) {
        Some(p) => p,
        None => return pos,
    };
    // Skip blanks forward.
    loop {
        match class_at(src, p) {
            CharClass::Blank => match next_pos(src, p) {
                Some(q) => p = q,
                None => return pos,
            },
            _ => break,
        }
    }
    // Advance to the end of the run.
    let cls = class_at(src, p);
    loop {
        let after = Position::new(p.line, p.col + 1);
        if after.col >= text::line_len(src, p.line) || class_at(src, after) != cls {
            break;
        }
        p = after;
    }
    p
}

/// `e`: end of the next word, applied `count` times.
pub fn word_end<T: LineSource + ?Sized>(src: &T, pos: Position, count: u32) -> Position {
    let mut p = pos;
    for _ in 0..count.max(1) {
        let next = word_end_step(src, p);
        if next == p {
            break;
        }
        p = next;
    }
    p
}

/// `f`/`F`/`t`/`T`: position of the n-th occurrence of `target` on the
/// cursor line, offset by one for the till variants. `None` when fewer than
/// `count` occurrences exist in that direction.
pub fn find_in_line<T: LineSource + ?Sized>(
    src: &T,
    pos: Position,
    target: char,
    back: bool,
    till: bool,
    count: u32,
) -> Option<Position> {
    let line = src.line(pos.line);
    if back {
        let hit = text::find_char_backward(&line, pos.col, target, count)?;
        let col = if till { hit + 1 } else { hit };
        Some(Position::new(pos.line, col))
    } else {
        let hit = text::find_char_forward(&line, pos.col, target, count)?;
        let col = if till { hit.saturating_sub(1) } else { hit };
        Some(Position::new(pos.line, col))
    }
}

fn line_is_blank<T: LineSource + ?Sized>(src: &T, line: u32) -> bool {
    text::line_is_blank(&src.line(line))
}

fn paragraph_forward_step<T: LineSource + ?Sized>(src: &T, pos: Position) -> Position {
    let last = src.line_count().saturating_sub(1);
    let mut l = pos.line.min(last);
    while l < last && !line_is_blank(src, l) {
        l += 1;
    }
    while l < last && line_is_blank(src, l) {
        l += 1;
    }
    Position::new(l, 0)
}

fn paragraph_backward_step<T: LineSource + ?Sized>(src: &T, pos: Position) -> Position {
    if pos.line == 0 {
        return Position::ZERO;
    }
    let mut l = pos.line - 1;
    while l > 0 && line_is_blank(src, l) {
        l -= 1;
    }
    while l > 0 && !line_is_blank(src, l - 1) {
        l -= 1;
    }
    Position::new(l, 0)
}

/// `}`: start of the next paragraph (first non-blank line after a blank run).
pub fn paragraph_forward<T: LineSource + ?Sized>(src: &T, pos: Position, count: u32) -> Position {
    let mut p = pos;
    for _ in 0..count.max(1) {
        let next = paragraph_forward_step(src, p);
        if next == p {
            break;
        }
        p = next;
    }
    p
}

/// `{`: start of the previous paragraph.
pub fn paragraph_backward<T: LineSource + ?Sized>(src: &T, pos: Position, count: u32) -> Position {
    let mut p = pos;
    for _ in 0..count.max(1) {
        let next = paragraph_backward_step(src, p);
        if next == p {
            break;
        }
        p = next;
    }
    p
}

fn is_terminator(g: &str) -> bool {
    matches!(g, "." | "!" | "?")
}

fn is_closer(g: &str) -> bool {
    matches!(g, ")" | "]" | "\"" | "'")
}

/// All sentence-start positions in the buffer: the first non-blank after the
/// start of a paragraph, and the first non-blank following a sentence
/// terminator (plus trailing closers) that is itself followed by whitespace
/// or end-of-line.
pub fn sentence_starts<T: LineSource + ?Sized>(src: &T) -> Vec<Position> {
    let mut starts = Vec::new();
    let mut want_start = true;
    for line in 0..src.line_count() {
        let line_text = src.line(line);
        if text::line_is_blank(&line_text) {
            want_start = true;
            continue;
        }
        let cells = graphemes(&line_text);
        if want_start {
            starts.push(Position::new(line, text::first_non_blank(&line_text)));
            want_start = false;
        }
        let len = cells.len();
        let mut i = 0;
        while i < len {
            if is_terminator(cells[i]) {
                let mut j = i + 1;
                while j < len && is_closer(cells[j]) {
                    j += 1;
                }
                if j >= len {
                    want_start = true;
                    break;
                }
                if text::is_blank(cells[j]) {
                    let mut k = j;
                    while k < len && text::is_blank(cells[k]) {
                        k += 1;
                    }
                    if k < len {
                        starts.push(Position::new(line, k as u32));
                        i = k;
                        continue;
                    }
                    want_start = true;
                    break;
                }
            }
            i += 1;
        }
    }
    starts
}

/// `)`: start of the next sentence, applied `count` times.
pub fn sentence_forward<T: LineSource + ?Sized>(src: &T, pos: Position, count: u32) -> Position {
    let starts = sentence_starts(src);
    let mut p = pos;
    for _ in 0..count.max(1) {
        let next = match starts.iter().find(|s| **s > p) {
            Some(s) => *s,
            None => {
                let last = src.line_count().saturating_sub(1);
                Position::new(last, text::line_len(src, last))
            }
        };
        if next == p {
            break;
        }
        p = next;
    }
    p
}

/// `(`: start of the current or previous sentence, applied `count` times.
pub fn sentence_backward<T: LineSource + ?Sized>(src: &T, pos: Position, count: u32) -> Position {
    let starts = sentence_starts(src);
    let mut p = pos;
    for _ in 0..count.max(1) {
        let next = match starts.iter().rev().find(|s| **s < p) {
            Some(s) => *s,
            None => Position::ZERO,
        };
        if next == p {
            break;
        }
        p = next;
    }
    p
}

const PAIRS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

fn bracket_kind(g: &str) -> Option<(char, char, bool)> {
    let c = g.chars().next()?;
    for (open, close) in PAIRS {
        if c == open {
            return Some((open, close, true));
        }
        if c == close {
            return Some((open, close, false));
        }
    }
    None
}

/// `%`: the match of the nearest bracket at or after the cursor on its line,
/// scanning the whole document with nesting.
pub fn matching_bracket<T: LineSource + ?Sized>(src: &T, pos: Position) -> Option<Position> {
    // Find the nearest bracket character on the cursor line first.
    let cells = cells_of(src, pos.line);
    let mut start = None;
    let mut col = pos.col;
    while (col as usize) < cells.len() {
        if bracket_kind(&cells[col as usize]).is_some() {
            start = Some(Position::new(pos.line, col));
            break;
        }
        col += 1;
    }
    let start = start?;
    let g = grapheme_at(src, start)?;
    let (open, close, opening) = bracket_kind(&g)?;
    let mut depth = 0u32;
    let mut p = start;
    loop {
        p = if opening { next_pos(src, p)? } else { prev_pos(src, p)? };
        let g = grapheme_at(src, p)?;
        let c = g.chars().next()?;
        let (toward, away) = if opening { (close, open) } else { (open, close) };
        if c == away {
            depth += 1;
        } else if c == toward {
            if depth == 0 {
                return Some(p);
            }
            depth -= 1;
        }
    }
}

/// The innermost pair of `open`/`close` enclosing `pos`, scanning the whole
/// document with nesting. The cursor may sit on either delimiter.
pub fn enclosing_pair<T: LineSource + ?Sized>(
    src: &T,
    pos: Position,
    open: char,
    close: char,
) -> Option<(Position, Position)> {
    let at = grapheme_at(src, pos).and_then(|g| g.chars().next());
    let opener = if at == Some(open) {
        Some(pos)
    } else {
        let mut depth = 0u32;
        let mut p = pos;
        loop {
            p = match prev_pos(src, p) {
                Some(q) => q,
                None => break None,
            };
            match grapheme_at(src, p).and_then(|g| g.chars().next()) {
                Some(c) if c == close => depth += 1,
                Some(c) if c == open => {
                    if depth == 0 {
                        break Some(p);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
    }?;
    let closer = if at == Some(close) {
        Some(pos)
    } else {
        let mut depth = 0u32;
        let mut p = pos;
        loop {
            p = match next_pos(src, p) {
                Some(q) => q,
                None => break None,
            };
            match grapheme_at(src, p).and_then(|g| g.chars().next()) {
                Some(c) if c == open => depth += 1,
                Some(c) if c == close => {
                    if depth == 0 {
                        break Some(p);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
    }?;
    (opener < closer).then_some((opener, closer))
}

/// Position one grapheme past `pos`, staying on the same line (clamped to
/// the end-of-line slot). Used to widen inclusive operator targets.
pub fn past<T: LineSource + ?Sized>(src: &T, pos: Position) -> Position {
    let len = text::line_len(src, pos.line);
    Position::new(pos.line, (pos.col + 1).min(len))
}
