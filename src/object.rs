//! Text objects: ranges derived from structure around the cursor rather
//! than from directional motion.

use crate::motion;
use crate::text::{self, CharClass, class_of, graphemes};
use crate::traits::LineSource;
use crate::types::{Position, Range, Span};

/// Inner (`i`) versus around (`a`) selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Inner,
    Around,
}

/// `iw`/`aw`: the class run under the cursor; `aw` additionally swallows one
/// adjacent blank run, trailing preferred.
pub fn word<T: LineSource + ?Sized>(src: &T, pos: Position, scope: Scope) -> Option<Span> {
    let line_text = src.line(pos.line);
    let cells = graphemes(&line_text);
    if cells.is_empty() {
        return None;
    }
    let col = (pos.col as usize).min(cells.len() - 1);
    let cls = class_of(cells[col]);
    let mut start = col;
    while start > 0 && class_of(cells[start - 1]) == cls {
        start -= 1;
    }
    let mut end = col + 1;
    while end < cells.len() && class_of(cells[end]) == cls {
        end += 1;
    }
    if scope == Scope::Around && cls != CharClass::Blank {
        if end < cells.len() && class_of(cells[end]) == CharClass::Blank {
            while end < cells.len() && class_of(cells[end]) == CharClass::Blank {
                end += 1;
            }
        } else {
            while start > 0 && class_of(cells[start - 1]) == CharClass::Blank {
                start -= 1;
            }
        }
    }
    Some(Span::Chars(Range::new(
        Position::new(pos.line, start as u32),
        Position::new(pos.line, end as u32),
    )))
}

/// `i"`/`a"` and friends: the first and second occurrence of the quote
/// character on the cursor line. Fails unless the cursor lies within
/// `[first, second]` inclusive.
pub fn quoted<T: LineSource + ?Sized>(
    src: &T,
    pos: Position,
    quote: char,
    scope: Scope,
) -> Option<Span> {
    let line_text = src.line(pos.line);
    let cells = graphemes(&line_text);
    let first = cells
        .iter()
        .position(|g| g.chars().next() == Some(quote))? as u32;
    let second = text::find_char_forward(&line_text, first, quote, 1)?;
    if pos.col < first || pos.col > second {
        return None;
    }
    let (start, end) = match scope {
        Scope::Inner => (first + 1, second),
        Scope::Around => (first, second + 1),
    };
    Some(Span::Chars(Range::new(
        Position::new(pos.line, start),
        Position::new(pos.line, end),
    )))
}

/// `i(`/`a(` and the other bracket pairs: the innermost enclosing pair,
/// found by nested depth-counting scans in both directions (multi-line).
pub fn bracketed<T: LineSource + ?Sized>(
    src: &T,
    pos: Position,
    open: char,
    close: char,
    scope: Scope,
) -> Option<Span> {
    let (opener, closer) = motion::enclosing_pair(src, pos, open, close)?;
    let range = match scope {
        Scope::Inner => Range::new(after(src, opener), closer),
        Scope::Around => Range::new(opener, after(src, closer)),
    };
    if range.is_empty() {
        return None;
    }
    Some(Span::Chars(range))
}

fn after<T: LineSource + ?Sized>(src: &T, pos: Position) -> Position {
    if pos.col < text::line_len(src, pos.line) {
        Position::new(pos.line, pos.col + 1)
    } else {
        Position::new(pos.line + 1, 0)
    }
}

/// `ip`/`ap`: the run of lines sharing the cursor line's blankness; `ap`
/// swallows the following blank-line run, else the preceding one. Linewise.
pub fn paragraph<T: LineSource + ?Sized>(src: &T, pos: Position, scope: Scope) -> Option<Span> {
    let total = src.line_count();
    if total == 0 {
        return None;
    }
    let cursor_line = pos.line.min(total - 1);
    let blank = text::line_is_blank(&src.line(cursor_line));
    let mut start = cursor_line;
    while start > 0 && text::line_is_blank(&src.line(start - 1)) == blank {
        start -= 1;
    }
    let mut end = cursor_line + 1;
    while end < total && text::line_is_blank(&src.line(end)) == blank {
        end += 1;
    }
    if scope == Scope::Around && !blank {
        if end < total && text::line_is_blank(&src.line(end)) {
            while end < total && text::line_is_blank(&src.line(end)) {
                end += 1;
            }
        } else {
            while start > 0 && text::line_is_blank(&src.line(start - 1)) {
                start -= 1;
            }
        }
    }
    Some(Span::Lines { start, end })
}

/// `is`/`as`: the sentence containing the cursor; `as` keeps the trailing
/// whitespace up to the next sentence, `is` trims it.
pub fn sentence<T: LineSource + ?Sized>(src: &T, pos: Position, scope: Scope) -> Option<Span> {
    let starts = motion::sentence_starts(src);
    let start = *starts.iter().rev().find(|s| **s <= pos)?;
    let end = match starts.iter().find(|s| **s > pos) {
        Some(next) => *next,
        None => {
            let last = src.line_count().saturating_sub(1);
            Position::new(last, text::line_len(src, last))
        }
    };
    let end = match scope {
        Scope::Around => end,
        Scope::Inner => trim_trailing_blanks(src, start, end),
    };
    let range = Range::new(start, end);
    if range.is_empty() {
        return None;
    }
    Some(Span::Chars(range))
}

fn trim_trailing_blanks<T: LineSource + ?Sized>(
    src: &T,
    start: Position,
    end: Position,
) -> Position {
    let mut end = end;
    loop {
        if end <= start {
            return start;
        }
        let line_text = src.line(end.line);
        let cells = graphemes(&line_text);
        if end.col == 0 || end.col as usize > cells.len() {
            // End-of-line slot or line boundary: step onto the previous cell.
            if end.col as usize > cells.len() && !cells.is_empty() {
                end.col = cells.len() as u32;
                continue;
            }
            if end.line == 0 {
                return start;
            }
            end = Position::new(end.line - 1, text::line_len(src, end.line - 1));
            continue;
        }
        if text::is_blank(cells[end.col as usize - 1]) {
            end.col -= 1;
            continue;
        }
        return end;
    }
}
