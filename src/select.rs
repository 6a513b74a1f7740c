//! Visual-selection normalization.
//!
//! The engine stores only the anchor and the moving cursor; the ordered
//! selection is derived on demand, since the cursor can cross the anchor
//! at any time.

use crate::text;
use crate::traits::LineSource;
use crate::types::{Position, Selection, Span, VisualKind};

/// Order an (anchor, cursor) pair into an ascending selection.
///
/// Characterwise selections span [min, max). Linewise selections run from
/// column 0 of the lower line to column 0 of the line after the upper line,
/// or to the end of the buffer when no such line exists.
pub fn normalize<T: LineSource + ?Sized>(
    src: &T,
    anchor: Position,
    cursor: Position,
    kind: VisualKind,
) -> Selection {
    match kind {
        VisualKind::CharWise => {
            let (start, end) = if anchor <= cursor {
                (anchor, cursor)
            } else {
                (cursor, anchor)
            };
            Selection { start, end, kind }
        }
        VisualKind::LineWise => {
            let low = anchor.line.min(cursor.line);
            let high = anchor.line.max(cursor.line);
            let end = if high + 1 < src.line_count() {
                Position::new(high + 1, 0)
            } else {
                Position::new(high, text::line_len(src, high))
            };
            Selection {
                start: Position::new(low, 0),
                end,
                kind,
            }
        }
    }
}

/// The operator target for a visual selection.
pub fn span<T: LineSource + ?Sized>(
    src: &T,
    anchor: Position,
    cursor: Position,
    kind: VisualKind,
) -> Span {
    match kind {
        VisualKind::CharWise => {
            let sel = normalize(src, anchor, cursor, kind);
            Span::Chars(crate::types::Range::new(sel.start, sel.end))
        }
        VisualKind::LineWise => {
            let low = anchor.line.min(cursor.line);
            let high = anchor.line.max(cursor.line);
            Span::Lines {
                start: low,
                end: high + 1,
            }
        }
    }
}
