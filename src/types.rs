/// A position within a text buffer.
///
/// Positions are zero-indexed and column values are counted in grapheme clusters,
/// not bytes or chars. This ensures correct handling of emoji and combining characters.
/// A column equal to the line's length is the valid end-of-line slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based column position in grapheme clusters.
    pub col: u32,
}

impl Position {
    /// The origin position (0, 0).
    pub const ZERO: Position = Position { line: 0, col: 0 };

    pub fn new(line: u32, col: u32) -> Self {
        Position { line, col }
    }
}

/// A characterwise range defined by start and end positions.
///
/// Ranges are half-open intervals [start, end), meaning the start position
/// is included but the end position is excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    /// The start position (inclusive).
    pub start: Position,
    /// The end position (exclusive).
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Range { start, end }
    }

    /// True when the range covers nothing. Operators treat empty ranges
    /// as a successful no-op.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// An operator target: either an exact character span or whole lines.
///
/// Every motion result used as an operator target resolves to exactly one of
/// these two kinds; the distinction drives register shape and paste behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// Characterwise span, end-exclusive.
    Chars(Range),
    /// Linewise span over the line interval [start, end).
    Lines { start: u32, end: u32 },
}

/// The current mode of the engine.
///
/// Vim is a modal editor where the same keys perform different
/// actions depending on the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal mode - for navigation and operators.
    Normal,
    /// Insert mode - for typing text.
    Insert,
    /// Visual mode - for selecting text.
    Visual(VisualKind),
}

/// The type of visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    /// Character-wise selection (v).
    CharWise,
    /// Line-wise selection (V).
    LineWise,
}

/// A text selection with its type.
///
/// Selections are emitted in normalized (start <= end) order regardless of
/// which side of the anchor the cursor ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// The start of the selection (inclusive).
    pub start: Position,
    /// The end of the selection (exclusive).
    pub end: Position,
    /// The type of selection (character or line).
    pub kind: VisualKind,
}

/// The implicit register: the most recent yank or delete.
///
/// The shape records whether the content was taken characterwise or linewise,
/// which determines how `p`/`P` splice it back in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Register {
    /// Characterwise content.
    Chars(String),
    /// Linewise content, one entry per line, without trailing newlines.
    Lines(Vec<String>),
}

/// Commands emitted by the engine for the host to execute.
///
/// These commands represent the concrete actions that should be
/// applied to the text buffer. The host is responsible for implementing
/// these operations on their text storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Update the cursor position.
    SetCursor(Position),
    /// Set or clear the current selection.
    SetSelection(Option<Selection>),

    /// Delete text in the specified range.
    Delete { range: Range },
    /// Insert text at the specified position.
    InsertText { at: Position, text: String },
    /// Replace text in the specified range.
    Replace { range: Range, text: String },

    /// Step the host's undo history back one unit. The engine keeps no
    /// undo log of its own.
    Undo,
    /// Copy text to the system clipboard, best-effort. The engine never
    /// performs this side effect itself; see [`crate::traits::Clipboard`].
    CopyToClipboard(String),
}
