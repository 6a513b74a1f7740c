use std::collections::HashMap;

use crate::key::{InputEvent, KeyCode, KeyEvent};
use crate::motion::{self, MotionShape};
use crate::object::{self, Scope};
use crate::operator::{self, Applied, Operator};
use crate::select;
use crate::text;
use crate::traits::{self, LineSource};
use crate::types::{Command, Mode, Position, Range, Register, Span, VisualKind};

#[derive(Debug, Default, Clone)]
struct Counts {
    current: Option<u32>,
}

impl Counts {
    fn push_digit(&mut self, d: u32) {
        let next = self
            .current
            .unwrap_or(0)
            .saturating_mul(10)
            .saturating_add(d);
        self.current = Some(next);
    }

    fn take_or(&mut self, default_: u32) -> u32 {
        let v = self.current.take().unwrap_or(default_);
        v.max(1)
    }

    fn take(&mut self) -> Option<u32> {
        self.current.take()
    }

    fn clear(&mut self) {
        self.current = None;
    }
}

/// A key that needs one more key before it means anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    /// `f`/`F`/`t`/`T`: awaiting the search target character.
    Find { back: bool, till: bool },
    /// `'`/`` ` ``: awaiting the mark letter to jump to.
    JumpMark { exact: bool },
    /// `g`: awaiting a second `g`.
    Goto,
    /// `r`: awaiting the replacement character.
    ReplaceChar,
    /// `m`: awaiting the mark letter to set.
    SetMark,
    /// `i`/`a` after an operator: awaiting the text-object key.
    Object(Scope),
}

/// Accumulated partial input. At most one prefix is active at a time; an
/// operator may coexist with a prefix (`d` then `f`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Idle,
    Prefix(Prefix),
    Operator(Operator),
    OperatorPrefix(Operator, Prefix),
}

/// The most recent `f`/`F`/`t`/`T`, repeated by `;` and `,`.
#[derive(Debug, Clone, Copy)]
struct CharSearch {
    back: bool,
    till: bool,
    target: char,
}

/// The modal command interpreter. One instance per editing session; all
/// session state (mode, pending input, marks, register, desired column,
/// last char search) lives here and nowhere else.
#[derive(Debug, Clone)]
pub struct Engine {
    mode: Mode,
    pending: Pending,
    counts: Counts,
    preferred_col: Option<u32>,
    register: Option<Register>,
    marks: HashMap<char, Position>,
    last_search: Option<CharSearch>,
    anchor: Option<Position>,
}

/// A read-only view of interpreter state, for hosts that render mode
/// indicators or pending counts.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub mode: Mode,
    pub preferred_col: Option<u32>,
    pub pending_count: Option<u32>,
}

pub struct EngineBuilder {
    mode: Mode,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self { mode: Mode::Normal }
    }
}

impl EngineBuilder {
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            mode: self.mode,
            pending: Pending::Idle,
            counts: Counts::default(),
            preferred_col: None,
            register: None,
            marks: HashMap::new(),
            last_search: None,
            anchor: None,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        EngineBuilder::default().build()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            mode: self.mode,
            preferred_col: self.preferred_col,
            pending_count: self.counts.current,
        }
    }

    /// The implicit register: the most recent yank or delete.
    pub fn register(&self) -> Option<&Register> {
        self.register.as_ref()
    }

    /// Process one key event against an immutable buffer snapshot.
    ///
    /// Returns the new cursor position and the commands the host should
    /// apply, in order. Pure motions emit `SetCursor`; edits rely on the
    /// returned position for caret placement, which may only become valid
    /// once the edits are applied.
    ///
    /// A stale cursor (outside the snapshot) is clamped rather than
    /// rejected; the host is free to hand in positions from before an edit.
    pub fn handle_event<T: LineSource>(
        &mut self,
        text: &T,
        cursor: Position,
        input: InputEvent,
    ) -> (Position, Vec<Command>) {
        let cursor = traits::clamp(text, cursor);
        match (self.mode, input) {
            (Mode::Insert, InputEvent::Key(ke)) => self.insert_key(text, cursor, ke),
            (Mode::Insert, InputEvent::ReceivedChar(ch)) => {
                // Direct insertion; host applies this edit.
                let cmd = Command::InsertText {
                    at: cursor,
                    text: ch.to_string(),
                };
                (Position::new(cursor.line, cursor.col + 1), vec![cmd])
            }
            (_, InputEvent::Key(ke)) => self.handle_key(text, cursor, ke),
            // Commands arrive as key events; stray text input outside insert
            // mode is ignored.
            (_, InputEvent::ReceivedChar(_)) => (cursor, vec![]),
        }
    }

    fn insert_key<T: LineSource>(
        &mut self,
        src: &T,
        cursor: Position,
        ke: KeyEvent,
    ) -> (Position, Vec<Command>) {
        match ke.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                (cursor, vec![])
            }
            KeyCode::Enter => {
                let cmd = Command::InsertText {
                    at: cursor,
                    text: "\n".to_string(),
                };
                (Position::new(cursor.line + 1, 0), vec![cmd])
            }
            KeyCode::Backspace => {
                if cursor.col > 0 {
                    let range =
                        Range::new(Position::new(cursor.line, cursor.col - 1), cursor);
                    (range.start, vec![Command::Delete { range }])
                } else if cursor.line > 0 {
                    let prev_len = text::line_len(src, cursor.line - 1);
                    let range = Range::new(Position::new(cursor.line - 1, prev_len), cursor);
                    (range.start, vec![Command::Delete { range }])
                } else {
                    (cursor, vec![])
                }
            }
            _ => (cursor, vec![]),
        }
    }

    /// Normal/Visual dispatch, in fixed priority order: escape, pending
    /// prefix resolution, digit accumulation, operator-target resolution,
    /// bare motions, commands. Unrecognized keys clear pending state and are
    /// otherwise ignored.
    fn handle_key<T: LineSource>(
        &mut self,
        src: &T,
        cursor: Position,
        ke: KeyEvent,
    ) -> (Position, Vec<Command>) {
        if ke.code == KeyCode::Esc {
            return self.escape(cursor);
        }
        let c = match ke.code {
            KeyCode::Char(c) => c,
            _ => {
                self.reset_pending();
                return (cursor, vec![]);
            }
        };

        // An active prefix consumes the key verbatim.
        match self.pending {
            Pending::Prefix(p) => return self.resolve_prefix(src, cursor, None, p, c),
            Pending::OperatorPrefix(op, p) => {
                return self.resolve_prefix(src, cursor, Some(op), p, c);
            }
            _ => {}
        }

        // Count digits; a leading 0 is the line-start motion instead.
        if c.is_ascii_digit() && !(c == '0' && self.counts.current.is_none()) {
            self.counts.push_digit(u32::from(c as u8 - b'0'));
            return (cursor, vec![]);
        }

        if let Pending::Operator(op) = self.pending {
            return self.operator_target(src, cursor, op, c);
        }

        if let Some(result) = self.bare_motion(src, cursor, c) {
            return result;
        }

        self.command_key(src, cursor, c)
    }

    fn escape(&mut self, cursor: Position) -> (Position, Vec<Command>) {
        self.reset_pending();
        self.preferred_col = None;
        let mut cmds = Vec::new();
        if matches!(self.mode, Mode::Visual(_)) {
            self.anchor = None;
            cmds.push(Command::SetSelection(None));
        }
        self.mode = Mode::Normal;
        (cursor, cmds)
    }

    fn reset_pending(&mut self) {
        self.pending = Pending::Idle;
        self.counts.clear();
    }

    /// Shared motion resolver for bare movement and operator targets; the
    /// two paths differ only in what they do with the result.
    fn resolve_motion<T: LineSource>(
        &self,
        src: &T,
        cursor: Position,
        c: char,
        count: Option<u32>,
    ) -> Option<(Position, MotionShape)> {
        use MotionShape::{Exclusive, Inclusive, Linewise};
        let n = count.unwrap_or(1).max(1);
        let last = src.line_count().saturating_sub(1);
        match c {
            'h' => Some((motion::left(cursor, n), Exclusive)),
            'l' => Some((motion::right(src, cursor, n), Exclusive)),
            '0' => Some((Position::new(cursor.line, 0), Exclusive)),
            '^' => Some((motion::first_non_blank(src, cursor.line), Exclusive)),
            '$' => Some((motion::line_end(src, cursor.line), Inclusive)),
            'w' => Some((motion::word_forward(src, cursor, n), Exclusive)),
            'b' => Some((motion::word_backward(src, cursor, n), Exclusive)),
            'e' => Some((motion::word_end(src, cursor, n), Inclusive)),
            'j' | 'k' => {
                let want = self.preferred_col.unwrap_or(cursor.col);
                Some((motion::vertical(src, cursor, c == 'j', n, want), Linewise))
            }
            '{' => Some((motion::paragraph_backward(src, cursor, n), Exclusive)),
            '}' => Some((motion::paragraph_forward(src, cursor, n), Exclusive)),
            '(' => Some((motion::sentence_backward(src, cursor, n), Exclusive)),
            ')' => Some((motion::sentence_forward(src, cursor, n), Exclusive)),
            'G' => {
                let line = match count {
                    Some(n) if n > 0 => (n - 1).min(last),
                    _ => last,
                };
                Some((Position::new(line, 0), Linewise))
            }
            'H' | 'M' | 'L' => {
                let vp = src.viewport();
                let line = match c {
                    'H' => vp.top,
                    'M' => vp.middle,
                    _ => vp.bottom,
                }
                .min(last);
                Some((motion::first_non_blank(src, line), Linewise))
            }
            '%' => motion::matching_bracket(src, cursor).map(|p| (p, Inclusive)),
            ';' | ',' => {
                let search = self.last_search?;
                let back = if c == ';' { search.back } else { !search.back };
                let pos =
                    motion::find_in_line(src, cursor, search.target, back, search.till, n)?;
                let shape = if back { Exclusive } else { Inclusive };
                Some((pos, shape))
            }
            _ => None,
        }
    }

    fn bare_motion<T: LineSource>(
        &mut self,
        src: &T,
        cursor: Position,
        c: char,
    ) -> Option<(Position, Vec<Command>)> {
        // Vertical moves restore the column chosen before entering a run of
        // j/k; seed it from the cursor the first time.
        if matches!(c, 'j' | 'k') && self.preferred_col.is_none() {
            self.preferred_col = Some(cursor.col);
        }
        let count = self.counts.current;
        let (pos, _) = self.resolve_motion(src, cursor, c, count)?;
        self.counts.clear();
        match c {
            'j' | 'k' => {}
            '0' => self.preferred_col = Some(0),
            _ => self.preferred_col = None,
        }
        Some(self.moved(src, pos))
    }

    /// Emit the cursor move, reselecting in visual mode.
    fn moved<T: LineSource>(&mut self, src: &T, pos: Position) -> (Position, Vec<Command>) {
        let mut cmds = vec![Command::SetCursor(pos)];
        if let Mode::Visual(kind) = self.mode {
            let anchor = self.anchor.unwrap_or(pos);
            let sel = select::normalize(src, anchor, pos, kind);
            cmds.push(Command::SetSelection(Some(sel)));
        }
        (pos, cmds)
    }

    fn operator_target<T: LineSource>(
        &mut self,
        src: &T,
        cursor: Position,
        op: Operator,
        c: char,
    ) -> (Position, Vec<Command>) {
        // Doubled operator (dd/yy/cc): the current line(s), linewise.
        if c == op.key() {
            let n = self.counts.take_or(1);
            let span = Span::Lines {
                start: cursor.line,
                end: cursor.line.saturating_add(n).min(src.line_count()),
            };
            return self.finish_operator(src, cursor, op, Some(span));
        }
        if let Some(prefix) = prefix_for(c, true) {
            self.pending = Pending::OperatorPrefix(op, prefix);
            return (cursor, vec![]);
        }
        let count = self.counts.current;
        match self.resolve_motion(src, cursor, c, count) {
            Some((pos, shape)) => {
                self.counts.clear();
                let span = span_for(src, cursor, pos, shape);
                self.finish_operator(src, cursor, op, span)
            }
            None => {
                self.reset_pending();
                (cursor, vec![])
            }
        }
    }

    fn finish_operator<T: LineSource>(
        &mut self,
        src: &T,
        cursor: Position,
        op: Operator,
        span: Option<Span>,
    ) -> (Position, Vec<Command>) {
        self.reset_pending();
        let Some(span) = span else {
            return (cursor, vec![]);
        };
        match operator::apply(src, op, span, cursor) {
            Some(applied) => self.finish_applied(applied),
            None => (cursor, vec![]),
        }
    }

    fn finish_applied(&mut self, applied: Applied) -> (Position, Vec<Command>) {
        self.register = Some(applied.register);
        if applied.enter_insert {
            self.mode = Mode::Insert;
        }
        self.preferred_col = None;
        (applied.cursor, applied.commands)
    }

    fn resolve_prefix<T: LineSource>(
        &mut self,
        src: &T,
        cursor: Position,
        op: Option<Operator>,
        prefix: Prefix,
        c: char,
    ) -> (Position, Vec<Command>) {
        self.pending = Pending::Idle;
        match prefix {
            Prefix::Find { back, till } => {
                self.last_search = Some(CharSearch {
                    back,
                    till,
                    target: c,
                });
                let n = self.counts.take_or(1);
                let Some(pos) = motion::find_in_line(src, cursor, c, back, till, n) else {
                    return (cursor, vec![]);
                };
                match op {
                    None => {
                        self.preferred_col = None;
                        self.moved(src, pos)
                    }
                    Some(op) => {
                        let shape = if back {
                            MotionShape::Exclusive
                        } else {
                            MotionShape::Inclusive
                        };
                        let span = span_for(src, cursor, pos, shape);
                        self.finish_operator(src, cursor, op, span)
                    }
                }
            }
            Prefix::JumpMark { exact } => {
                let Some(&mark) = self.marks.get(&c) else {
                    self.counts.clear();
                    return (cursor, vec![]);
                };
                match op {
                    None => {
                        self.counts.clear();
                        self.preferred_col = None;
                        let pos = if exact {
                            traits::clamp(src, mark)
                        } else {
                            let line = mark.line.min(src.line_count().saturating_sub(1));
                            motion::first_non_blank(src, line)
                        };
                        self.moved(src, pos)
                    }
                    Some(op) => {
                        let span = if exact {
                            span_for(src, cursor, traits::clamp(src, mark), MotionShape::Exclusive)
                        } else {
                            span_for(
                                src,
                                cursor,
                                Position::new(mark.line, 0),
                                MotionShape::Linewise,
                            )
                        };
                        self.finish_operator(src, cursor, op, span)
                    }
                }
            }
            Prefix::Goto => {
                if c != 'g' {
                    self.reset_pending();
                    return (cursor, vec![]);
                }
                let last = src.line_count().saturating_sub(1);
                let line = match self.counts.take() {
                    Some(n) if n > 0 => (n - 1).min(last),
                    _ => 0,
                };
                let pos = Position::new(line, 0);
                match op {
                    None => {
                        self.preferred_col = None;
                        self.moved(src, pos)
                    }
                    Some(op) => {
                        let span = span_for(src, cursor, pos, MotionShape::Linewise);
                        self.finish_operator(src, cursor, op, span)
                    }
                }
            }
            Prefix::ReplaceChar => {
                let n = self.counts.take_or(1);
                let len = text::line_len(src, cursor.line);
                if cursor.col.saturating_add(n) > len {
                    return (cursor, vec![]);
                }
                let range = Range::new(cursor, Position::new(cursor.line, cursor.col + n));
                let replacement: String = std::iter::repeat_n(c, n as usize).collect();
                let pos = Position::new(cursor.line, cursor.col + n - 1);
                (
                    pos,
                    vec![Command::Replace {
                        range,
                        text: replacement,
                    }],
                )
            }
            Prefix::SetMark => {
                self.counts.clear();
                if c.is_ascii_lowercase() {
                    self.marks.insert(c, cursor);
                }
                (cursor, vec![])
            }
            Prefix::Object(scope) => {
                let Some(op) = op else {
                    self.reset_pending();
                    return (cursor, vec![]);
                };
                let span = object_span(src, cursor, scope, c);
                self.finish_operator(src, cursor, op, span)
            }
        }
    }

    fn command_key<T: LineSource>(
        &mut self,
        src: &T,
        cursor: Position,
        c: char,
    ) -> (Position, Vec<Command>) {
        // Operators: pend in normal mode, apply immediately in visual mode.
        if let Some(op) = Operator::from_key(c) {
            return match self.mode {
                Mode::Visual(kind) => self.apply_visual(src, cursor, op, kind),
                _ => {
                    self.pending = Pending::Operator(op);
                    (cursor, vec![])
                }
            };
        }

        // Keys meaningful in both normal and visual mode.
        match c {
            'v' => return self.toggle_visual(src, cursor, VisualKind::CharWise),
            'V' => return self.toggle_visual(src, cursor, VisualKind::LineWise),
            'x' => {
                if let Mode::Visual(kind) = self.mode {
                    return self.apply_visual(src, cursor, Operator::Delete, kind);
                }
            }
            _ => {}
        }
        if let Some(prefix) = prefix_for(c, false) {
            self.pending = match self.mode {
                Mode::Visual(_) if matches!(prefix, Prefix::ReplaceChar) => {
                    self.counts.clear();
                    return (cursor, vec![]);
                }
                _ => Pending::Prefix(prefix),
            };
            return (cursor, vec![]);
        }

        if matches!(self.mode, Mode::Visual(_)) {
            // Nothing else applies while a selection is active.
            self.counts.clear();
            return (cursor, vec![]);
        }

        match c {
            'i' => {
                self.enter_insert();
                (cursor, vec![])
            }
            'a' => {
                self.enter_insert();
                let pos = motion::right(src, cursor, 1);
                (pos, vec![Command::SetCursor(pos)])
            }
            'I' => {
                self.enter_insert();
                let pos = motion::first_non_blank(src, cursor.line);
                (pos, vec![Command::SetCursor(pos)])
            }
            'A' => {
                self.enter_insert();
                let pos = Position::new(cursor.line, text::line_len(src, cursor.line));
                (pos, vec![Command::SetCursor(pos)])
            }
            'o' => {
                self.enter_insert();
                let at = Position::new(cursor.line, text::line_len(src, cursor.line));
                let pos = Position::new(cursor.line + 1, 0);
                (
                    pos,
                    vec![Command::InsertText {
                        at,
                        text: "\n".to_string(),
                    }],
                )
            }
            'O' => {
                self.enter_insert();
                let at = Position::new(cursor.line, 0);
                (
                    at,
                    vec![Command::InsertText {
                        at,
                        text: "\n".to_string(),
                    }],
                )
            }
            'x' => self.chars_at_cursor(src, cursor, Operator::Delete),
            's' => self.chars_at_cursor(src, cursor, Operator::Change),
            'D' => self.to_line_end(src, cursor, Operator::Delete),
            'C' => self.to_line_end(src, cursor, Operator::Change),
            'S' => self.whole_lines(src, cursor, Operator::Change),
            'Y' => self.whole_lines(src, cursor, Operator::Yank),
            'J' => self.join(src, cursor),
            '~' => self.tilde(src, cursor),
            'u' => {
                self.counts.clear();
                (cursor, vec![Command::Undo])
            }
            'p' => self.paste(src, cursor, true),
            'P' => self.paste(src, cursor, false),
            _ => {
                self.reset_pending();
                (cursor, vec![])
            }
        }
    }

    fn enter_insert(&mut self) {
        self.mode = Mode::Insert;
        self.reset_pending();
    }

    fn toggle_visual<T: LineSource>(
        &mut self,
        src: &T,
        cursor: Position,
        kind: VisualKind,
    ) -> (Position, Vec<Command>) {
        self.counts.clear();
        match self.mode {
            Mode::Visual(k) if k == kind => {
                self.mode = Mode::Normal;
                self.anchor = None;
                (cursor, vec![Command::SetSelection(None)])
            }
            Mode::Visual(_) => {
                self.mode = Mode::Visual(kind);
                let anchor = self.anchor.unwrap_or(cursor);
                let sel = select::normalize(src, anchor, cursor, kind);
                (cursor, vec![Command::SetSelection(Some(sel))])
            }
            _ => {
                self.mode = Mode::Visual(kind);
                self.anchor = Some(cursor);
                let sel = select::normalize(src, cursor, cursor, kind);
                (cursor, vec![Command::SetSelection(Some(sel))])
            }
        }
    }

    fn apply_visual<T: LineSource>(
        &mut self,
        src: &T,
        cursor: Position,
        op: Operator,
        kind: VisualKind,
    ) -> (Position, Vec<Command>) {
        let anchor = self.anchor.take().unwrap_or(cursor);
        let span = select::span(src, anchor, cursor, kind);
        let origin = if anchor <= cursor { anchor } else { cursor };
        self.mode = Mode::Normal;
        self.counts.clear();
        let (pos, mut cmds) = match operator::apply(src, op, span, origin) {
            Some(applied) => self.finish_applied(applied),
            None => (cursor, vec![]),
        };
        cmds.push(Command::SetSelection(None));
        (pos, cmds)
    }

    /// `x`/`s`: count characters starting at the cursor.
    fn chars_at_cursor<T: LineSource>(
        &mut self,
        src: &T,
        cursor: Position,
        op: Operator,
    ) -> (Position, Vec<Command>) {
        let n = self.counts.take_or(1);
        let len = text::line_len(src, cursor.line);
        let end = cursor.col.saturating_add(n).min(len);
        let span = Span::Chars(Range::new(cursor, Position::new(cursor.line, end)));
        self.finish_operator(src, cursor, op, Some(span))
    }

    /// `D`/`C`: from the cursor through the end of the line.
    fn to_line_end<T: LineSource>(
        &mut self,
        src: &T,
        cursor: Position,
        op: Operator,
    ) -> (Position, Vec<Command>) {
        self.counts.clear();
        let len = text::line_len(src, cursor.line);
        let span = Span::Chars(Range::new(cursor, Position::new(cursor.line, len)));
        self.finish_operator(src, cursor, op, Some(span))
    }

    /// `S`/`Y`: count whole lines from the cursor line.
    fn whole_lines<T: LineSource>(
        &mut self,
        src: &T,
        cursor: Position,
        op: Operator,
    ) -> (Position, Vec<Command>) {
        let n = self.counts.take_or(1);
        let span = Span::Lines {
            start: cursor.line,
            end: cursor.line.saturating_add(n).min(src.line_count()),
        };
        self.finish_operator(src, cursor, op, Some(span))
    }

    /// `J`: join the next line(s) onto this one with single spaces,
    /// collapsing leading blanks, as one atomic replacement.
    fn join<T: LineSource>(&mut self, src: &T, cursor: Position) -> (Position, Vec<Command>) {
        let n = self.counts.take_or(1).max(2);
        let total = src.line_count();
        if cursor.line + 1 >= total {
            return (cursor, vec![]);
        }
        let last = cursor.line.saturating_add(n - 1).min(total - 1);
        let first_len = text::line_len(src, cursor.line);
        let mut replacement = String::new();
        for l in (cursor.line + 1)..last {
            replacement.push(' ');
            replacement.push_str(src.line(l).trim_start());
        }
        replacement.push(' ');
        let end = Position::new(last, text::first_non_blank(&src.line(last)));
        let range = Range::new(Position::new(cursor.line, first_len), end);
        let pos = range.start;
        (
            pos,
            vec![Command::Replace {
                range,
                text: replacement,
            }],
        )
    }

    /// `~`: toggle case under the cursor, advancing.
    fn tilde<T: LineSource>(&mut self, src: &T, cursor: Position) -> (Position, Vec<Command>) {
        let n = self.counts.take_or(1);
        let line_text = src.line(cursor.line);
        let cells = text::graphemes(&line_text);
        let len = cells.len() as u32;
        if cursor.col >= len {
            return (cursor, vec![]);
        }
        let end = cursor.col.saturating_add(n).min(len);
        let flipped: String = cells[cursor.col as usize..end as usize]
            .iter()
            .flat_map(|g| g.chars())
            .map(|ch| {
                if ch.is_uppercase() {
                    ch.to_lowercase().next().unwrap_or(ch)
                } else if ch.is_lowercase() {
                    ch.to_uppercase().next().unwrap_or(ch)
                } else {
                    ch
                }
            })
            .collect();
        let range = Range::new(cursor, Position::new(cursor.line, end));
        let pos = Position::new(cursor.line, end.min(len.saturating_sub(1)));
        (pos, vec![Command::Replace { range, text: flipped }])
    }

    /// `p`/`P`: splice the register back in, after or before the cursor.
    fn paste<T: LineSource>(
        &mut self,
        src: &T,
        cursor: Position,
        after: bool,
    ) -> (Position, Vec<Command>) {
        let n = self.counts.take_or(1);
        let Some(register) = self.register.clone() else {
            return (cursor, vec![]);
        };
        match register {
            Register::Chars(s) if s.is_empty() => (cursor, vec![]),
            Register::Chars(s) => {
                let len = text::line_len(src, cursor.line);
                let base = if after { (cursor.col + 1).min(len) } else { cursor.col };
                if s.contains('\n') {
                    let at = Position::new(cursor.line, base);
                    let text = s.repeat(n as usize);
                    return (at, vec![Command::InsertText { at, text }]);
                }
                let step = text::graphemes(&s).len() as u32;
                let cmds = (0..n)
                    .map(|i| Command::InsertText {
                        at: Position::new(
                            cursor.line,
                            base.saturating_add(i.saturating_mul(step)),
                        ),
                        text: s.clone(),
                    })
                    .collect();
                (Position::new(cursor.line, base), cmds)
            }
            Register::Lines(lines) => {
                let mut all = Vec::with_capacity(lines.len() * n as usize);
                for _ in 0..n {
                    all.extend(lines.iter().cloned());
                }
                if after {
                    if cursor.line + 1 >= src.line_count() {
                        // Below the last line: splice via a leading newline
                        // so no dangling empty line is created.
                        let at =
                            Position::new(cursor.line, text::line_len(src, cursor.line));
                        let text = format!("\n{}", all.join("\n"));
                        (
                            Position::new(cursor.line + 1, 0),
                            vec![Command::InsertText { at, text }],
                        )
                    } else {
                        let at = Position::new(cursor.line + 1, 0);
                        let text = all.join("\n") + "\n";
                        (at, vec![Command::InsertText { at, text }])
                    }
                } else {
                    let at = Position::new(cursor.line, 0);
                    let text = all.join("\n") + "\n";
                    (at, vec![Command::InsertText { at, text }])
                }
            }
        }
    }
}

/// Prefix-introducing keys. Text-object introducers `i`/`a` only pend while
/// an operator is waiting; bare, those keys mean insert/append.
fn prefix_for(c: char, operator_pending: bool) -> Option<Prefix> {
    match c {
        'f' => Some(Prefix::Find {
            back: false,
            till: false,
        }),
        'F' => Some(Prefix::Find {
            back: true,
            till: false,
        }),
        't' => Some(Prefix::Find {
            back: false,
            till: true,
        }),
        'T' => Some(Prefix::Find {
            back: true,
            till: true,
        }),
        '\'' => Some(Prefix::JumpMark { exact: false }),
        '`' => Some(Prefix::JumpMark { exact: true }),
        'g' => Some(Prefix::Goto),
        'r' if !operator_pending => Some(Prefix::ReplaceChar),
        'm' if !operator_pending => Some(Prefix::SetMark),
        'i' if operator_pending => Some(Prefix::Object(Scope::Inner)),
        'a' if operator_pending => Some(Prefix::Object(Scope::Around)),
        _ => None,
    }
}

/// Build an operator target from a resolved motion, honoring its
/// inclusivity. Returns `None` for empty character spans.
fn span_for<T: LineSource>(
    src: &T,
    cursor: Position,
    pos: Position,
    shape: MotionShape,
) -> Option<Span> {
    match shape {
        MotionShape::Linewise => Some(Span::Lines {
            start: cursor.line.min(pos.line),
            end: cursor.line.max(pos.line) + 1,
        }),
        MotionShape::Exclusive | MotionShape::Inclusive => {
            let (a, b) = if pos >= cursor { (cursor, pos) } else { (pos, cursor) };
            let b = if shape == MotionShape::Inclusive {
                motion::past(src, b)
            } else {
                b
            };
            let range = Range::new(a, b);
            (!range.is_empty()).then_some(Span::Chars(range))
        }
    }
}

fn object_span<T: LineSource>(
    src: &T,
    cursor: Position,
    scope: Scope,
    c: char,
) -> Option<Span> {
    match c {
        'w' => object::word(src, cursor, scope),
        '"' | '\'' | '`' => object::quoted(src, cursor, c, scope),
        '(' | ')' | 'b' => object::bracketed(src, cursor, '(', ')', scope),
        '[' | ']' => object::bracketed(src, cursor, '[', ']', scope),
        '{' | '}' | 'B' => object::bracketed(src, cursor, '{', '}', scope),
        '<' | '>' => object::bracketed(src, cursor, '<', '>', scope),
        'p' => object::paragraph(src, cursor, scope),
        's' => object::sentence(src, cursor, scope),
        _ => None,
    }
}
