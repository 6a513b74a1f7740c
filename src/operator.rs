//! The operator applier: turns a resolved span plus an editing verb into
//! host commands, a register value, and the resulting cursor position.

use crate::text;
use crate::traits::LineSource;
use crate::types::{Command, Position, Range, Register, Span};

/// The editing verbs that consume a motion's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Delete,
    Change,
    Yank,
}

impl Operator {
    pub(crate) fn from_key(c: char) -> Option<Operator> {
        match c {
            'd' => Some(Operator::Delete),
            'c' => Some(Operator::Change),
            'y' => Some(Operator::Yank),
            _ => None,
        }
    }

    pub(crate) fn key(self) -> char {
        match self {
            Operator::Delete => 'd',
            Operator::Change => 'c',
            Operator::Yank => 'y',
        }
    }
}

/// The outcome of applying an operator. `None` from [`apply`] means the
/// target was empty: no commands, no register write.
#[derive(Debug, Clone)]
pub struct Applied {
    pub cursor: Position,
    pub commands: Vec<Command>,
    pub register: Register,
    pub enter_insert: bool,
}

/// Apply `op` to `span`. `cursor` is the position the command started from,
/// used to keep the column on linewise operations.
pub fn apply<T: LineSource + ?Sized>(
    src: &T,
    op: Operator,
    span: Span,
    cursor: Position,
) -> Option<Applied> {
    match span {
        Span::Chars(range) => apply_chars(src, op, range, cursor),
        Span::Lines { start, end } => apply_lines(src, op, start, end, cursor),
    }
}

fn apply_chars<T: LineSource + ?Sized>(
    src: &T,
    op: Operator,
    range: Range,
    _cursor: Position,
) -> Option<Applied> {
    if range.is_empty() {
        return None;
    }
    let content = text::slice(src, range);
    let register = Register::Chars(content.clone());
    let applied = match op {
        Operator::Yank => Applied {
            cursor: range.start,
            commands: vec![Command::CopyToClipboard(content)],
            register,
            enter_insert: false,
        },
        Operator::Delete => Applied {
            cursor: range.start,
            commands: vec![Command::Delete { range }],
            register,
            enter_insert: false,
        },
        Operator::Change => Applied {
            cursor: range.start,
            commands: vec![Command::Delete { range }],
            register,
            enter_insert: true,
        },
    };
    Some(applied)
}

fn apply_lines<T: LineSource + ?Sized>(
    src: &T,
    op: Operator,
    start: u32,
    end: u32,
    cursor: Position,
) -> Option<Applied> {
    let total = src.line_count();
    let start = start.min(total);
    let end = end.min(total);
    if start >= end {
        return None;
    }
    let lines: Vec<String> = (start..end).map(|l| src.line(l)).collect();
    let register = Register::Lines(lines.clone());
    match op {
        Operator::Yank => {
            // The cursor lands on the top line of the yanked range, keeping
            // its column where the line allows.
            let max_col = text::line_len(src, start).saturating_sub(1);
            Some(Applied {
                cursor: Position::new(start, cursor.col.min(max_col)),
                commands: vec![Command::CopyToClipboard(lines.join("\n") + "\n")],
                register,
                enter_insert: false,
            })
        }
        Operator::Delete => {
            let (range, land_line) = if end >= total && start > 0 {
                // Deleting through the final line: pull the preceding
                // newline instead of leaving a dangling empty last line.
                let prev = start - 1;
                let range = Range::new(
                    Position::new(prev, text::line_len(src, prev)),
                    Position::new(end - 1, text::line_len(src, end - 1)),
                );
                (range, prev)
            } else if end >= total {
                // Every line is going away; a buffer always keeps at least
                // one line, so clear the content in place.
                let last = total - 1;
                let range = Range::new(
                    Position::ZERO,
                    Position::new(last, text::line_len(src, last)),
                );
                (range, 0)
            } else {
                (
                    Range::new(Position::new(start, 0), Position::new(end, 0)),
                    start,
                )
            };
            if range.is_empty() {
                return None;
            }
            // Clamp the column into the line that ends up under the cursor.
            let survivor = if end < total {
                src.line(end)
            } else if start > 0 {
                src.line(start - 1)
            } else {
                String::new()
            };
            let max_col = text::graphemes(&survivor).len() as u32;
            let col = cursor.col.min(max_col.saturating_sub(1));
            Some(Applied {
                cursor: Position::new(land_line, col),
                commands: vec![Command::Delete { range }],
                register,
                enter_insert: false,
            })
        }
        Operator::Change => {
            // Each affected line is emptied but not removed, preserving the
            // line count; the cursor stays on the first one.
            let commands = (start..end)
                .filter_map(|l| {
                    let len = text::line_len(src, l);
                    (len > 0).then_some(Command::Replace {
                        range: Range::new(Position::new(l, 0), Position::new(l, len)),
                        text: String::new(),
                    })
                })
                .collect();
            Some(Applied {
                cursor: Position::new(start, 0),
                commands,
                register,
                enter_insert: true,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Buf(Vec<&'static str>);

    impl LineSource for Buf {
        fn line_count(&self) -> u32 {
            self.0.len() as u32
        }
        fn line(&self, index: u32) -> String {
            self.0
                .get(index as usize)
                .map(|s| s.to_string())
                .unwrap_or_default()
        }
    }

    #[test]
    fn empty_charwise_range_is_a_noop() {
        let buf = Buf(vec!["abc"]);
        let span = Span::Chars(Range::new(Position::new(0, 2), Position::new(0, 2)));
        assert!(apply(&buf, Operator::Delete, span, Position::ZERO).is_none());
    }

    #[test]
    fn linewise_delete_of_final_line_pulls_previous_newline() {
        let buf = Buf(vec!["a", "b", "c"]);
        let applied = apply(
            &buf,
            Operator::Delete,
            Span::Lines { start: 2, end: 3 },
            Position::new(2, 0),
        )
        .unwrap();
        assert_eq!(
            applied.commands,
            vec![Command::Delete {
                range: Range::new(Position::new(1, 1), Position::new(2, 1)),
            }]
        );
        assert_eq!(applied.cursor, Position::new(1, 0));
        assert_eq!(applied.register, Register::Lines(vec!["c".to_string()]));
    }

    #[test]
    fn deleting_every_line_clears_in_place() {
        let buf = Buf(vec!["only"]);
        let applied = apply(
            &buf,
            Operator::Delete,
            Span::Lines { start: 0, end: 1 },
            Position::new(0, 2),
        )
        .unwrap();
        assert_eq!(
            applied.commands,
            vec![Command::Delete {
                range: Range::new(Position::ZERO, Position::new(0, 4)),
            }]
        );
        assert_eq!(applied.cursor, Position::ZERO);
    }

    #[test]
    fn linewise_change_empties_lines_without_removing_them() {
        let buf = Buf(vec!["aa", "bb", "cc"]);
        let applied = apply(
            &buf,
            Operator::Change,
            Span::Lines { start: 0, end: 2 },
            Position::new(0, 1),
        )
        .unwrap();
        assert_eq!(applied.commands.len(), 2);
        assert!(applied.enter_insert);
        assert_eq!(applied.cursor, Position::ZERO);
        assert_eq!(
            applied.register,
            Register::Lines(vec!["aa".to_string(), "bb".to_string()])
        );
    }

    #[test]
    fn linewise_yank_lands_on_the_top_line() {
        let buf = Buf(vec!["alpha", "beta", "gamma"]);
        let applied = apply(
            &buf,
            Operator::Yank,
            Span::Lines { start: 0, end: 2 },
            Position::new(1, 3),
        )
        .unwrap();
        assert_eq!(applied.cursor, Position::new(0, 3));
        assert_eq!(
            applied.commands,
            vec![Command::CopyToClipboard("alpha\nbeta\n".to_string())]
        );
    }

    #[test]
    fn yank_leaves_the_buffer_untouched() {
        let buf = Buf(vec!["hello world"]);
        let span = Span::Chars(Range::new(Position::ZERO, Position::new(0, 5)));
        let applied = apply(&buf, Operator::Yank, span, Position::new(0, 3)).unwrap();
        assert_eq!(
            applied.commands,
            vec![Command::CopyToClipboard("hello".to_string())]
        );
        assert_eq!(applied.register, Register::Chars("hello".to_string()));
        assert_eq!(applied.cursor, Position::ZERO);
    }
}
