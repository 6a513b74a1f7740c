use vicmd::{
    Clipboard, Command, Engine, InputEvent, KeyEvent, Position, Register,
    apply_clipboard_commands,
};

mod support;
use support::mock_buffer::MockBuffer;
use support::mock_clipboard::MockClipboard;

fn key(c: char) -> InputEvent {
    InputEvent::Key(KeyEvent::char(c))
}

#[test]
fn yw_fills_register_and_emits_clipboard_copy() {
    let buf = MockBuffer::new("hello world");
    let mut eng = Engine::new();
    let cur = Position { line: 0, col: 0 };

    eng.handle_event(&buf, cur, key('y'));
    let (new_cur, cmds) = eng.handle_event(&buf, cur, key('w'));
    assert_eq!(new_cur, cur);
    assert_eq!(cmds, vec![Command::CopyToClipboard("hello ".to_string())]);
    assert_eq!(eng.register(), Some(&Register::Chars("hello ".to_string())));
}

#[test]
fn clipboard_glue_executes_copy_commands() {
    let buf = MockBuffer::new("hello world");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();
    let cur = Position { line: 0, col: 0 };

    eng.handle_event(&buf, cur, key('y'));
    let (_, cmds) = eng.handle_event(&buf, cur, key('w'));
    apply_clipboard_commands(&mut clipboard, &cmds);
    assert_eq!(clipboard.get(), Some("hello ".to_string()));
}

#[test]
fn yy_yanks_the_line_with_trailing_newline() {
    let buf = MockBuffer::new("one\ntwo");
    let mut eng = Engine::new();
    let cur = Position { line: 0, col: 2 };

    eng.handle_event(&buf, cur, key('y'));
    let (new_cur, cmds) = eng.handle_event(&buf, cur, key('y'));
    assert_eq!(new_cur, cur); // yank does not move the cursor
    assert_eq!(cmds, vec![Command::CopyToClipboard("one\n".to_string())]);
    assert_eq!(
        eng.register(),
        Some(&Register::Lines(vec!["one".to_string()]))
    );
}

#[test]
fn upward_linewise_yank_moves_to_the_top_line() {
    let buf = MockBuffer::new("one\ntwo\nthree");
    let mut eng = Engine::new();
    let cur = Position { line: 2, col: 1 };

    eng.handle_event(&buf, cur, key('y'));
    let (new_cur, _) = eng.handle_event(&buf, cur, key('k'));
    assert_eq!(new_cur, Position { line: 1, col: 1 });
    assert_eq!(
        eng.register(),
        Some(&Register::Lines(vec![
            "two".to_string(),
            "three".to_string(),
        ]))
    );
}

#[test]
fn delete_also_fills_the_register() {
    let buf = MockBuffer::new("hello");
    let mut eng = Engine::new();
    let cur = Position::ZERO;

    eng.handle_event(&buf, cur, key('d'));
    eng.handle_event(&buf, cur, key('2'));
    eng.handle_event(&buf, cur, key('l'));
    assert_eq!(eng.register(), Some(&Register::Chars("he".to_string())));
}

#[test]
fn paste_with_empty_register_is_a_noop() {
    let buf = MockBuffer::new("abc");
    let mut eng = Engine::new();
    let cur = Position { line: 0, col: 1 };
    let (new_cur, cmds) = eng.handle_event(&buf, cur, key('p'));
    assert_eq!(new_cur, cur);
    assert!(cmds.is_empty());
}

#[test]
fn charwise_paste_after_and_before() {
    let buf = MockBuffer::new("abc");
    let mut eng = Engine::new();
    let cur = Position { line: 0, col: 1 };

    // Yank "b".
    eng.handle_event(&buf, cur, key('y'));
    eng.handle_event(&buf, cur, key('l'));

    // p inserts after the cursor cell.
    let (new_cur, cmds) = eng.handle_event(&buf, cur, key('p'));
    assert_eq!(new_cur, Position { line: 0, col: 2 });
    assert_eq!(
        cmds,
        vec![Command::InsertText {
            at: Position { line: 0, col: 2 },
            text: "b".to_string(),
        }]
    );

    // P inserts at the cursor cell.
    let (new_cur, cmds) = eng.handle_event(&buf, cur, key('P'));
    assert_eq!(new_cur, cur);
    assert_eq!(
        cmds,
        vec![Command::InsertText {
            at: cur,
            text: "b".to_string(),
        }]
    );
}

#[test]
fn counted_charwise_paste_repeats() {
    let buf = MockBuffer::new("abc");
    let mut eng = Engine::new();
    let cur = Position { line: 0, col: 0 };

    eng.handle_event(&buf, cur, key('y'));
    eng.handle_event(&buf, cur, key('l'));

    eng.handle_event(&buf, cur, key('3'));
    let (_, cmds) = eng.handle_event(&buf, cur, key('p'));
    assert_eq!(cmds.len(), 3);
    assert_eq!(
        cmds[2],
        Command::InsertText {
            at: Position { line: 0, col: 3 },
            text: "a".to_string(),
        }
    );
}

#[test]
fn paste_at_line_end_clamps() {
    let buf = MockBuffer::new("ab");
    let mut eng = Engine::new();

    eng.handle_event(&buf, Position::ZERO, key('y'));
    eng.handle_event(&buf, Position::ZERO, key('l'));

    // Cursor on the end-of-line slot: p clamps the insert point to len.
    let (new_cur, cmds) = eng.handle_event(&buf, Position { line: 0, col: 2 }, key('p'));
    assert_eq!(new_cur, Position { line: 0, col: 2 });
    assert_eq!(
        cmds,
        vec![Command::InsertText {
            at: Position { line: 0, col: 2 },
            text: "a".to_string(),
        }]
    );
}

#[test]
fn linewise_paste_below_and_above() {
    let buf = MockBuffer::new("one\ntwo\nthree");
    let mut eng = Engine::new();
    let cur = Position { line: 0, col: 2 };

    eng.handle_event(&buf, cur, key('y'));
    eng.handle_event(&buf, cur, key('y'));

    // p opens below the cursor line.
    let (new_cur, cmds) = eng.handle_event(&buf, cur, key('p'));
    assert_eq!(new_cur, Position { line: 1, col: 0 });
    assert_eq!(
        cmds,
        vec![Command::InsertText {
            at: Position { line: 1, col: 0 },
            text: "one\n".to_string(),
        }]
    );

    // P opens above it.
    let (new_cur, cmds) = eng.handle_event(&buf, cur, key('P'));
    assert_eq!(new_cur, Position { line: 0, col: 0 });
    assert_eq!(
        cmds,
        vec![Command::InsertText {
            at: Position { line: 0, col: 0 },
            text: "one\n".to_string(),
        }]
    );
}

#[test]
fn linewise_paste_below_the_last_line() {
    let buf = MockBuffer::new("z");
    let mut eng = Engine::new();
    let cur = Position { line: 0, col: 0 };

    eng.handle_event(&buf, cur, key('y'));
    eng.handle_event(&buf, cur, key('y'));

    // No line below: splice with a leading newline at the end of the line.
    let (new_cur, cmds) = eng.handle_event(&buf, cur, key('p'));
    assert_eq!(new_cur, Position { line: 1, col: 0 });
    assert_eq!(
        cmds,
        vec![Command::InsertText {
            at: Position { line: 0, col: 1 },
            text: "\nz".to_string(),
        }]
    );
}

#[test]
fn counted_linewise_paste_repeats_lines() {
    let buf = MockBuffer::new("ab\ncd\nef");
    let mut eng = Engine::new();
    let cur = Position { line: 0, col: 0 };

    eng.handle_event(&buf, cur, key('y'));
    eng.handle_event(&buf, cur, key('y'));

    eng.handle_event(&buf, cur, key('2'));
    let (_, cmds) = eng.handle_event(&buf, cur, key('P'));
    assert_eq!(
        cmds,
        vec![Command::InsertText {
            at: Position { line: 0, col: 0 },
            text: "ab\nab\n".to_string(),
        }]
    );
}

#[test]
fn multiline_charwise_yank_pastes_in_one_piece() {
    let buf = MockBuffer::new("abcd\nefgh");
    let mut eng = Engine::new();
    let cur = Position { line: 0, col: 2 };

    // A charwise cross-line register comes from a visual yank.
    eng.handle_event(&buf, cur, key('v'));
    eng.handle_event(&buf, cur, key('j'));
    eng.handle_event(&buf, Position { line: 1, col: 2 }, key('y'));
    assert_eq!(
        eng.register(),
        Some(&Register::Chars("cd\nef".to_string()))
    );

    let (new_cur, cmds) = eng.handle_event(&buf, Position { line: 0, col: 0 }, key('p'));
    assert_eq!(new_cur, Position { line: 0, col: 1 });
    assert_eq!(cmds.len(), 1);
    assert!(matches!(
        &cmds[0],
        Command::InsertText { text, .. } if text == "cd\nef"
    ));
}

#[test]
fn counted_multiline_charwise_paste_repeats() {
    let buf = MockBuffer::new("abcd\nefgh");
    let mut eng = Engine::new();
    let cur = Position { line: 0, col: 2 };

    eng.handle_event(&buf, cur, key('v'));
    eng.handle_event(&buf, cur, key('j'));
    eng.handle_event(&buf, Position { line: 1, col: 2 }, key('y'));

    let at = Position { line: 0, col: 1 };
    eng.handle_event(&buf, at, key('2'));
    let (_, cmds) = eng.handle_event(&buf, at, key('p'));
    assert_eq!(
        cmds,
        vec![Command::InsertText {
            at: Position { line: 0, col: 2 },
            text: "cd\nefcd\nef".to_string(),
        }]
    );
}
