use ropey::Rope;
use unicode_segmentation::UnicodeSegmentation;
use vicmd::LineSource;

/// A rope-backed line source for tests. A trailing newline terminates the
/// last line rather than opening a new empty one.
pub struct MockBuffer {
    rope: Rope,
    trailing_newline: bool,
}

impl MockBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            trailing_newline: text.ends_with('\n'),
        }
    }

    pub fn grapheme_len(&self, line: u32) -> u32 {
        self.line(line).graphemes(true).count() as u32
    }
}

impl LineSource for MockBuffer {
    fn line_count(&self) -> u32 {
        let n = self.rope.len_lines() as u32;
        if self.trailing_newline && n > 1 { n - 1 } else { n }
    }

    fn line(&self, index: u32) -> String {
        if index >= self.line_count() {
            return String::new();
        }
        let mut s = self.rope.line(index as usize).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }
}
