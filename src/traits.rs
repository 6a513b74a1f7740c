use crate::types::Position;

/// Viewport geometry for the screen-relative motions (`H`/`M`/`L`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visible line.
    pub top: u32,
    /// Middle visible line.
    pub middle: u32,
    /// Last visible line.
    pub bottom: u32,
}

/// Read-only line access the engine needs from its host.
///
/// Any host buffer implements this; the engine depends on nothing else about
/// the document representation. The host guarantees the snapshot stays
/// unchanged for the duration of a single key event.
pub trait LineSource {
    fn line_count(&self) -> u32;

    /// The text of one line, without its trailing newline. Out-of-range
    /// indices return an empty string.
    fn line(&self, index: u32) -> String;

    /// Visible line range for screen-relative motions. Hosts without a
    /// scrolling viewport can rely on this default covering the whole buffer.
    fn viewport(&self) -> Viewport {
        let last = self.line_count().saturating_sub(1);
        Viewport {
            top: 0,
            middle: last / 2,
            bottom: last,
        }
    }
}

/// System clipboard access, used by host integration glue.
///
/// Yanks emit [`crate::types::Command::CopyToClipboard`] rather than writing
/// the clipboard directly, so the pure register computation stays separate
/// from the side effect.
pub trait Clipboard {
    fn get(&mut self) -> Option<String>;
    fn set(&mut self, text: String);
}

/// Executes any `CopyToClipboard` commands in a command batch. Failures are
/// the clipboard implementation's to swallow; the engine never retries.
pub fn apply_clipboard_commands<C: Clipboard>(clipboard: &mut C, commands: &[crate::types::Command]) {
    for cmd in commands {
        if let crate::types::Command::CopyToClipboard(text) = cmd {
            clipboard.set(text.clone());
        }
    }
}

/// A [`Clipboard`] backed by the system clipboard via `arboard`.
#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            inner: arboard::Clipboard::new().ok(),
        }
    }
}

#[cfg(feature = "clipboard")]
impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn get(&mut self) -> Option<String> {
        self.inner.as_mut().and_then(|c| c.get_text().ok())
    }

    fn set(&mut self, text: String) {
        if let Some(c) = self.inner.as_mut() {
            let _ = c.set_text(text);
        }
    }
}

/// Convenience: clamp a position into the valid coordinates of a source.
pub(crate) fn clamp<T: LineSource + ?Sized>(src: &T, pos: Position) -> Position {
    let last_line = src.line_count().saturating_sub(1);
    let line = pos.line.min(last_line);
    let col = pos.col.min(crate::text::line_len(src, line));
    Position { line, col }
}
