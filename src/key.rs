//! Platform-agnostic input events. Hosts translate their own key events
//! into these before handing them to the engine.

/// The keys the interpreter reacts to. Commands arrive as printable
/// characters; everything else the engine cares about is a named key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A character key, with shift already applied ('A', not shift+'a').
    Char(char),
    /// Escape: cancel pending input, leave insert or visual mode.
    Esc,
    /// Enter/Return, meaningful in insert mode.
    Enter,
    /// Backspace, meaningful in insert mode.
    Backspace,
}

bitflags::bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// A single key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: Modifiers,
}

impl KeyEvent {
    pub fn char(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            mods: Modifiers::empty(),
        }
    }

    pub fn code(code: KeyCode) -> Self {
        Self {
            code,
            mods: Modifiers::empty(),
        }
    }
}

/// What the host feeds the engine.
///
/// Key presses drive commands; `ReceivedChar` carries composed text input
/// (IME and dead keys included) and is only meaningful in insert mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    ReceivedChar(char),
}
