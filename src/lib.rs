//! A modal command interpreter for text editing, in the vi tradition.
//!
//! The engine owns no text. A host hands it a read-only buffer snapshot
//! (anything implementing [`LineSource`]), the current cursor, and one input
//! event; the engine returns the new cursor and a batch of [`Command`]s for
//! the host to apply. All modal state (mode, pending operator, counts,
//! marks, the register) lives inside [`Engine`].
//!
//! ```
//! use vicmd::{Engine, InputEvent, KeyEvent, LineSource, Position};
//!
//! struct Buffer(Vec<String>);
//!
//! impl LineSource for Buffer {
//!     fn line_count(&self) -> u32 {
//!         self.0.len() as u32
//!     }
//!     fn line(&self, index: u32) -> String {
//!         self.0.get(index as usize).cloned().unwrap_or_default()
//!     }
//! }
//!
//! let buf = Buffer(vec!["hello world".to_string()]);
//! let mut engine = Engine::new();
//! let (pos, _cmds) = engine.handle_event(
//!     &buf,
//!     Position::ZERO,
//!     InputEvent::Key(KeyEvent::char('w')),
//! );
//! assert_eq!(pos, Position::new(0, 6));
//! ```

pub mod engine;
pub mod key;
pub mod motion;
pub mod object;
pub mod operator;
pub mod select;
pub mod text;
pub mod traits;
pub mod types;

pub use crate::engine::{Engine, EngineBuilder, EngineSnapshot};
pub use crate::key::{InputEvent, KeyCode, KeyEvent, Modifiers};
pub use crate::operator::Operator;
pub use crate::traits::{Clipboard, LineSource, Viewport, apply_clipboard_commands};
pub use crate::types::{
    Command, Mode, Position, Range, Register, Selection, Span, VisualKind,
};

#[cfg(feature = "clipboard")]
pub use crate::traits::SystemClipboard;
