//! Normalized events delivered to the session event callback
//!
//! Events are transient values: the session builds one, hands a reference to
//! the callback, and drops it.

pub mod translator;

pub use translator::{EventTranslator, GeometryChange, KeyAction};

use crate::input::{KeyCode, KeyMod, MouseButton};
use crate::window::{DisplayMode, WindowId};
use std::path::PathBuf;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A mapped key was pressed (or auto-repeated)
    KeyDown,
    /// A mapped key was released
    KeyUp,
    /// Cursor moved inside a window
    MouseMove,
    /// Cursor entered a window
    MouseEnter,
    /// Cursor left a window
    MouseLeave,
    /// Mouse button pressed or released
    MouseButton,
    /// Window size changed
    WindowResized,
    /// Window position changed
    WindowMoved,
    /// Window gained or lost input focus
    WindowFocus,
    /// Window display mode changed
    DisplayModeChanged,
    /// A file drop gesture began
    FileDropStart,
    /// One file of the current drop gesture
    FileDropped,
    /// The file drop gesture finished
    FileDropEnd,
}

/// A normalized platform event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    /// Window the event originated from
    pub window: WindowId,
    /// Key for `KeyDown` / `KeyUp`
    pub keycode: Option<KeyCode>,
    /// Modifiers held when the event was translated
    pub keymod: KeyMod,
    /// Auto-repeat flag, only ever set on `KeyDown`
    pub repeat: bool,
    /// Path of the dropped file for `FileDropped`
    pub filename: Option<PathBuf>,
    /// Button for `MouseButton`
    pub button: Option<MouseButton>,
    /// Button pressed / focus gained
    pub pressed: bool,
    /// Cursor position in window coordinates for `MouseMove`
    pub cursor: Option<(f64, f64)>,
    /// New mode for `DisplayModeChanged`
    pub display_mode: Option<DisplayMode>,
}

impl Event {
    /// Create an event of the given type with every payload field empty
    pub const fn new(event_type: EventType, window: WindowId) -> Self {
        Self {
            event_type,
            window,
            keycode: None,
            keymod: KeyMod::empty(),
            repeat: false,
            filename: None,
            button: None,
            pressed: false,
            cursor: None,
            display_mode: None,
        }
    }

    /// Attach a key code and its modifiers (builder pattern)
    pub fn with_key(mut self, keycode: KeyCode, keymod: KeyMod) -> Self {
        self.keycode = Some(keycode);
        self.keymod = keymod;
        self
    }

    /// Mark the event as an auto-repeat
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    /// Attach a dropped file path
    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Attach a mouse button
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    /// Set the pressed / focused flag
    pub fn with_pressed(mut self, pressed: bool) -> Self {
        self.pressed = pressed;
        self
    }

    /// Attach a cursor position
    pub fn with_cursor(mut self, x: f64, y: f64) -> Self {
        self.cursor = Some((x, y));
        self
    }

    /// Attach a display mode
    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = Some(mode);
        self
    }

    /// Whether this is a key press or release
    pub const fn is_key(&self) -> bool {
        matches!(self.event_type, EventType::KeyDown | EventType::KeyUp)
    }
}
