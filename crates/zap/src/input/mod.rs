//! Normalized input vocabulary
//!
//! Backends report keys as native scan values; the [`scancode`] tables turn
//! them into the platform-independent [`KeyCode`] defined here.

pub mod scancode;

pub use scancode::ScancodeTable;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifier keys held at the moment an event was translated
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyMod: u32 {
        /// Either shift key
        const SHIFT = 1 << 0;
        /// Either control key
        const CTRL = 1 << 1;
        /// Either alt / option key
        const ALT = 1 << 2;
        /// Windows / command / super key
        const META = 1 << 3;
    }
}

/// Key codes
///
/// Codes name the key's position on a US layout, not the character it
/// produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// 0 on the number row
    Num0,
    /// 1 on the number row
    Num1,
    /// 2 on the number row
    Num2,
    /// 3 on the number row
    Num3,
    /// 4 on the number row
    Num4,
    /// 5 on the number row
    Num5,
    /// 6 on the number row
    Num6,
    /// 7 on the number row
    Num7,
    /// 8 on the number row
    Num8,
    /// 9 on the number row
    Num9,
    /// F1
    F1,
    /// F2
    F2,
    /// F3
    F3,
    /// F4
    F4,
    /// F5
    F5,
    /// F6
    F6,
    /// F7
    F7,
    /// F8
    F8,
    /// F9
    F9,
    /// F10
    F10,
    /// F11
    F11,
    /// F12
    F12,
    /// Space key
    Space,
    /// ' key
    Apostrophe,
    /// , key
    Comma,
    /// - key
    Minus,
    /// . key
    Period,
    /// / key
    Slash,
    /// ; key
    Semicolon,
    /// = key
    Equal,
    /// [ key
    LeftBracket,
    /// \ key
    Backslash,
    /// ] key
    RightBracket,
    /// ` key
    GraveAccent,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Tab key
    Tab,
    /// Backspace key
    Backspace,
    /// Insert key
    Insert,
    /// Delete key
    Delete,
    /// Home key
    Home,
    /// End key
    End,
    /// Page up key
    PageUp,
    /// Page down key
    PageDown,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Caps lock
    CapsLock,
    /// Scroll lock
    ScrollLock,
    /// Num lock
    NumLock,
    /// Print screen
    PrintScreen,
    /// Pause / break
    Pause,
    /// Keypad 0
    Keypad0,
    /// Keypad 1
    Keypad1,
    /// Keypad 2
    Keypad2,
    /// Keypad 3
    Keypad3,
    /// Keypad 4
    Keypad4,
    /// Keypad 5
    Keypad5,
    /// Keypad 6
    Keypad6,
    /// Keypad 7
    Keypad7,
    /// Keypad 8
    Keypad8,
    /// Keypad 9
    Keypad9,
    /// Keypad .
    KeypadDecimal,
    /// Keypad /
    KeypadDivide,
    /// Keypad *
    KeypadMultiply,
    /// Keypad -
    KeypadSubtract,
    /// Keypad +
    KeypadAdd,
    /// Keypad enter
    KeypadEnter,
    /// Keypad =
    KeypadEqual,
    /// Left shift
    LeftShift,
    /// Left control
    LeftControl,
    /// Left alt
    LeftAlt,
    /// Left windows / command key
    LeftMeta,
    /// Right shift
    RightShift,
    /// Right control
    RightControl,
    /// Right alt
    RightAlt,
    /// Right windows / command key
    RightMeta,
    /// Context menu key
    Menu,
}

impl KeyCode {
    /// Whether this key is itself one of the modifier keys
    pub const fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::LeftShift
                | Self::RightShift
                | Self::LeftControl
                | Self::RightControl
                | Self::LeftAlt
                | Self::RightAlt
                | Self::LeftMeta
                | Self::RightMeta
        )
    }
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
    /// Any further button, numbered from 4
    Other(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymod_combinations() {
        let mods = KeyMod::CTRL | KeyMod::SHIFT;

        assert!(mods.contains(KeyMod::CTRL));
        assert!(!mods.contains(KeyMod::ALT));
        assert_ne!(mods, KeyMod::CTRL);
        assert_eq!(KeyMod::default(), KeyMod::empty());
    }

    #[test]
    fn test_modifier_keys() {
        assert!(KeyCode::LeftShift.is_modifier());
        assert!(KeyCode::RightMeta.is_modifier());
        assert!(!KeyCode::W.is_modifier());
    }
}
