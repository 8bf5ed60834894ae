//! Native scan code to [`KeyCode`] lookup tables
//!
//! A backend builds its table once during initialization; the session keeps
//! it immutable for the rest of its life and consults it for every key event.

use super::KeyCode;

/// Number of native scan values a table can hold (`0..SCANCODE_SLOTS`)
pub const SCANCODE_SLOTS: usize = 512;

/// Bit set on PC/AT scan codes that carry the `E0` extended prefix
pub const EXTENDED_PREFIX: u32 = 0x100;

/// Fixed-size map from native scan value to normalized key code
#[derive(Clone, PartialEq, Eq)]
pub struct ScancodeTable {
    slots: [Option<KeyCode>; SCANCODE_SLOTS],
}

impl ScancodeTable {
    /// Create a table with no mapped scan codes
    pub const fn empty() -> Self {
        Self {
            slots: [None; SCANCODE_SLOTS],
        }
    }

    /// Build a table from `(scancode, key)` pairs
    ///
    /// Pairs outside the table range are skipped; later pairs overwrite
    /// earlier ones for the same scan code.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, KeyCode)>,
    {
        let mut table = Self::empty();
        for (scancode, key) in pairs {
            if !table.insert(scancode, key) {
                log::warn!(
                    "Scancode {:#x} is out of range, mapping to {:?} skipped",
                    scancode,
                    key
                );
            }
        }
        table
    }

    /// Map `scancode` to `key`; returns false if the scan code is out of range
    pub fn insert(&mut self, scancode: u32, key: KeyCode) -> bool {
        match usize::try_from(scancode).ok().and_then(|i| self.slots.get_mut(i)) {
            Some(slot) => {
                *slot = Some(key);
                true
            }
            None => false,
        }
    }

    /// Look up the key code for a native scan value
    pub fn get(&self, scancode: u32) -> Option<KeyCode> {
        usize::try_from(scancode)
            .ok()
            .and_then(|i| self.slots.get(i).copied().flatten())
    }

    /// Number of mapped scan codes
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether no scan code is mapped
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// PC/AT scan code set 1, as reported by Win32 keyboard messages
    ///
    /// Scan codes use bits 16..24 of the message `lParam`; keys sent with the
    /// `E0` prefix (bit 24) are offset by [`EXTENDED_PREFIX`].
    pub fn pc_at_set1() -> Self {
        Self::from_pairs(PC_AT_SET1.iter().copied())
    }
}

impl Default for ScancodeTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for ScancodeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScancodeTable")
            .field("mapped", &self.len())
            .finish()
    }
}

const PC_AT_SET1: &[(u32, KeyCode)] = &[
    (0x001, KeyCode::Escape),
    (0x002, KeyCode::Num1),
    (0x003, KeyCode::Num2),
    (0x004, KeyCode::Num3),
    (0x005, KeyCode::Num4),
    (0x006, KeyCode::Num5),
    (0x007, KeyCode::Num6),
    (0x008, KeyCode::Num7),
    (0x009, KeyCode::Num8),
    (0x00A, KeyCode::Num9),
    (0x00B, KeyCode::Num0),
    (0x00C, KeyCode::Minus),
    (0x00D, KeyCode::Equal),
    (0x00E, KeyCode::Backspace),
    (0x00F, KeyCode::Tab),
    (0x010, KeyCode::Q),
    (0x011, KeyCode::W),
    (0x012, KeyCode::E),
    (0x013, KeyCode::R),
    (0x014, KeyCode::T),
    (0x015, KeyCode::Y),
    (0x016, KeyCode::U),
    (0x017, KeyCode::I),
    (0x018, KeyCode::O),
    (0x019, KeyCode::P),
    (0x01A, KeyCode::LeftBracket),
    (0x01B, KeyCode::RightBracket),
    (0x01C, KeyCode::Enter),
    (0x01D, KeyCode::LeftControl),
    (0x01E, KeyCode::A),
    (0x01F, KeyCode::S),
    (0x020, KeyCode::D),
    (0x021, KeyCode::F),
    (0x022, KeyCode::G),
    (0x023, KeyCode::H),
    (0x024, KeyCode::J),
    (0x025, KeyCode::K),
    (0x026, KeyCode::L),
    (0x027, KeyCode::Semicolon),
    (0x028, KeyCode::Apostrophe),
    (0x029, KeyCode::GraveAccent),
    (0x02A, KeyCode::LeftShift),
    (0x02B, KeyCode::Backslash),
    (0x02C, KeyCode::Z),
    (0x02D, KeyCode::X),
    (0x02E, KeyCode::C),
    (0x02F, KeyCode::V),
    (0x030, KeyCode::B),
    (0x031, KeyCode::N),
    (0x032, KeyCode::M),
    (0x033, KeyCode::Comma),
    (0x034, KeyCode::Period),
    (0x035, KeyCode::Slash),
    (0x036, KeyCode::RightShift),
    (0x037, KeyCode::KeypadMultiply),
    (0x038, KeyCode::LeftAlt),
    (0x039, KeyCode::Space),
    (0x03A, KeyCode::CapsLock),
    (0x03B, KeyCode::F1),
    (0x03C, KeyCode::F2),
    (0x03D, KeyCode::F3),
    (0x03E, KeyCode::F4),
    (0x03F, KeyCode::F5),
    (0x040, KeyCode::F6),
    (0x041, KeyCode::F7),
    (0x042, KeyCode::F8),
    (0x043, KeyCode::F9),
    (0x044, KeyCode::F10),
    (0x045, KeyCode::Pause),
    (0x046, KeyCode::ScrollLock),
    (0x047, KeyCode::Keypad7),
    (0x048, KeyCode::Keypad8),
    (0x049, KeyCode::Keypad9),
    (0x04A, KeyCode::KeypadSubtract),
    (0x04B, KeyCode::Keypad4),
    (0x04C, KeyCode::Keypad5),
    (0x04D, KeyCode::Keypad6),
    (0x04E, KeyCode::KeypadAdd),
    (0x04F, KeyCode::Keypad1),
    (0x050, KeyCode::Keypad2),
    (0x051, KeyCode::Keypad3),
    (0x052, KeyCode::Keypad0),
    (0x053, KeyCode::KeypadDecimal),
    (0x057, KeyCode::F11),
    (0x058, KeyCode::F12),
    (0x059, KeyCode::KeypadEqual),
    (0x11C, KeyCode::KeypadEnter),
    (0x11D, KeyCode::RightControl),
    (0x135, KeyCode::KeypadDivide),
    (0x137, KeyCode::PrintScreen),
    (0x138, KeyCode::RightAlt),
    (0x145, KeyCode::NumLock),
    (0x147, KeyCode::Home),
    (0x148, KeyCode::Up),
    (0x149, KeyCode::PageUp),
    (0x14B, KeyCode::Left),
    (0x14D, KeyCode::Right),
    (0x14F, KeyCode::End),
    (0x150, KeyCode::Down),
    (0x151, KeyCode::PageDown),
    (0x152, KeyCode::Insert),
    (0x153, KeyCode::Delete),
    (0x15B, KeyCode::LeftMeta),
    (0x15C, KeyCode::RightMeta),
    (0x15D, KeyCode::Menu),
];
