//! Native input to [`Event`] translation
//!
//! The translator owns the scan code table handed over by the backend at
//! initialization. It never touches the window registry; the session refreshes
//! window geometry before asking for a geometry event.

use super::{Event, EventType};
use crate::input::{KeyMod, MouseButton, ScancodeTable};
use crate::window::WindowId;
use std::path::PathBuf;

/// Mask selecting the native repeat count from a key message
pub const REPEAT_COUNT_MASK: u32 = 0xFFFF;

/// Kind of a native key message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Key went down (or is auto-repeating)
    Down,
    /// Key was released
    Up,
}

/// Which geometry property a native notification reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryChange {
    /// Size changed
    Resized,
    /// Position changed
    Moved,
}

/// Converts native key, pointer, geometry and drop notifications into events
#[derive(Debug, Clone)]
pub struct EventTranslator {
    table: ScancodeTable,
}

impl EventTranslator {
    /// Create a translator around a finished scan code table
    pub const fn new(table: ScancodeTable) -> Self {
        Self { table }
    }

    /// The scan code table in use
    pub const fn table(&self) -> &ScancodeTable {
        &self.table
    }

    /// Translate a native key message
    ///
    /// Returns `None` for scan codes missing from the table; such keys are
    /// never reported. `modifiers` is only sampled for mapped keys. The low 16
    /// bits of `repeat_bits` hold the native repeat count and a `Down` message
    /// with a count above one is an auto-repeat. `Up` is never a repeat.
    pub fn translate_key(
        &self,
        window: WindowId,
        scancode: u32,
        action: KeyAction,
        repeat_bits: u32,
        modifiers: impl FnOnce() -> KeyMod,
    ) -> Option<Event> {
        let Some(keycode) = self.table.get(scancode) else {
            log::trace!("Dropping unmapped scancode {:#x} for window {}", scancode, window);
            return None;
        };

        let (event_type, repeat) = match action {
            KeyAction::Down => (EventType::KeyDown, repeat_bits & REPEAT_COUNT_MASK > 1),
            KeyAction::Up => (EventType::KeyUp, false),
        };

        Some(
            Event::new(event_type, window)
                .with_key(keycode, modifiers())
                .with_repeat(repeat),
        )
    }

    /// Event for a size or position change
    ///
    /// Callers refresh the stored window rect before building this event.
    pub const fn window_geometry(window: WindowId, change: GeometryChange) -> Event {
        let event_type = match change {
            GeometryChange::Resized => EventType::WindowResized,
            GeometryChange::Moved => EventType::WindowMoved,
        };
        Event::new(event_type, window)
    }

    /// Event for a focus change
    pub fn focus(window: WindowId, focused: bool) -> Event {
        Event::new(EventType::WindowFocus, window).with_pressed(focused)
    }

    /// Event for cursor movement inside a window
    pub fn cursor_moved(window: WindowId, x: f64, y: f64) -> Event {
        Event::new(EventType::MouseMove, window).with_cursor(x, y)
    }

    /// Event for the cursor entering or leaving a window
    pub const fn cursor_crossing(window: WindowId, entered: bool) -> Event {
        let event_type = if entered {
            EventType::MouseEnter
        } else {
            EventType::MouseLeave
        };
        Event::new(event_type, window)
    }

    /// Event for a mouse button transition
    pub fn mouse_button(
        window: WindowId,
        button: MouseButton,
        pressed: bool,
        keymod: KeyMod,
    ) -> Event {
        let mut event = Event::new(EventType::MouseButton, window)
            .with_button(button)
            .with_pressed(pressed);
        event.keymod = keymod;
        event
    }

    /// The event sequence for one drop gesture
    ///
    /// `FileDropStart`, one `FileDropped` per path in the order given, then
    /// `FileDropEnd`.
    pub fn file_drop(window: WindowId, paths: &[PathBuf]) -> Vec<Event> {
        let mut events = Vec::with_capacity(paths.len() + 2);
        events.push(Event::new(EventType::FileDropStart, window));
        events.extend(
            paths
                .iter()
                .map(|path| Event::new(EventType::FileDropped, window).with_filename(path.clone())),
        );
        events.push(Event::new(EventType::FileDropEnd, window));
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use std::cell::Cell;

    fn translator() -> EventTranslator {
        EventTranslator::new(ScancodeTable::pc_at_set1())
    }

    fn window() -> WindowId {
        WindowId::from_raw(3)
    }

    #[test]
    fn test_mapped_key_down() {
        let event = translator()
            .translate_key(window(), 0x011, KeyAction::Down, 1, || KeyMod::CTRL)
            .expect("W is mapped");

        assert_eq!(event.event_type, EventType::KeyDown);
        assert_eq!(event.window, window());
        assert_eq!(event.keycode, Some(KeyCode::W));
        assert_eq!(event.keymod, KeyMod::CTRL);
        assert!(!event.repeat);
    }

    #[test]
    fn test_unmapped_scancode_produces_nothing() {
        let sampled = Cell::new(false);
        let event = translator().translate_key(window(), 0x0FF, KeyAction::Down, 1, || {
            sampled.set(true);
            KeyMod::empty()
        });

        assert!(event.is_none());
        assert!(!sampled.get(), "modifiers must not be sampled for dropped keys");
    }

    #[test]
    fn test_repeat_only_on_key_down() {
        let translator = translator();

        let held = translator
            .translate_key(window(), 0x01E, KeyAction::Down, 3, KeyMod::empty)
            .unwrap();
        assert!(held.repeat);

        let released = translator
            .translate_key(window(), 0x01E, KeyAction::Up, 3, KeyMod::empty)
            .unwrap();
        assert_eq!(released.event_type, EventType::KeyUp);
        assert!(!released.repeat);
    }

    #[test]
    fn test_repeat_ignores_high_bits() {
        // Bit 30 (previous key state) sits above the repeat count
        let event = translator()
            .translate_key(window(), 0x01E, KeyAction::Down, 0x4000_0001, KeyMod::empty)
            .unwrap();
        assert!(!event.repeat);
    }

    #[test]
    fn test_file_drop_sequence() {
        let paths = vec![PathBuf::from("/tmp/a.txt"), PathBuf::from("/tmp/b.png")];
        let events = EventTranslator::file_drop(window(), &paths);

        let types: Vec<_> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![
                EventType::FileDropStart,
                EventType::FileDropped,
                EventType::FileDropped,
                EventType::FileDropEnd,
            ]
        );
        assert_eq!(events[0].filename, None);
        assert_eq!(events[1].filename.as_deref(), Some(paths[0].as_path()));
        assert_eq!(events[2].filename.as_deref(), Some(paths[1].as_path()));
        assert_eq!(events[3].filename, None);
    }

    #[test]
    fn test_empty_drop_still_brackets() {
        let events = EventTranslator::file_drop(window(), &[]);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, EventType::FileDropStart);
        assert_eq!(events[1].event_type, EventType::FileDropEnd);
    }

    #[test]
    fn test_geometry_and_pointer_events() {
        let resized = EventTranslator::window_geometry(window(), GeometryChange::Resized);
        assert_eq!(resized.event_type, EventType::WindowResized);

        let moved = EventTranslator::window_geometry(window(), GeometryChange::Moved);
        assert_eq!(moved.event_type, EventType::WindowMoved);

        let left = EventTranslator::cursor_crossing(window(), false);
        assert_eq!(left.event_type, EventType::MouseLeave);

        let click = EventTranslator::mouse_button(window(), MouseButton::Left, true, KeyMod::SHIFT);
        assert_eq!(click.button, Some(MouseButton::Left));
        assert!(click.pressed);
        assert_eq!(click.keymod, KeyMod::SHIFT);
    }
}
