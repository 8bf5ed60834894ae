//! Backend event pump

use super::Session;
use crate::backend::NativeEvent;
use crate::events::{EventTranslator, GeometryChange};

impl Session {
    /// Drain every queued backend event and deliver the translated events
    pub(super) fn pump_events(&mut self) {
        let events = self.backend.pump_events();
        if !events.is_empty() {
            log::trace!("Pumped {} native event(s)", events.len());
        }
        for event in events {
            if !self.is_initialized() {
                break;
            }
            self.handle_native_event(event);
        }
    }

    fn handle_native_event(&mut self, event: NativeEvent) {
        let Some(handle) = event.handle() else {
            if matches!(event, NativeEvent::DisplaysChanged) {
                log::debug!("Display configuration changed");
                self.refresh_displays();
            }
            return;
        };
        let Some(window) = self.windows.find_by_handle(handle) else {
            log::trace!("Dropping {:?} for unknown native window", event);
            return;
        };

        match event {
            NativeEvent::CloseRequested { .. } => self.window_request_close(window),
            NativeEvent::Resized { .. } => {
                self.refresh_window_rect(window);
                let event = EventTranslator::window_geometry(window, GeometryChange::Resized);
                self.dispatch_event(event);
            }
            NativeEvent::Moved { .. } => {
                self.refresh_window_rect(window);
                let event = EventTranslator::window_geometry(window, GeometryChange::Moved);
                self.dispatch_event(event);
            }
            NativeEvent::Focus { focused, .. } => {
                self.dispatch_event(EventTranslator::focus(window, focused));
            }
            NativeEvent::Key {
                scancode,
                action,
                repeat_bits,
                ..
            } => {
                let translated = self.translator.as_ref().and_then(|translator| {
                    translator.translate_key(window, scancode, action, repeat_bits, || {
                        self.backend.query_modifier_state()
                    })
                });
                if let Some(event) = translated {
                    self.dispatch_event(event);
                }
            }
            NativeEvent::CursorMoved { x, y, .. } => {
                self.dispatch_event(EventTranslator::cursor_moved(window, x, y));
            }
            NativeEvent::CursorEntered { entered, .. } => {
                self.dispatch_event(EventTranslator::cursor_crossing(window, entered));
            }
            NativeEvent::MouseButton { button, pressed, .. } => {
                let keymod = self.backend.query_modifier_state();
                self.dispatch_event(EventTranslator::mouse_button(window, button, pressed, keymod));
            }
            NativeEvent::FilesDropped { paths, .. } => {
                log::debug!("{} file(s) dropped on window {}", paths.len(), window);
                for event in EventTranslator::file_drop(window, &paths) {
                    self.dispatch_event(event);
                }
            }
            NativeEvent::DisplaysChanged => {}
        }
    }
}
