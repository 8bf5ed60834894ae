//! Desktop backend built on GLFW
//!
//! GLFW reports layout-independent key tokens rather than raw scan codes, so
//! the scancode table of this backend is indexed by GLFW key value.

use super::{
    Backend, BackendError, BackendResult, DisplayReport, KeyAction, NativeEvent, NativeHandle,
};
use crate::foundation::Rect;
use crate::input::{KeyCode, KeyMod, MouseButton, ScancodeTable};
use std::collections::BTreeMap;

/// GLFW key token to key code
const KEY_MAP: &[(glfw::Key, KeyCode)] = &[
    (glfw::Key::A, KeyCode::A),
    (glfw::Key::B, KeyCode::B),
    (glfw::Key::C, KeyCode::C),
    (glfw::Key::D, KeyCode::D),
    (glfw::Key::E, KeyCode::E),
    (glfw::Key::F, KeyCode::F),
    (glfw::Key::G, KeyCode::G),
    (glfw::Key::H, KeyCode::H),
    (glfw::Key::I, KeyCode::I),
    (glfw::Key::J, KeyCode::J),
    (glfw::Key::K, KeyCode::K),
    (glfw::Key::L, KeyCode::L),
    (glfw::Key::M, KeyCode::M),
    (glfw::Key::N, KeyCode::N),
    (glfw::Key::O, KeyCode::O),
    (glfw::Key::P, KeyCode::P),
    (glfw::Key::Q, KeyCode::Q),
    (glfw::Key::R, KeyCode::R),
    (glfw::Key::S, KeyCode::S),
    (glfw::Key::T, KeyCode::T),
    (glfw::Key::U, KeyCode::U),
    (glfw::Key::V, KeyCode::V),
    (glfw::Key::W, KeyCode::W),
    (glfw::Key::X, KeyCode::X),
    (glfw::Key::Y, KeyCode::Y),
    (glfw::Key::Z, KeyCode::Z),
    (glfw::Key::Num0, KeyCode::Num0),
    (glfw::Key::Num1, KeyCode::Num1),
    (glfw::Key::Num2, KeyCode::Num2),
    (glfw::Key::Num3, KeyCode::Num3),
    (glfw::Key::Num4, KeyCode::Num4),
    (glfw::Key::Num5, KeyCode::Num5),
    (glfw::Key::Num6, KeyCode::Num6),
    (glfw::Key::Num7, KeyCode::Num7),
    (glfw::Key::Num8, KeyCode::Num8),
    (glfw::Key::Num9, KeyCode::Num9),
    (glfw::Key::F1, KeyCode::F1),
    (glfw::Key::F2, KeyCode::F2),
    (glfw::Key::F3, KeyCode::F3),
    (glfw::Key::F4, KeyCode::F4),
    (glfw::Key::F5, KeyCode::F5),
    (glfw::Key::F6, KeyCode::F6),
    (glfw::Key::F7, KeyCode::F7),
    (glfw::Key::F8, KeyCode::F8),
    (glfw::Key::F9, KeyCode::F9),
    (glfw::Key::F10, KeyCode::F10),
    (glfw::Key::F11, KeyCode::F11),
    (glfw::Key::F12, KeyCode::F12),
    (glfw::Key::Space, KeyCode::Space),
    (glfw::Key::Apostrophe, KeyCode::Apostrophe),
    (glfw::Key::Comma, KeyCode::Comma),
    (glfw::Key::Minus, KeyCode::Minus),
    (glfw::Key::Period, KeyCode::Period),
    (glfw::Key::Slash, KeyCode::Slash),
    (glfw::Key::Semicolon, KeyCode::Semicolon),
    (glfw::Key::Equal, KeyCode::Equal),
    (glfw::Key::LeftBracket, KeyCode::LeftBracket),
    (glfw::Key::Backslash, KeyCode::Backslash),
    (glfw::Key::RightBracket, KeyCode::RightBracket),
    (glfw::Key::GraveAccent, KeyCode::GraveAccent),
    (glfw::Key::Enter, KeyCode::Enter),
    (glfw::Key::Escape, KeyCode::Escape),
    (glfw::Key::Tab, KeyCode::Tab),
    (glfw::Key::Backspace, KeyCode::Backspace),
    (glfw::Key::Insert, KeyCode::Insert),
    (glfw::Key::Delete, KeyCode::Delete),
    (glfw::Key::Home, KeyCode::Home),
    (glfw::Key::End, KeyCode::End),
    (glfw::Key::PageUp, KeyCode::PageUp),
    (glfw::Key::PageDown, KeyCode::PageDown),
    (glfw::Key::Up, KeyCode::Up),
    (glfw::Key::Down, KeyCode::Down),
    (glfw::Key::Left, KeyCode::Left),
    (glfw::Key::Right, KeyCode::Right),
    (glfw::Key::CapsLock, KeyCode::CapsLock),
    (glfw::Key::ScrollLock, KeyCode::ScrollLock),
    (glfw::Key::NumLock, KeyCode::NumLock),
    (glfw::Key::PrintScreen, KeyCode::PrintScreen),
    (glfw::Key::Pause, KeyCode::Pause),
    (glfw::Key::Kp0, KeyCode::Keypad0),
    (glfw::Key::Kp1, KeyCode::Keypad1),
    (glfw::Key::Kp2, KeyCode::Keypad2),
    (glfw::Key::Kp3, KeyCode::Keypad3),
    (glfw::Key::Kp4, KeyCode::Keypad4),
    (glfw::Key::Kp5, KeyCode::Keypad5),
    (glfw::Key::Kp6, KeyCode::Keypad6),
    (glfw::Key::Kp7, KeyCode::Keypad7),
    (glfw::Key::Kp8, KeyCode::Keypad8),
    (glfw::Key::Kp9, KeyCode::Keypad9),
    (glfw::Key::KpDecimal, KeyCode::KeypadDecimal),
    (glfw::Key::KpDivide, KeyCode::KeypadDivide),
    (glfw::Key::KpMultiply, KeyCode::KeypadMultiply),
    (glfw::Key::KpSubtract, KeyCode::KeypadSubtract),
    (glfw::Key::KpAdd, KeyCode::KeypadAdd),
    (glfw::Key::KpEnter, KeyCode::KeypadEnter),
    (glfw::Key::KpEqual, KeyCode::KeypadEqual),
    (glfw::Key::LeftShift, KeyCode::LeftShift),
    (glfw::Key::LeftControl, KeyCode::LeftControl),
    (glfw::Key::LeftAlt, KeyCode::LeftAlt),
    (glfw::Key::LeftSuper, KeyCode::LeftMeta),
    (glfw::Key::RightShift, KeyCode::RightShift),
    (glfw::Key::RightControl, KeyCode::RightControl),
    (glfw::Key::RightAlt, KeyCode::RightAlt),
    (glfw::Key::RightSuper, KeyCode::RightMeta),
    (glfw::Key::Menu, KeyCode::Menu),
];

/// Scan value reported for a GLFW key token
fn key_scancode(key: glfw::Key) -> Option<u32> {
    u32::try_from(key as i32).ok()
}

/// Modifier flags from the pressed state of each modifier key
fn modifiers_from(is_down: impl Fn(glfw::Key) -> bool) -> KeyMod {
    let either = |left, right| is_down(left) || is_down(right);
    let mut keymod = KeyMod::empty();
    keymod.set(KeyMod::SHIFT, either(glfw::Key::LeftShift, glfw::Key::RightShift));
    keymod.set(KeyMod::CTRL, either(glfw::Key::LeftControl, glfw::Key::RightControl));
    keymod.set(KeyMod::ALT, either(glfw::Key::LeftAlt, glfw::Key::RightAlt));
    keymod.set(KeyMod::META, either(glfw::Key::LeftSuper, glfw::Key::RightSuper));
    keymod
}

fn mouse_button(button: glfw::MouseButton) -> MouseButton {
    match button {
        glfw::MouseButton::Button1 => MouseButton::Left,
        glfw::MouseButton::Button2 => MouseButton::Right,
        glfw::MouseButton::Button3 => MouseButton::Middle,
        other => MouseButton::Other(u8::try_from(other as i32 + 1).unwrap_or(u8::MAX)),
    }
}

struct NativeWindow {
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

/// Backend driving real desktop windows through GLFW
///
/// Must live on the main thread.
pub struct GlfwBackend {
    glfw: Option<glfw::Glfw>,
    windows: BTreeMap<NativeHandle, NativeWindow>,
    next_handle: u64,
    display_keys: Vec<String>,
}

impl Default for GlfwBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GlfwBackend {
    /// Create an uninitialized backend
    pub const fn new() -> Self {
        Self {
            glfw: None,
            windows: BTreeMap::new(),
            next_handle: 1,
            display_keys: Vec::new(),
        }
    }

    fn glfw_mut(&mut self) -> BackendResult<&mut glfw::Glfw> {
        self.glfw.as_mut().ok_or_else(|| {
            BackendError::InitializationFailed("GLFW is not initialized".to_string())
        })
    }

    fn translate(handle: NativeHandle, event: glfw::WindowEvent) -> Option<NativeEvent> {
        match event {
            glfw::WindowEvent::Close => Some(NativeEvent::CloseRequested { handle }),
            glfw::WindowEvent::Size(..) => Some(NativeEvent::Resized { handle }),
            glfw::WindowEvent::Pos(..) => Some(NativeEvent::Moved { handle }),
            glfw::WindowEvent::Focus(focused) => Some(NativeEvent::Focus { handle, focused }),
            glfw::WindowEvent::Key(key, _, action, _) => {
                let (action, repeat_bits) = match action {
                    glfw::Action::Press => (KeyAction::Down, 1),
                    glfw::Action::Repeat => (KeyAction::Down, 2),
                    glfw::Action::Release => (KeyAction::Up, 1),
                };
                key_scancode(key).map(|scancode| NativeEvent::Key {
                    handle,
                    scancode,
                    action,
                    repeat_bits,
                })
            }
            glfw::WindowEvent::CursorPos(x, y) => Some(NativeEvent::CursorMoved { handle, x, y }),
            glfw::WindowEvent::CursorEnter(entered) => {
                Some(NativeEvent::CursorEntered { handle, entered })
            }
            glfw::WindowEvent::MouseButton(button, action, _) => Some(NativeEvent::MouseButton {
                handle,
                button: mouse_button(button),
                pressed: action != glfw::Action::Release,
            }),
            glfw::WindowEvent::FileDrop(paths) => Some(NativeEvent::FilesDropped { handle, paths }),
            _ => None,
        }
    }
}

impl Backend for GlfwBackend {
    fn name(&self) -> &str {
        "glfw"
    }

    fn initialize(&mut self) -> BackendResult<()> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| BackendError::InitializationFailed(format!("{e:?}")))?;

        // Windows stay hidden until the session has placed them
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Visible(false));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        self.glfw = Some(glfw);
        log::info!("GLFW initialized");
        Ok(())
    }

    fn shutdown(&mut self) {
        self.windows.clear();
        self.display_keys.clear();
        if self.glfw.take().is_some() {
            log::info!("GLFW shut down");
        }
    }

    fn create_native_window(
        &mut self,
        width: i32,
        height: i32,
        title: &str,
    ) -> BackendResult<NativeHandle> {
        let size = |v: i32| {
            u32::try_from(v).map_err(|_| {
                BackendError::WindowCreationFailed(format!("invalid window size {width}x{height}"))
            })
        };
        let (width, height) = (size(width)?, size(height)?);

        let (mut window, events) = self
            .glfw_mut()
            .map_err(|e| BackendError::WindowCreationFailed(e.to_string()))?
            .create_window(width, height, title, glfw::WindowMode::Windowed)
            .ok_or_else(|| {
                BackendError::WindowCreationFailed(format!("GLFW refused window '{title}'"))
            })?;
        window.set_all_polling(true);

        let handle = NativeHandle::from_raw(self.next_handle);
        self.next_handle += 1;
        self.windows.insert(handle, NativeWindow { window, events });
        Ok(handle)
    }

    fn move_resize(&mut self, handle: NativeHandle, rect: Rect) {
        if let Some(native) = self.windows.get_mut(&handle) {
            native.window.set_pos(rect.x, rect.y);
            native.window.set_size(rect.width, rect.height);
        }
    }

    fn query_current_rect(&self, handle: NativeHandle) -> Option<Rect> {
        self.windows.get(&handle).map(|native| {
            let (x, y) = native.window.get_pos();
            let (width, height) = native.window.get_size();
            Rect::new(x, y, width, height)
        })
    }

    fn set_borderless(&mut self, handle: NativeHandle, borderless: bool) {
        if let Some(native) = self.windows.get_mut(&handle) {
            native.window.set_decorated(!borderless);
        }
    }

    fn set_title(&mut self, handle: NativeHandle, title: &str) {
        if let Some(native) = self.windows.get_mut(&handle) {
            native.window.set_title(title);
        }
    }

    fn show_window(&mut self, handle: NativeHandle) {
        if let Some(native) = self.windows.get_mut(&handle) {
            native.window.show();
        }
    }

    fn destroy_native_window(&mut self, handle: NativeHandle) {
        self.windows.remove(&handle);
    }

    fn enumerate_displays(&mut self) -> BackendResult<Vec<DisplayReport>> {
        let glfw = self
            .glfw_mut()
            .map_err(|e| BackendError::DisplayEnumerationFailed(e.to_string()))?;

        let primary =
            glfw.with_primary_monitor(|_, monitor| monitor.map(|m| (m.get_name(), m.get_pos())));
        let reports = glfw.with_connected_monitors(|_, monitors| {
            let mut seen: Vec<String> = Vec::new();
            monitors
                .iter()
                .filter_map(|monitor| {
                    let name = monitor.get_name().unwrap_or_else(|| "monitor".to_string());
                    let mode = monitor.get_video_mode()?;
                    let (x, y) = monitor.get_pos();
                    let nth = seen.iter().filter(|n| **n == name).count();
                    seen.push(name.clone());

                    let width = i32::try_from(mode.width).ok()?;
                    let height = i32::try_from(mode.height).ok()?;
                    let is_primary = primary.as_ref().is_some_and(|(p_name, p_pos)| {
                        p_name.as_deref() == Some(name.as_str()) && *p_pos == (x, y)
                    });
                    Some(DisplayReport::new(
                        format!("{name}#{nth}"),
                        Rect::new(x, y, width, height),
                        mode.refresh_rate,
                        is_primary,
                    ))
                })
                .collect::<Vec<_>>()
        });

        if reports.is_empty() {
            return Err(BackendError::DisplayEnumerationFailed(
                "no monitor with a video mode".to_string(),
            ));
        }
        self.display_keys = reports.iter().map(|r| r.key.clone()).collect();
        Ok(reports)
    }

    fn pump_events(&mut self) -> Vec<NativeEvent> {
        let Some(glfw) = self.glfw.as_mut() else {
            return Vec::new();
        };
        glfw.poll_events();

        // Monitor hotplug shows up as a change in the connected count
        let connected = glfw.with_connected_monitors(|_, monitors| monitors.len());
        let mut pending = Vec::new();
        if connected != self.display_keys.len() && !self.display_keys.is_empty() {
            pending.push(NativeEvent::DisplaysChanged);
        }

        let mut raw = Vec::new();
        for (&handle, native) in &self.windows {
            raw.extend(glfw::flush_messages(&native.events).map(|(_, event)| (handle, event)));
        }
        pending.extend(
            raw.into_iter()
                .filter_map(|(handle, event)| Self::translate(handle, event)),
        );
        pending
    }

    fn query_modifier_state(&self) -> KeyMod {
        modifiers_from(|key| {
            self.windows
                .values()
                .any(|native| native.window.get_key(key) != glfw::Action::Release)
        })
    }

    fn scancode_table(&self) -> ScancodeTable {
        ScancodeTable::from_pairs(
            KEY_MAP
                .iter()
                .filter_map(|&(key, code)| key_scancode(key).map(|scancode| (scancode, code))),
        )
    }
}

impl std::fmt::Debug for GlfwBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlfwBackend")
            .field("initialized", &self.glfw.is_some())
            .field("windows", &self.windows.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_table_fits_and_is_unique() {
        let table = GlfwBackend::new().scancode_table();

        assert_eq!(table.len(), KEY_MAP.len());
        assert_eq!(table.get(key_scancode(glfw::Key::A).unwrap()), Some(KeyCode::A));
        assert_eq!(table.get(key_scancode(glfw::Key::Escape).unwrap()), Some(KeyCode::Escape));
    }

    #[test]
    fn test_unknown_key_has_no_scancode() {
        assert_eq!(key_scancode(glfw::Key::Unknown), None);
    }

    #[test]
    fn test_modifiers_from_pressed_keys() {
        let mods =
            modifiers_from(|key| matches!(key, glfw::Key::LeftShift | glfw::Key::RightSuper));
        assert_eq!(mods, KeyMod::SHIFT | KeyMod::META);
        assert_eq!(modifiers_from(|_| false), KeyMod::empty());
    }

    #[test]
    fn test_mouse_button_conversion() {
        assert_eq!(mouse_button(glfw::MouseButton::Button1), MouseButton::Left);
        assert_eq!(mouse_button(glfw::MouseButton::Button3), MouseButton::Middle);
        assert_eq!(mouse_button(glfw::MouseButton::Button4), MouseButton::Other(4));
        assert_eq!(mouse_button(glfw::MouseButton::Button8), MouseButton::Other(8));
    }
}
