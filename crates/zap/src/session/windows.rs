//! Window operations on the session

use super::Session;
use crate::display::DisplayId;
use crate::events::{Event, EventType};
use crate::foundation::Rect;
use crate::window::{DisplayMode, PositionMode, WindowEntry, WindowId, WindowOptions};
use std::any::Any;

impl Session {
    /// Create a window and append it to the registry
    ///
    /// Returns [`WindowId::INVALID`] if the backend could not create the
    /// native window, or while the session is being torn down. The
    /// after-create callback runs once the window is fully registered,
    /// placed and shown.
    pub fn window_create(&mut self, options: WindowOptions) -> WindowId {
        self.assert_initialized();
        if self.tearing_down {
            log::warn!("Refusing to create a window while the session is being destroyed");
            return WindowId::INVALID;
        }

        let WindowOptions {
            x,
            y,
            width,
            height,
            position,
            display_mode,
            title,
            user_data,
            mut callbacks,
        } = options;
        let title = title.unwrap_or_else(|| crate::window::DEFAULT_TITLE.to_string());

        let handle = match self.backend.create_native_window(width, height, &title) {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("Failed to create window '{}': {}", title, e);
                return WindowId::INVALID;
            }
        };

        let id = self.windows.allocate_id();
        let rect = self
            .backend
            .query_current_rect(handle)
            .unwrap_or(Rect::new(0, 0, width, height));

        let on_after_create = callbacks.on_after_create.take();
        let mut entry = WindowEntry::new(id, handle, rect, title);
        entry.user_data = user_data;
        entry.callbacks = callbacks;
        self.windows.insert(entry);

        match position {
            PositionMode::Auto => {}
            PositionMode::Custom => self.move_window(id, Rect::new(x, y, width, height)),
            PositionMode::Centered => match self.displays.primary_info() {
                Some(primary) => self.move_window(id, primary.rect.centered(width, height)),
                None => log::warn!("No primary display to centre window {} on", id),
            },
        }
        if let Some(window) = self.windows.find_mut(id) {
            window.previous_rect = window.rect;
        }

        if display_mode != DisplayMode::Normal {
            self.apply_display_mode(id, display_mode);
        }

        self.backend.show_window(handle);
        log::debug!(
            "Created window {} ({:?}) at {}",
            id,
            display_mode,
            self.windows.find(id).map_or(rect, WindowEntry::rect)
        );

        if let Some(mut after_create) = on_after_create {
            after_create(self, id);
        }

        id
    }

    /// Ask a window to close
    ///
    /// The before-close callback may veto by returning false, in which case
    /// the window stays open. An accepted close takes effect at the next
    /// close pass. Unknown windows and windows already closing are ignored,
    /// as are requests made from inside the window's own veto callback.
    pub fn window_request_close(&mut self, id: WindowId) {
        self.assert_initialized();
        let Some(window) = self.windows.find_mut(id) else {
            return;
        };
        if window.close_requested || window.in_close_callback {
            return;
        }

        let accepted = match window.callbacks.on_before_close.take() {
            Some(mut before_close) => {
                window.in_close_callback = true;
                let accepted = before_close(self, id);
                if let Some(window) = self.windows.find_mut(id) {
                    window.in_close_callback = false;
                    window.callbacks.on_before_close.get_or_insert(before_close);
                }
                accepted
            }
            None => true,
        };

        if !accepted {
            log::trace!("Close of window {} vetoed", id);
            return;
        }
        if let Some(window) = self.windows.find_mut(id) {
            window.close_requested = true;
            log::debug!("Window {} will close", id);
        }
    }

    /// Destroy every window whose close was accepted
    ///
    /// Pending windows are collected in one scan before any is destroyed, so
    /// callbacks that run during destruction cannot shift the scan. Survivors
    /// keep their relative order. Returns the number of windows destroyed.
    pub fn process_pending_closes(&mut self) -> usize {
        self.assert_initialized();
        let pending = self.windows.pending_close();
        for &id in &pending {
            self.destroy_window(id);
        }
        pending.len()
    }

    /// Change how a window occupies its display
    ///
    /// Fullscreen modes cover the display the window is on and remember the
    /// previous rect. `Normal` and `Maximized` only record the mode and
    /// restore decorations; they do not reposition the window. Emits
    /// [`EventType::DisplayModeChanged`] on success. Returns false for
    /// unknown windows and for [`DisplayMode::Invalid`].
    pub fn window_set_display_mode(&mut self, id: WindowId, mode: DisplayMode) -> bool {
        self.assert_initialized();
        if mode == DisplayMode::Invalid {
            log::warn!("Ignoring request to put window {} into the invalid display mode", id);
            return false;
        }
        if !self.apply_display_mode(id, mode) {
            return false;
        }
        self.dispatch_event(Event::new(EventType::DisplayModeChanged, id).with_display_mode(mode));
        true
    }

    /// Leave fullscreen and move back to the rect saved before entering it
    pub fn window_restore_previous_rect(&mut self, id: WindowId) -> bool {
        self.assert_initialized();
        let Some(window) = self.windows.find(id) else {
            return false;
        };
        let previous = window.previous_rect;
        let was_fullscreen = window.display_mode.is_fullscreen();

        if was_fullscreen {
            self.apply_display_mode(id, DisplayMode::Normal);
        }
        self.move_window(id, previous);
        true
    }

    /// Centre a window on the display it is currently on
    pub fn window_center_on_screen(&mut self, id: WindowId) -> bool {
        self.assert_initialized();
        let Some(rect) = self.windows.find(id).map(WindowEntry::rect) else {
            return false;
        };
        let Some(display) = self.displays.resolve_or_primary(&rect) else {
            return false;
        };
        self.move_window(id, display.rect.centered(rect.width, rect.height));
        true
    }

    /// Move a window, keeping its size
    pub fn window_move_to(&mut self, id: WindowId, x: i32, y: i32) -> bool {
        self.assert_initialized();
        let Some(rect) = self.windows.find(id).map(WindowEntry::rect) else {
            return false;
        };
        self.move_window(id, Rect::new(x, y, rect.width, rect.height));
        true
    }

    /// Resize a window, keeping its position
    pub fn window_resize(&mut self, id: WindowId, width: i32, height: i32) -> bool {
        self.assert_initialized();
        let Some(rect) = self.windows.find(id).map(WindowEntry::rect) else {
            return false;
        };
        self.move_window(id, Rect::new(rect.x, rect.y, width, height));
        true
    }

    /// Replace a window's title
    pub fn window_set_title(&mut self, id: WindowId, title: impl Into<String>) -> bool {
        self.assert_initialized();
        let title = title.into();
        let Some(window) = self.windows.find_mut(id) else {
            return false;
        };
        self.backend.set_title(window.handle, &title);
        window.title = title;
        true
    }

    /// Registry entry of a live window
    pub fn window(&self, id: WindowId) -> Option<&WindowEntry> {
        self.assert_initialized();
        self.windows.find(id)
    }

    /// Top-left corner of a window
    pub fn window_position(&self, id: WindowId) -> Option<(i32, i32)> {
        self.window(id).map(|w| w.rect.origin())
    }

    /// Size of a window
    pub fn window_size(&self, id: WindowId) -> Option<(i32, i32)> {
        self.window(id).map(|w| w.rect.size())
    }

    /// Outer rect of a window
    pub fn window_rect(&self, id: WindowId) -> Option<Rect> {
        self.window(id).map(WindowEntry::rect)
    }

    /// Display mode of a window
    pub fn window_display_mode(&self, id: WindowId) -> Option<DisplayMode> {
        self.window(id).map(WindowEntry::display_mode)
    }

    /// The display a window is on, [`DisplayId::INVALID`] if it is on none
    pub fn window_display(&self, id: WindowId) -> DisplayId {
        self.window(id)
            .and_then(|w| self.displays.resolve_for_rect(&w.rect))
            .map_or(DisplayId::INVALID, |d| d.id)
    }

    /// Replace a window's payload
    pub fn window_set_user_data<T: Any>(&mut self, id: WindowId, user_data: T) -> bool {
        self.assert_initialized();
        match self.windows.find_mut(id) {
            Some(window) => {
                window.user_data = Some(Box::new(user_data));
                true
            }
            None => false,
        }
    }

    /// A window's payload, if present and of type `T`
    pub fn window_user_data<T: Any>(&self, id: WindowId) -> Option<&T> {
        self.window(id)
            .and_then(|w| w.user_data.as_deref())
            .and_then(|data| data.downcast_ref())
    }

    /// Mutable access to a window's payload
    pub fn window_user_data_mut<T: Any>(&mut self, id: WindowId) -> Option<&mut T> {
        self.assert_initialized();
        self.windows
            .find_mut(id)
            .and_then(|w| w.user_data.as_deref_mut())
            .and_then(|data| data.downcast_mut())
    }

    /// Number of live windows
    pub fn window_count(&self) -> usize {
        self.assert_initialized();
        self.windows.len()
    }

    /// Ids of every live window in registry order
    pub fn window_ids(&self) -> Vec<WindowId> {
        self.assert_initialized();
        self.windows.ids()
    }

    /// Call every window's update callback once, in registry order
    ///
    /// Windows appended by a callback are visited in the same pass.
    pub(super) fn update_windows(&mut self, delta: f32) {
        let mut index = 0;
        while let Some(id) = self.windows.id_at(index) {
            index += 1;
            let Some(mut update) = self
                .windows
                .find_mut(id)
                .and_then(|w| w.callbacks.on_update.take())
            else {
                continue;
            };
            update(self, id, delta);
            if let Some(window) = self.windows.find_mut(id) {
                window.callbacks.on_update.get_or_insert(update);
            }
        }
    }

    /// Notify, release and unregister one window
    pub(super) fn destroy_window(&mut self, id: WindowId) {
        let before_destroy = self
            .windows
            .find_mut(id)
            .and_then(|w| w.callbacks.on_before_destroy.take());
        if let Some(mut before_destroy) = before_destroy {
            before_destroy(self, id);
        }

        if let Some(window) = self.windows.remove(id) {
            self.backend.destroy_native_window(window.handle);
            log::debug!("Destroyed window {}", id);
            if window.display_mode.is_fullscreen() {
                self.sync_display_modes();
            }
        }
    }

    pub(super) fn destroy_all_windows(&mut self) {
        while let Some(id) = self.windows.id_at(0) {
            self.destroy_window(id);
        }
    }

    /// Re-read a window's rect from the backend
    pub(super) fn refresh_window_rect(&mut self, id: WindowId) {
        let Some(window) = self.windows.find_mut(id) else {
            return;
        };
        if let Some(rect) = self.backend.query_current_rect(window.handle) {
            window.rect = rect;
        }
    }

    fn move_window(&mut self, id: WindowId, rect: Rect) {
        let Some(handle) = self.windows.find(id).map(WindowEntry::native_handle) else {
            return;
        };
        self.backend.move_resize(handle, rect);
        self.refresh_window_rect(id);
    }

    fn apply_display_mode(&mut self, id: WindowId, mode: DisplayMode) -> bool {
        let Some(window) = self.windows.find(id) else {
            return false;
        };
        let (handle, rect, current) = (window.handle, window.rect, window.display_mode);
        let display = self.displays.resolve_or_primary(&rect);

        if mode.is_fullscreen() {
            let Some(display) = display else {
                log::warn!("Window {} is on no known display, cannot enter {:?}", id, mode);
                return false;
            };
            if let Some(window) = self.windows.find_mut(id) {
                if !current.is_fullscreen() {
                    window.previous_rect = rect;
                }
            }
            self.backend.set_borderless(handle, true);
            self.move_window(id, display.rect);
        } else if current.is_fullscreen() {
            self.backend.set_borderless(handle, false);
        }

        if let Some(window) = self.windows.find_mut(id) {
            window.display_mode = mode;
        }
        if mode.is_fullscreen() || current.is_fullscreen() {
            self.sync_display_modes();
        }
        log::debug!("Window {} display mode {:?} -> {:?}", id, current, mode);
        true
    }

    /// Derive every display's mode from the fullscreen windows covering it
    ///
    /// A display stays fullscreen while any live window is fullscreen on it;
    /// the most recently registered such window decides the mode.
    fn sync_display_modes(&mut self) {
        for display in self.displays.ids() {
            let mode = self
                .windows
                .iter()
                .filter(|w| w.display_mode.is_fullscreen())
                .filter(|w| {
                    self.displays.resolve_or_primary(&w.rect).map(|d| d.id) == Some(display)
                })
                .last()
                .map_or(DisplayMode::Normal, |w| w.display_mode);
            self.displays.set_display_mode(display, mode);
        }
    }
}
