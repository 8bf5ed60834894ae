//! In-memory backend
//!
//! Windows are plain records and displays are whatever the caller scripts.
//! Nothing is synthesized: native events only appear when pushed through a
//! [`HeadlessHandle`], which stays usable after the backend has been moved
//! into a session.

use super::{
    Backend, BackendError, BackendResult, DisplayReport, KeyAction, NativeEvent, NativeHandle,
};
use crate::foundation::Rect;
use crate::input::{KeyMod, MouseButton, ScancodeTable};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;
use std::rc::Rc;

/// Offset between consecutive automatically placed windows
const CASCADE_STEP: i32 = 32;
/// Number of cascade positions before wrapping back to the origin
const CASCADE_SLOTS: i32 = 10;

/// A native window as seen by the headless backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessWindow {
    /// Current outer rect
    pub rect: Rect,
    /// Title bar text
    pub title: String,
    /// Decorations removed
    pub borderless: bool,
    /// Shown at least once
    pub visible: bool,
}

#[derive(Debug, Default)]
struct HeadlessState {
    initialized: bool,
    initialize_count: u32,
    shutdown_count: u32,
    displays: Vec<DisplayReport>,
    windows: BTreeMap<NativeHandle, HeadlessWindow>,
    next_handle: u64,
    created_count: u32,
    destroyed: Vec<NativeHandle>,
    queue: VecDeque<NativeEvent>,
    modifiers: KeyMod,
    initialize_failure: Option<String>,
    fail_window_creation: bool,
    fail_display_enumeration: bool,
}

/// Backend that keeps every native object in memory
#[derive(Debug)]
pub struct HeadlessBackend {
    shared: Rc<RefCell<HeadlessState>>,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    /// A backend with one 1920x1080 primary display at the origin
    pub fn new() -> Self {
        Self::with_displays(vec![DisplayReport::new(
            "HEADLESS-0",
            Rect::new(0, 0, 1920, 1080),
            60,
            true,
        )])
    }

    /// A backend reporting the given displays
    pub fn with_displays(displays: Vec<DisplayReport>) -> Self {
        let state = HeadlessState {
            displays,
            next_handle: 1,
            ..HeadlessState::default()
        };
        Self {
            shared: Rc::new(RefCell::new(state)),
        }
    }

    /// A scripting handle sharing this backend's state
    pub fn handle(&self) -> HeadlessHandle {
        HeadlessHandle {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl Backend for HeadlessBackend {
    fn name(&self) -> &str {
        "headless"
    }

    fn initialize(&mut self) -> BackendResult<()> {
        let mut state = self.shared.borrow_mut();
        if let Some(reason) = state.initialize_failure.clone() {
            return Err(BackendError::InitializationFailed(reason));
        }
        state.initialized = true;
        state.initialize_count += 1;
        Ok(())
    }

    fn shutdown(&mut self) {
        let mut state = self.shared.borrow_mut();
        if state.initialized {
            state.initialized = false;
            state.shutdown_count += 1;
        }
    }

    fn create_native_window(
        &mut self,
        width: i32,
        height: i32,
        title: &str,
    ) -> BackendResult<NativeHandle> {
        let mut state = self.shared.borrow_mut();
        if !state.initialized {
            return Err(BackendError::WindowCreationFailed(
                "backend is not initialized".to_string(),
            ));
        }
        if state.fail_window_creation {
            return Err(BackendError::WindowCreationFailed(
                "scripted creation failure".to_string(),
            ));
        }

        let handle = NativeHandle::from_raw(state.next_handle);
        state.next_handle += 1;

        let slot = i32::try_from(state.created_count).unwrap_or(0) % CASCADE_SLOTS;
        state.created_count += 1;
        let origin = CASCADE_STEP * slot;

        state.windows.insert(
            handle,
            HeadlessWindow {
                rect: Rect::new(origin, origin, width, height),
                title: title.to_string(),
                borderless: false,
                visible: false,
            },
        );
        Ok(handle)
    }

    fn move_resize(&mut self, handle: NativeHandle, rect: Rect) {
        if let Some(window) = self.shared.borrow_mut().windows.get_mut(&handle) {
            window.rect = rect;
        }
    }

    fn query_current_rect(&self, handle: NativeHandle) -> Option<Rect> {
        self.shared.borrow().windows.get(&handle).map(|w| w.rect)
    }

    fn set_borderless(&mut self, handle: NativeHandle, borderless: bool) {
        if let Some(window) = self.shared.borrow_mut().windows.get_mut(&handle) {
            window.borderless = borderless;
        }
    }

    fn set_title(&mut self, handle: NativeHandle, title: &str) {
        if let Some(window) = self.shared.borrow_mut().windows.get_mut(&handle) {
            window.title = title.to_string();
        }
    }

    fn show_window(&mut self, handle: NativeHandle) {
        if let Some(window) = self.shared.borrow_mut().windows.get_mut(&handle) {
            window.visible = true;
        }
    }

    fn destroy_native_window(&mut self, handle: NativeHandle) {
        let mut state = self.shared.borrow_mut();
        if state.windows.remove(&handle).is_some() {
            state.destroyed.push(handle);
        }
    }

    fn enumerate_displays(&mut self) -> BackendResult<Vec<DisplayReport>> {
        let state = self.shared.borrow();
        if state.fail_display_enumeration {
            return Err(BackendError::DisplayEnumerationFailed(
                "scripted enumeration failure".to_string(),
            ));
        }
        Ok(state.displays.clone())
    }

    fn pump_events(&mut self) -> Vec<NativeEvent> {
        self.shared.borrow_mut().queue.drain(..).collect()
    }

    fn query_modifier_state(&self) -> KeyMod {
        self.shared.borrow().modifiers
    }

    fn scancode_table(&self) -> ScancodeTable {
        ScancodeTable::pc_at_set1()
    }
}

/// Scripting and inspection handle for a [`HeadlessBackend`]
#[derive(Debug, Clone)]
pub struct HeadlessHandle {
    shared: Rc<RefCell<HeadlessState>>,
}

impl HeadlessHandle {
    /// Replace the displays reported by the next enumeration
    pub fn set_displays(&self, displays: Vec<DisplayReport>) {
        self.shared.borrow_mut().displays = displays;
    }

    /// Set the modifier state returned by live queries
    pub fn set_modifiers(&self, modifiers: KeyMod) {
        self.shared.borrow_mut().modifiers = modifiers;
    }

    /// Make `initialize` fail with `reason`, or succeed again with `None`
    pub fn set_initialize_failure(&self, reason: Option<&str>) {
        self.shared.borrow_mut().initialize_failure = reason.map(str::to_string);
    }

    /// Make native window creation fail
    pub fn set_window_creation_fails(&self, fails: bool) {
        self.shared.borrow_mut().fail_window_creation = fails;
    }

    /// Make display enumeration fail
    pub fn set_display_enumeration_fails(&self, fails: bool) {
        self.shared.borrow_mut().fail_display_enumeration = fails;
    }

    /// Queue a native event for the next pump
    pub fn push_event(&self, event: NativeEvent) {
        self.shared.borrow_mut().queue.push_back(event);
    }

    /// Queue a key message
    pub fn push_key(
        &self,
        handle: NativeHandle,
        scancode: u32,
        action: KeyAction,
        repeat_bits: u32,
    ) {
        self.push_event(NativeEvent::Key {
            handle,
            scancode,
            action,
            repeat_bits,
        });
    }

    /// Queue a mouse button transition
    pub fn push_mouse_button(&self, handle: NativeHandle, button: MouseButton, pressed: bool) {
        self.push_event(NativeEvent::MouseButton {
            handle,
            button,
            pressed,
        });
    }

    /// Queue a window-manager close request
    pub fn push_close_request(&self, handle: NativeHandle) {
        self.push_event(NativeEvent::CloseRequested { handle });
    }

    /// Queue a file drop
    pub fn push_file_drop(&self, handle: NativeHandle, paths: Vec<PathBuf>) {
        self.push_event(NativeEvent::FilesDropped { handle, paths });
    }

    /// Change a window's rect as the user would by dragging its frame
    ///
    /// Queues `Moved` and/or `Resized` for whatever actually changed.
    pub fn user_reshape(&self, handle: NativeHandle, rect: Rect) {
        let mut state = self.shared.borrow_mut();
        let Some(window) = state.windows.get_mut(&handle) else {
            return;
        };
        let old = window.rect;
        window.rect = rect;

        if old.origin() != rect.origin() {
            state.queue.push_back(NativeEvent::Moved { handle });
        }
        if old.size() != rect.size() {
            state.queue.push_back(NativeEvent::Resized { handle });
        }
    }

    /// Number of queued native events
    pub fn pending_events(&self) -> usize {
        self.shared.borrow().queue.len()
    }

    /// Snapshot of a live native window
    pub fn window(&self, handle: NativeHandle) -> Option<HeadlessWindow> {
        self.shared.borrow().windows.get(&handle).cloned()
    }

    /// Handles of every live native window, in creation order
    pub fn live_handles(&self) -> Vec<NativeHandle> {
        self.shared.borrow().windows.keys().copied().collect()
    }

    /// Number of live native windows
    pub fn live_window_count(&self) -> usize {
        self.shared.borrow().windows.len()
    }

    /// Handles released so far, in release order
    pub fn destroyed_handles(&self) -> Vec<NativeHandle> {
        self.shared.borrow().destroyed.clone()
    }

    /// Whether the backend is currently initialized
    pub fn is_initialized(&self) -> bool {
        self.shared.borrow().initialized
    }

    /// How many times `initialize` succeeded
    pub fn initialize_count(&self) -> u32 {
        self.shared.borrow().initialize_count
    }

    /// How many times an initialized backend was shut down
    pub fn shutdown_count(&self) -> u32 {
        self.shared.borrow().shutdown_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized() -> (HeadlessBackend, HeadlessHandle) {
        let mut backend = HeadlessBackend::new();
        backend.initialize().unwrap();
        let handle = backend.handle();
        (backend, handle)
    }

    #[test]
    fn test_windows_cascade_and_release() {
        let (mut backend, script) = initialized();

        let first = backend.create_native_window(300, 200, "one").unwrap();
        let second = backend.create_native_window(300, 200, "two").unwrap();

        assert_eq!(backend.query_current_rect(first), Some(Rect::new(0, 0, 300, 200)));
        assert_eq!(backend.query_current_rect(second), Some(Rect::new(32, 32, 300, 200)));

        backend.destroy_native_window(first);
        assert_eq!(script.live_handles(), vec![second]);
        assert_eq!(script.destroyed_handles(), vec![first]);
        assert_eq!(backend.query_current_rect(first), None);
    }

    #[test]
    fn test_creation_requires_initialize() {
        let mut backend = HeadlessBackend::new();
        assert!(backend.create_native_window(10, 10, "x").is_err());
    }

    #[test]
    fn test_scripted_failures() {
        let mut backend = HeadlessBackend::new();
        let script = backend.handle();

        script.set_initialize_failure(Some("no display server"));
        assert_eq!(
            backend.initialize(),
            Err(BackendError::InitializationFailed("no display server".to_string()))
        );

        script.set_initialize_failure(None);
        backend.initialize().unwrap();

        script.set_window_creation_fails(true);
        assert!(backend.create_native_window(10, 10, "x").is_err());

        script.set_display_enumeration_fails(true);
        assert!(backend.enumerate_displays().is_err());
    }

    #[test]
    fn test_pump_drains_queue() {
        let (mut backend, script) = initialized();
        let handle = backend.create_native_window(10, 10, "x").unwrap();

        script.push_close_request(handle);
        script.push_key(handle, 0x01E, KeyAction::Down, 1);
        assert_eq!(script.pending_events(), 2);

        let events = backend.pump_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], NativeEvent::CloseRequested { handle });
        assert!(backend.pump_events().is_empty());
    }

    #[test]
    fn test_user_reshape_reports_changes() {
        let (mut backend, script) = initialized();
        let handle = backend.create_native_window(100, 100, "x").unwrap();

        script.user_reshape(handle, Rect::new(0, 0, 150, 100));
        assert_eq!(backend.pump_events(), vec![NativeEvent::Resized { handle }]);

        script.user_reshape(handle, Rect::new(5, 5, 200, 120));
        assert_eq!(
            backend.pump_events(),
            vec![NativeEvent::Moved { handle }, NativeEvent::Resized { handle }]
        );
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let (mut backend, script) = initialized();
        backend.shutdown();
        backend.shutdown();
        assert!(!script.is_initialized());
        assert_eq!(script.shutdown_count(), 1);
    }
}
