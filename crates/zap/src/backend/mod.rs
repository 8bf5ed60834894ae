//! Native window-system backend contract
//!
//! The session talks to the platform only through the [`Backend`] trait. A
//! backend owns every native resource (window class, display connection,
//! native windows) and reports native activity as [`NativeEvent`]s; it never
//! sees window ids, callbacks or registry state.
//!
//! # Implementations
//!
//! - [`headless::HeadlessBackend`]: in-memory, scriptable; used by tests and
//!   tools that run without a display server
//! - `glfw_backend::GlfwBackend` (feature `glfw`): desktop windows through GLFW

pub mod headless;

#[cfg(feature = "glfw")]
pub mod glfw_backend;

pub use crate::events::KeyAction;

use crate::foundation::Rect;
use crate::input::{KeyMod, MouseButton, ScancodeTable};
use std::path::PathBuf;
use thiserror::Error;

/// Backend errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Acquiring process-wide native resources failed
    #[error("Backend initialization failed: {0}")]
    InitializationFailed(String),

    /// The window system refused to create a window
    #[error("Window creation failed: {0}")]
    WindowCreationFailed(String),

    /// Displays could not be enumerated
    #[error("Display enumeration failed: {0}")]
    DisplayEnumerationFailed(String),
}

/// Backend operation result
pub type BackendResult<T> = Result<T, BackendError>;

/// Opaque reference to a native window owned by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NativeHandle(u64);

impl NativeHandle {
    /// Wrap a backend-specific handle value
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The backend-specific handle value
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// One display as reported by [`Backend::enumerate_displays`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayReport {
    /// Stable platform key (device name, screen number)
    pub key: String,
    /// Geometry in virtual-desktop coordinates
    pub rect: Rect,
    /// Refresh rate in Hz, 0 when unknown
    pub refresh_rate: u32,
    /// Whether the platform considers this the primary display
    pub is_primary: bool,
}

impl DisplayReport {
    /// Create a display report
    pub fn new(key: impl Into<String>, rect: Rect, refresh_rate: u32, is_primary: bool) -> Self {
        Self {
            key: key.into(),
            rect,
            refresh_rate,
            is_primary,
        }
    }
}

/// Raw window-system notification drained by [`Backend::pump_events`]
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    /// The user asked the window manager to close the window
    CloseRequested {
        /// Originating window
        handle: NativeHandle,
    },
    /// The native size changed
    Resized {
        /// Originating window
        handle: NativeHandle,
    },
    /// The native position changed
    Moved {
        /// Originating window
        handle: NativeHandle,
    },
    /// Input focus changed
    Focus {
        /// Originating window
        handle: NativeHandle,
        /// Whether the window now has focus
        focused: bool,
    },
    /// Keyboard message
    Key {
        /// Originating window
        handle: NativeHandle,
        /// Native scan value, looked up in the backend's scancode table
        scancode: u32,
        /// Press or release
        action: KeyAction,
        /// Native repeat information; the low 16 bits are the repeat count
        repeat_bits: u32,
    },
    /// Cursor moved over the window
    CursorMoved {
        /// Originating window
        handle: NativeHandle,
        /// Horizontal position in window coordinates
        x: f64,
        /// Vertical position in window coordinates
        y: f64,
    },
    /// Cursor entered or left the window
    CursorEntered {
        /// Originating window
        handle: NativeHandle,
        /// Entered (true) or left (false)
        entered: bool,
    },
    /// Mouse button transition
    MouseButton {
        /// Originating window
        handle: NativeHandle,
        /// Button
        button: MouseButton,
        /// Pressed (true) or released (false)
        pressed: bool,
    },
    /// Files were dropped onto the window, in platform enumeration order
    FilesDropped {
        /// Originating window
        handle: NativeHandle,
        /// Dropped paths
        paths: Vec<PathBuf>,
    },
    /// The display configuration changed
    DisplaysChanged,
}

impl NativeEvent {
    /// The window this event belongs to, if any
    pub const fn handle(&self) -> Option<NativeHandle> {
        match self {
            Self::CloseRequested { handle }
            | Self::Resized { handle }
            | Self::Moved { handle }
            | Self::Focus { handle, .. }
            | Self::Key { handle, .. }
            | Self::CursorMoved { handle, .. }
            | Self::CursorEntered { handle, .. }
            | Self::MouseButton { handle, .. }
            | Self::FilesDropped { handle, .. } => Some(*handle),
            Self::DisplaysChanged => None,
        }
    }
}

/// Native window-system primitives consumed by the session
///
/// All methods are called from the thread that runs the session loop.
pub trait Backend {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Acquire process-wide native resources
    fn initialize(&mut self) -> BackendResult<()>;

    /// Release what [`Backend::initialize`] acquired; must tolerate repeats
    fn shutdown(&mut self);

    /// Create and register a native window; it stays hidden until shown
    fn create_native_window(
        &mut self,
        width: i32,
        height: i32,
        title: &str,
    ) -> BackendResult<NativeHandle>;

    /// Move and resize a native window
    fn move_resize(&mut self, handle: NativeHandle, rect: Rect);

    /// The current outer rect of a native window
    fn query_current_rect(&self, handle: NativeHandle) -> Option<Rect>;

    /// Remove or restore window decorations
    fn set_borderless(&mut self, _handle: NativeHandle, _borderless: bool) {}

    /// Change the title bar text
    fn set_title(&mut self, _handle: NativeHandle, _title: &str) {}

    /// Make a freshly created window visible
    fn show_window(&mut self, _handle: NativeHandle) {}

    /// Release a native window
    fn destroy_native_window(&mut self, handle: NativeHandle);

    /// Enumerate the connected displays
    fn enumerate_displays(&mut self) -> BackendResult<Vec<DisplayReport>>;

    /// Drain every queued native event without blocking
    fn pump_events(&mut self) -> Vec<NativeEvent>;

    /// Modifier keys held right now
    fn query_modifier_state(&self) -> KeyMod;

    /// Build the scan code table; called once per session initialization
    fn scancode_table(&self) -> ScancodeTable;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_event_handle() {
        let handle = NativeHandle::from_raw(7);

        assert_eq!(NativeEvent::Resized { handle }.handle(), Some(handle));
        assert_eq!(
            NativeEvent::FilesDropped { handle, paths: Vec::new() }.handle(),
            Some(handle)
        );
        assert_eq!(NativeEvent::DisplaysChanged.handle(), None);
    }

    #[test]
    fn test_error_messages() {
        let err = BackendError::WindowCreationFailed("out of handles".to_string());
        assert_eq!(err.to_string(), "Window creation failed: out of handles");
    }
}
