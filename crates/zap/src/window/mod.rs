//! Window identity, options and callbacks
//!
//! The registry of live windows lives in [`registry`]; the operations that
//! need the backend or invoke callbacks are methods on
//! [`Session`](crate::session::Session).

pub mod registry;

pub use registry::{WindowEntry, WindowRegistry};

use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// Default title for windows created without one
pub const DEFAULT_TITLE: &str = "zap";

/// Window identifier
///
/// Ids are assigned from 1 upwards and never reused within a session.
/// [`WindowId::INVALID`] (0) means "no window".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WindowId(u32);

impl WindowId {
    /// The reserved "no window" id
    pub const INVALID: Self = Self(0);

    /// Wrap a raw id value
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id value
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether this is anything other than [`WindowId::INVALID`]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a window occupies its display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Regular decorated window
    #[default]
    Normal,
    /// Maximized to the work area
    Maximized,
    /// Exclusive fullscreen on the window's display
    Fullscreen,
    /// Undecorated window covering the window's display
    BorderlessFullscreen,
    /// Not a usable mode; requests for it are ignored
    Invalid,
}

impl DisplayMode {
    /// Whether the mode covers the whole display
    pub const fn is_fullscreen(self) -> bool {
        matches!(self, Self::Fullscreen | Self::BorderlessFullscreen)
    }
}

/// Where a new window is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PositionMode {
    /// Let the backend pick a position
    #[default]
    Auto,
    /// Use the `x` / `y` from the options
    Custom,
    /// Centre on the primary display
    Centered,
}

/// Called once the window exists and is registered
pub type AfterCreateCallback = Box<dyn FnMut(&mut Session, WindowId)>;
/// Called once per loop iteration with the frame delta in seconds
pub type UpdateCallback = Box<dyn FnMut(&mut Session, WindowId, f32)>;
/// Called when a close is requested; returning false vetoes the close
pub type BeforeCloseCallback = Box<dyn FnMut(&mut Session, WindowId) -> bool>;
/// Called right before the native window is released
pub type BeforeDestroyCallback = Box<dyn FnMut(&mut Session, WindowId)>;

/// Per-window lifecycle callbacks
///
/// Every callback receives the session, so it may create, query or close
/// windows (including its own) while it runs.
#[derive(Default)]
pub struct WindowCallbacks {
    /// After-create notification
    pub on_after_create: Option<AfterCreateCallback>,
    /// Per-iteration update
    pub on_update: Option<UpdateCallback>,
    /// Close veto
    pub on_before_close: Option<BeforeCloseCallback>,
    /// Before-destroy notification
    pub on_before_destroy: Option<BeforeDestroyCallback>,
}

impl fmt::Debug for WindowCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowCallbacks")
            .field("on_after_create", &self.on_after_create.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_before_close", &self.on_before_close.is_some())
            .field("on_before_destroy", &self.on_before_destroy.is_some())
            .finish()
    }
}

/// Parameters for [`Session::window_create`]
pub struct WindowOptions {
    /// Left edge for [`PositionMode::Custom`]
    pub x: i32,
    /// Top edge for [`PositionMode::Custom`]
    pub y: i32,
    /// Requested width
    pub width: i32,
    /// Requested height
    pub height: i32,
    /// Placement strategy
    pub position: PositionMode,
    /// Initial display mode
    pub display_mode: DisplayMode,
    /// Title bar text, [`DEFAULT_TITLE`] when absent
    pub title: Option<String>,
    /// Arbitrary payload retrievable through [`Session::window_user_data`]
    pub user_data: Option<Box<dyn Any>>,
    /// Lifecycle callbacks
    pub callbacks: WindowCallbacks,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 1280,
            height: 720,
            position: PositionMode::Auto,
            display_mode: DisplayMode::Normal,
            title: None,
            user_data: None,
            callbacks: WindowCallbacks::default(),
        }
    }
}

impl fmt::Debug for WindowOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowOptions")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("position", &self.position)
            .field("display_mode", &self.display_mode)
            .field("title", &self.title)
            .field("user_data", &self.user_data.is_some())
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

impl WindowOptions {
    /// Options for an automatically placed window of the given size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Place the window at an absolute position
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self.position = PositionMode::Custom;
        self
    }

    /// Centre the window on the primary display
    pub fn centered(mut self) -> Self {
        self.position = PositionMode::Centered;
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the initial display mode
    pub fn with_display_mode(mut self, display_mode: DisplayMode) -> Self {
        self.display_mode = display_mode;
        self
    }

    /// Attach a user payload
    pub fn with_user_data<T: Any>(mut self, user_data: T) -> Self {
        self.user_data = Some(Box::new(user_data));
        self
    }

    /// Set the after-create callback
    pub fn on_after_create(mut self, f: impl FnMut(&mut Session, WindowId) + 'static) -> Self {
        self.callbacks.on_after_create = Some(Box::new(f));
        self
    }

    /// Set the update callback
    pub fn on_update(mut self, f: impl FnMut(&mut Session, WindowId, f32) + 'static) -> Self {
        self.callbacks.on_update = Some(Box::new(f));
        self
    }

    /// Set the close veto callback
    pub fn on_before_close(
        mut self,
        f: impl FnMut(&mut Session, WindowId) -> bool + 'static,
    ) -> Self {
        self.callbacks.on_before_close = Some(Box::new(f));
        self
    }

    /// Set the before-destroy callback
    pub fn on_before_destroy(mut self, f: impl FnMut(&mut Session, WindowId) + 'static) -> Self {
        self.callbacks.on_before_destroy = Some(Box::new(f));
        self
    }

    /// The title the native window will get
    pub fn resolved_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_id_validity() {
        assert!(!WindowId::INVALID.is_valid());
        assert!(WindowId::from_raw(1).is_valid());
        assert_eq!(WindowId::default(), WindowId::INVALID);
        assert!(WindowId::from_raw(2) > WindowId::from_raw(1));
    }

    #[test]
    fn test_options_builder() {
        let options = WindowOptions::new(640, 480)
            .at(10, 20)
            .with_title("tools")
            .with_display_mode(DisplayMode::Maximized)
            .with_user_data(42_u32)
            .on_update(|_, _, _| {});

        assert_eq!((options.x, options.y), (10, 20));
        assert_eq!(options.position, PositionMode::Custom);
        assert_eq!(options.display_mode, DisplayMode::Maximized);
        assert_eq!(options.resolved_title(), "tools");
        assert!(options.user_data.is_some());
        assert!(options.callbacks.on_update.is_some());
        assert!(options.callbacks.on_before_close.is_none());
    }

    #[test]
    fn test_default_title() {
        let options = WindowOptions::new(100, 100).centered();
        assert_eq!(options.position, PositionMode::Centered);
        assert_eq!(options.resolved_title(), DEFAULT_TITLE);
    }

    #[test]
    fn test_fullscreen_modes() {
        assert!(DisplayMode::Fullscreen.is_fullscreen());
        assert!(DisplayMode::BorderlessFullscreen.is_fullscreen());
        assert!(!DisplayMode::Maximized.is_fullscreen());
    }
}
