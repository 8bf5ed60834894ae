//! Window registry
//!
//! An ordered list of live windows. Slot positions are not identities: an
//! entry keeps its [`WindowId`] while entries before it are removed and the
//! list compacts.

use super::{DisplayMode, WindowCallbacks, WindowId};
use crate::backend::NativeHandle;
use crate::foundation::Rect;
use std::any::Any;
use std::fmt;

/// The registry's record of one live window
pub struct WindowEntry {
    pub(crate) id: WindowId,
    pub(crate) handle: NativeHandle,
    pub(crate) rect: Rect,
    pub(crate) previous_rect: Rect,
    pub(crate) display_mode: DisplayMode,
    pub(crate) close_requested: bool,
    pub(crate) in_close_callback: bool,
    pub(crate) title: String,
    pub(crate) user_data: Option<Box<dyn Any>>,
    pub(crate) callbacks: WindowCallbacks,
}

impl WindowEntry {
    /// Create an entry for a freshly created native window
    pub(crate) fn new(id: WindowId, handle: NativeHandle, rect: Rect, title: String) -> Self {
        Self {
            id,
            handle,
            rect,
            previous_rect: rect,
            display_mode: DisplayMode::Normal,
            close_requested: false,
            in_close_callback: false,
            title,
            user_data: None,
            callbacks: WindowCallbacks::default(),
        }
    }

    /// Window id
    pub const fn id(&self) -> WindowId {
        self.id
    }

    /// Backend handle of the native window
    pub const fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    /// Current outer rect
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Rect before the last display mode change
    pub const fn previous_rect(&self) -> Rect {
        self.previous_rect
    }

    /// Current display mode
    pub const fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// Whether a close has been accepted and is waiting for the next close pass
    pub const fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Title bar text
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether a user payload is attached
    pub const fn has_user_data(&self) -> bool {
        self.user_data.is_some()
    }
}

impl fmt::Debug for WindowEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowEntry")
            .field("id", &self.id)
            .field("handle", &self.handle)
            .field("rect", &self.rect)
            .field("previous_rect", &self.previous_rect)
            .field("display_mode", &self.display_mode)
            .field("close_requested", &self.close_requested)
            .field("title", &self.title)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

/// Ordered registry of live windows
#[derive(Debug)]
pub struct WindowRegistry {
    next_id: u32,
    windows: Vec<WindowEntry>,
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowRegistry {
    /// Create an empty registry; the first id handed out is 1
    pub const fn new() -> Self {
        Self {
            next_id: 1,
            windows: Vec::new(),
        }
    }

    /// Reserve the next window id
    ///
    /// Ids are consumed even if the window never makes it into the registry.
    pub(crate) fn allocate_id(&mut self) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append an entry
    pub(crate) fn insert(&mut self, entry: WindowEntry) {
        debug_assert!(self.find(entry.id).is_none(), "window {} registered twice", entry.id);
        self.windows.push(entry);
    }

    /// Find a window by id
    pub fn find(&self, id: WindowId) -> Option<&WindowEntry> {
        self.windows.iter().find(|w| w.id == id)
    }

    /// Find a window by id for mutation
    pub(crate) fn find_mut(&mut self, id: WindowId) -> Option<&mut WindowEntry> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    /// Map a native handle back to its window
    pub fn find_by_handle(&self, handle: NativeHandle) -> Option<WindowId> {
        self.windows.iter().find(|w| w.handle == handle).map(|w| w.id)
    }

    /// Remove a window, shifting later entries down one slot
    pub(crate) fn remove(&mut self, id: WindowId) -> Option<WindowEntry> {
        let index = self.windows.iter().position(|w| w.id == id)?;
        Some(self.windows.remove(index))
    }

    /// Id of the window in slot `index`
    pub fn id_at(&self, index: usize) -> Option<WindowId> {
        self.windows.get(index).map(|w| w.id)
    }

    /// Ids of every live window in registry order
    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.iter().map(|w| w.id).collect()
    }

    /// Ids of windows with an accepted close request, in registry order
    pub fn pending_close(&self) -> Vec<WindowId> {
        self.windows
            .iter()
            .filter(|w| w.close_requested)
            .map(|w| w.id)
            .collect()
    }

    /// Flag every live window for closing without consulting vetoes
    pub(crate) fn flag_all_for_close(&mut self) {
        for window in &mut self.windows {
            window.close_requested = true;
        }
    }

    /// Iterate over live windows in registry order
    pub fn iter(&self) -> impl Iterator<Item = &WindowEntry> {
        self.windows.iter()
    }

    /// Number of live windows
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether no window is live
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
