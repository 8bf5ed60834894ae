//! Display registry
//!
//! Keeps one entry per physical display reported by the backend. Entries are
//! keyed by the backend's stable display key so that re-enumeration updates
//! them in place and their ids survive across refreshes.

use crate::backend::DisplayReport;
use crate::foundation::Rect;
use crate::window::DisplayMode;
use std::fmt;

/// Display identifier
///
/// Ids are assigned from 1 upwards and never reused within a session.
/// [`DisplayId::INVALID`] (0) means "no display".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DisplayId(u32);

impl DisplayId {
    /// The reserved "no display" id
    pub const INVALID: Self = Self(0);

    /// Wrap a raw id value
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id value
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether this is anything other than [`DisplayId::INVALID`]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of one display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayInfo {
    /// Display id
    pub id: DisplayId,
    /// Geometry in virtual-desktop coordinates
    pub rect: Rect,
    /// Refresh rate in Hz, 0 when unknown
    pub refresh_rate: u32,
    /// Current display mode
    pub display_mode: DisplayMode,
    /// Whether this is the primary display
    pub is_primary: bool,
}

#[derive(Debug, Clone)]
struct DisplayEntry {
    id: DisplayId,
    key: String,
    rect: Rect,
    refresh_rate: u32,
    display_mode: DisplayMode,
}

/// Registry of known displays
#[derive(Debug)]
pub struct DisplayRegistry {
    next_id: u32,
    entries: Vec<DisplayEntry>,
    primary: DisplayId,
}

impl Default for DisplayRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayRegistry {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
            primary: DisplayId::INVALID,
        }
    }

    /// Merge one reported display
    ///
    /// An existing entry with the same key keeps its id and has its geometry
    /// and refresh rate overwritten; otherwise a new entry is appended.
    pub fn upsert(
        &mut self,
        key: &str,
        rect: Rect,
        refresh_rate: u32,
        is_primary: bool,
    ) -> DisplayId {
        let id = if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.rect = rect;
            entry.refresh_rate = refresh_rate;
            entry.id
        } else {
            let id = DisplayId(self.next_id);
            self.next_id += 1;
            self.entries.push(DisplayEntry {
                id,
                key: key.to_string(),
                rect,
                refresh_rate,
                display_mode: DisplayMode::Normal,
            });
            log::debug!("Found display {} '{}' at {} @ {}Hz", id, key, rect, refresh_rate);
            id
        };

        if is_primary {
            self.primary = id;
        }
        id
    }

    /// Replace the registry contents with a fresh enumeration
    ///
    /// Displays whose key is no longer reported are dropped. When no report
    /// is flagged primary, the first reported display becomes primary.
    pub fn refresh(&mut self, reports: &[DisplayReport]) {
        self.primary = DisplayId::INVALID;

        let seen: Vec<DisplayId> = reports
            .iter()
            .map(|r| self.upsert(&r.key, r.rect, r.refresh_rate, r.is_primary))
            .collect();

        let before = self.entries.len();
        self.entries.retain(|e| seen.contains(&e.id));
        if self.entries.len() != before {
            log::debug!("{} display(s) disconnected", before - self.entries.len());
        }

        if !self.primary.is_valid() {
            self.primary = seen.first().copied().unwrap_or(DisplayId::INVALID);
        }
    }

    /// The primary display, [`DisplayId::INVALID`] if none is known
    pub const fn primary(&self) -> DisplayId {
        self.primary
    }

    /// Snapshot of a display
    pub fn info(&self, id: DisplayId) -> Option<DisplayInfo> {
        self.entries.iter().find(|e| e.id == id).map(|e| self.snapshot(e))
    }

    /// Snapshot of the primary display
    pub fn primary_info(&self) -> Option<DisplayInfo> {
        self.info(self.primary)
    }

    /// The display a window with the given rect is on
    ///
    /// Tests the window's top-left corner against every display rect with
    /// inclusive edges. When several displays contain the corner (overlap or
    /// a shared edge) the one sharing the most area with the window wins,
    /// then the smallest display id.
    pub fn resolve_for_rect(&self, window_rect: &Rect) -> Option<DisplayInfo> {
        let (x, y) = window_rect.origin();
        self.entries
            .iter()
            .filter(|e| e.rect.contains_point(x, y))
            .max_by(|a, b| {
                a.rect
                    .overlap_area(window_rect)
                    .cmp(&b.rect.overlap_area(window_rect))
                    .then_with(|| b.id.cmp(&a.id))
            })
            .map(|e| self.snapshot(e))
    }

    /// Like [`resolve_for_rect`](Self::resolve_for_rect), falling back to the
    /// primary display when no display contains the corner
    pub fn resolve_or_primary(&self, window_rect: &Rect) -> Option<DisplayInfo> {
        self.resolve_for_rect(window_rect).or_else(|| self.primary_info())
    }

    /// Record the mode a display is currently driven in
    pub fn set_display_mode(&mut self, id: DisplayId, mode: DisplayMode) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.display_mode = mode;
                true
            }
            None => false,
        }
    }

    /// Ids of all known displays in enumeration order
    pub fn ids(&self) -> Vec<DisplayId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Snapshots of all known displays in enumeration order
    pub fn all(&self) -> Vec<DisplayInfo> {
        self.entries.iter().map(|e| self.snapshot(e)).collect()
    }

    /// Number of known displays
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no display is known
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every display; ids are not reused afterwards
    pub fn clear(&mut self) {
        self.entries.clear();
        self.primary = DisplayId::INVALID;
    }

    fn snapshot(&self, entry: &DisplayEntry) -> DisplayInfo {
        DisplayInfo {
            id: entry.id,
            rect: entry.rect,
            refresh_rate: entry.refresh_rate,
            display_mode: entry.display_mode,
            is_primary: entry.id == self.primary,
        }
    }
}
