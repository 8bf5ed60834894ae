//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Integer screen geometry
//! - Frame timing
//! - Logging utilities

pub mod geometry;
pub mod logging;
pub mod time;

pub use geometry::Rect;
