//! # zap
//!
//! Window and display management with a cooperative, single-threaded main loop.
//!
//! ## Features
//!
//! - **Window registry**: ordered windows with stable ids and deferred, vetoable closing
//! - **Display registry**: enumerated displays with geometric window-to-display lookup
//! - **Normalized events**: keys, mouse, geometry and file drops independent of the platform
//! - **Pluggable backends**: an in-memory backend for tests and an optional GLFW backend
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zap::prelude::*;
//!
//! fn main() {
//!     zap::foundation::logging::init();
//!
//!     let options = SessionOptions::new().on_after_init(|session| {
//!         let window = WindowOptions::new(800, 600)
//!             .centered()
//!             .with_title("Hello")
//!             .on_update(|session, id, _delta| {
//!                 if session.ticks() > 5_000 {
//!                     session.window_request_close(id);
//!                 }
//!             });
//!         session.window_create(window).is_valid()
//!     });
//!
//!     std::process::exit(zap::run(HeadlessBackend::new(), options));
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod backend;
pub mod config;
pub mod display;
pub mod events;
pub mod foundation;
pub mod input;
pub mod session;
pub mod window;

pub use session::{run, Session, SessionError, SessionOptions, SessionState};

/// Common imports for zap users
pub mod prelude {
    pub use crate::{
        backend::{headless::HeadlessBackend, Backend, BackendError},
        config::{Config, SessionConfig, WindowConfig},
        display::{DisplayId, DisplayInfo},
        events::{Event, EventType},
        foundation::Rect,
        input::{KeyCode, KeyMod, MouseButton},
        session::{run, Session, SessionError, SessionOptions, SessionState},
        window::{DisplayMode, PositionMode, WindowId, WindowOptions},
    };

    #[cfg(feature = "glfw")]
    pub use crate::backend::glfw_backend::GlfwBackend;
}
