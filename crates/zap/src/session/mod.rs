//! Session lifecycle and main loop
//!
//! A [`Session`] owns the backend, both registries, the event translator and
//! the user callbacks. Everything runs on the thread that calls
//! [`Session::run_loop`]; callbacks receive `&mut Session` and may re-enter
//! any public operation.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --init--> Initialized --tick/run_loop--> Running --destroy--> Destroyed
//!       ^                      |
//!       +--- failed init ------+
//! ```

mod pump;
mod windows;


use crate::backend::{Backend, BackendError};
use crate::display::{DisplayId, DisplayInfo, DisplayRegistry};
use crate::events::{Event, EventTranslator};
use crate::foundation::time::Timer;
use crate::window::WindowRegistry;
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// Called once after backend setup; returning false aborts `init`
pub type AfterInitCallback = Box<dyn FnOnce(&mut Session) -> bool>;
/// Called first during `destroy`
pub type BeforeDestroyCallback = Box<dyn FnOnce(&mut Session)>;
/// Receives every normalized event
pub type EventCallback = Box<dyn FnMut(&mut Session, &Event)>;

/// Session-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// `init` called on a session that is already initialized
    #[error("Session is already initialized")]
    AlreadyInitialized,

    /// `init` called after `destroy`
    #[error("Session has been destroyed")]
    Destroyed,

    /// Backend setup or display enumeration failed
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// The after-init callback reported failure
    #[error("After-init callback reported failure")]
    InitCallbackFailed,
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Created, not yet initialized
    Uninitialized,
    /// Backend set up, displays known
    Initialized,
    /// At least one loop iteration has started
    Running,
    /// Torn down; terminal
    Destroyed,
}

/// Parameters for [`Session::init`]
#[derive(Default)]
pub struct SessionOptions {
    /// Arbitrary payload retrievable through [`Session::user_data`]
    pub user_data: Option<Box<dyn Any>>,
    /// After-init callback
    pub on_after_init: Option<AfterInitCallback>,
    /// Before-destroy callback
    pub on_before_destroy: Option<BeforeDestroyCallback>,
    /// Event callback
    pub on_event: Option<EventCallback>,
}

impl SessionOptions {
    /// Empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a user payload
    pub fn with_user_data<T: Any>(mut self, user_data: T) -> Self {
        self.user_data = Some(Box::new(user_data));
        self
    }

    /// Set the after-init callback
    pub fn on_after_init(mut self, f: impl FnOnce(&mut Session) -> bool + 'static) -> Self {
        self.on_after_init = Some(Box::new(f));
        self
    }

    /// Set the before-destroy callback
    pub fn on_before_destroy(mut self, f: impl FnOnce(&mut Session) + 'static) -> Self {
        self.on_before_destroy = Some(Box::new(f));
        self
    }

    /// Set the event callback
    pub fn on_event(mut self, f: impl FnMut(&mut Session, &Event) + 'static) -> Self {
        self.on_event = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("user_data", &self.user_data.is_some())
            .field("on_after_init", &self.on_after_init.is_some())
            .field("on_before_destroy", &self.on_before_destroy.is_some())
            .field("on_event", &self.on_event.is_some())
            .finish()
    }
}

/// Window and display session
///
/// The session coordinates the backend, the registries and the user
/// callbacks, and runs the main loop.
pub struct Session {
    backend: Box<dyn Backend>,
    state: SessionState,
    tearing_down: bool,
    windows: WindowRegistry,
    displays: DisplayRegistry,
    translator: Option<EventTranslator>,
    on_before_destroy: Option<BeforeDestroyCallback>,
    on_event: Option<EventCallback>,
    user_data: Option<Box<dyn Any>>,
    timer: Timer,
    event_queue: VecDeque<Event>,
    dispatching: bool,
}

impl Session {
    /// Create an uninitialized session around a backend
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self::with_boxed_backend(Box::new(backend))
    }

    /// Create an uninitialized session around an already boxed backend
    pub fn with_boxed_backend(backend: Box<dyn Backend>) -> Self {
        Self {
            backend,
            state: SessionState::Uninitialized,
            tearing_down: false,
            windows: WindowRegistry::new(),
            displays: DisplayRegistry::new(),
            translator: None,
            on_before_destroy: None,
            on_event: None,
            user_data: None,
            timer: Timer::new(),
            event_queue: VecDeque::new(),
            dispatching: false,
        }
    }

    /// Set up the backend, enumerate displays and run the after-init callback
    ///
    /// On failure every resource acquired so far is released again and the
    /// session is back to [`SessionState::Uninitialized`]. Calling `init` on
    /// an initialized session fails without touching it.
    pub fn init(&mut self, options: SessionOptions) -> Result<(), SessionError> {
        match self.state {
            SessionState::Uninitialized => {}
            SessionState::Initialized | SessionState::Running => {
                return Err(SessionError::AlreadyInitialized)
            }
            SessionState::Destroyed => return Err(SessionError::Destroyed),
        }

        log::info!("Initializing session on '{}' backend...", self.backend.name());

        self.backend.initialize()?;
        self.translator = Some(EventTranslator::new(self.backend.scancode_table()));
        self.state = SessionState::Initialized;

        if let Err(e) = self.try_refresh_displays() {
            log::error!("Initial display enumeration failed: {}", e);
            self.rollback_init();
            return Err(e.into());
        }

        let SessionOptions {
            user_data,
            on_after_init,
            on_before_destroy,
            on_event,
        } = options;
        self.user_data = user_data;
        self.on_before_destroy = on_before_destroy;
        self.on_event = on_event;
        self.timer.reset();

        if let Some(after_init) = on_after_init {
            if !after_init(self) {
                log::warn!("After-init callback failed, rolling back session setup");
                self.rollback_init();
                return Err(SessionError::InitCallbackFailed);
            }
        }

        log::info!(
            "Session initialized: {} display(s), {} window(s)",
            self.displays.len(),
            self.windows.len()
        );
        Ok(())
    }

    /// Tear the session down
    ///
    /// Runs the before-destroy callback, destroys every window (with their
    /// before-destroy callbacks), forgets all displays and shuts the backend
    /// down. Windows cannot be created while this runs.
    ///
    /// # Panics
    /// If the session was already destroyed.
    pub fn destroy(&mut self) {
        assert!(
            self.state != SessionState::Destroyed,
            "zap session destroyed twice"
        );
        log::info!("Destroying session...");

        if let Some(before_destroy) = self.on_before_destroy.take() {
            before_destroy(self);
        }

        self.tearing_down = true;
        self.destroy_all_windows();
        self.displays.clear();
        self.translator = None;
        self.on_event = None;
        self.event_queue.clear();
        self.user_data = None;
        self.backend.shutdown();
        self.tearing_down = false;
        self.state = SessionState::Destroyed;

        log::info!("Session destroyed");
    }

    /// Run the main loop until no window is left
    pub fn run_loop(&mut self) {
        self.assert_initialized();
        log::info!("Starting main loop with {} window(s)...", self.windows.len());

        while !self.windows.is_empty() {
            self.tick();
        }

        log::info!("Main loop finished after {} iteration(s)", self.timer.frame_count());
    }

    /// Run one loop iteration; returns whether any window is left
    ///
    /// Drains the backend event queue, calls every window's update callback
    /// in registry order, then destroys the windows whose close was accepted.
    pub fn tick(&mut self) -> bool {
        self.assert_initialized();
        self.state = SessionState::Running;

        let delta = self.timer.update();
        self.pump_events();
        self.update_windows(delta);
        // A callback may have destroyed the session
        if self.is_initialized() {
            self.process_pending_closes();
        }

        !self.windows.is_empty()
    }

    /// Flag every live window for closing
    ///
    /// Vetoes are not consulted; the windows go away in the next close pass.
    pub fn request_exit(&mut self) {
        self.assert_initialized();
        log::info!("Exit requested, closing {} window(s)", self.windows.len());
        self.windows.flag_all_for_close();
    }

    /// Current lifecycle state
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Whether window and display operations may be used
    pub const fn is_initialized(&self) -> bool {
        matches!(self.state, SessionState::Initialized | SessionState::Running)
    }

    /// Name of the backend in use
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Milliseconds since `init`
    pub fn ticks(&self) -> u64 {
        self.timer.ticks()
    }

    /// Replace the session payload
    pub fn set_user_data<T: Any>(&mut self, user_data: T) {
        self.assert_initialized();
        self.user_data = Some(Box::new(user_data));
    }

    /// The session payload, if present and of type `T`
    pub fn user_data<T: Any>(&self) -> Option<&T> {
        self.user_data.as_deref().and_then(|data| data.downcast_ref())
    }

    /// Mutable access to the session payload, if present and of type `T`
    pub fn user_data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.user_data.as_deref_mut().and_then(|data| data.downcast_mut())
    }

    /// Read access to the window registry
    pub const fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    /// Read access to the display registry
    pub const fn displays(&self) -> &DisplayRegistry {
        &self.displays
    }

    /// Re-enumerate displays
    ///
    /// Returns false (and keeps the previous entries) if the backend could
    /// not enumerate.
    pub fn refresh_displays(&mut self) -> bool {
        self.assert_initialized();
        match self.try_refresh_displays() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Display refresh failed: {}", e);
                false
            }
        }
    }

    /// The primary display, [`DisplayId::INVALID`] when none is known
    pub fn primary_display(&self) -> DisplayId {
        self.assert_initialized();
        self.displays.primary()
    }

    /// Snapshot of a display
    pub fn display_info(&self, id: DisplayId) -> Option<DisplayInfo> {
        self.assert_initialized();
        self.displays.info(id)
    }

    /// Snapshots of every known display in enumeration order
    pub fn display_list(&self) -> Vec<DisplayInfo> {
        self.assert_initialized();
        self.displays.all()
    }

    /// Deliver an event to the event callback
    ///
    /// Events raised while the callback is already running are queued and
    /// delivered in order once it returns.
    pub(crate) fn dispatch_event(&mut self, event: Event) {
        self.event_queue.push_back(event);
        if self.dispatching {
            return;
        }

        self.dispatching = true;
        while let Some(event) = self.event_queue.pop_front() {
            let Some(mut on_event) = self.on_event.take() else {
                continue;
            };
            on_event(self, &event);
            if self.on_event.is_none() && !self.tearing_down && self.is_initialized() {
                self.on_event = Some(on_event);
            }
        }
        self.dispatching = false;
    }

    fn try_refresh_displays(&mut self) -> Result<(), BackendError> {
        let reports = self.backend.enumerate_displays()?;
        self.displays.refresh(&reports);
        log::debug!(
            "Display refresh: {} display(s), primary {}",
            self.displays.len(),
            self.displays.primary()
        );
        Ok(())
    }

    fn rollback_init(&mut self) {
        self.tearing_down = true;
        self.destroy_all_windows();
        self.tearing_down = false;
        self.displays.clear();
        self.translator = None;
        self.on_before_destroy = None;
        self.on_event = None;
        self.event_queue.clear();
        self.user_data = None;
        self.backend.shutdown();
        self.state = SessionState::Uninitialized;
    }

    fn assert_initialized(&self) {
        assert!(
            self.is_initialized(),
            "zap session used while {:?}; call init first",
            self.state
        );
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.is_initialized() {
            return;
        }
        log::warn!(
            "Session dropped without destroy, releasing {} native window(s)",
            self.windows.len()
        );
        for window in self.windows.iter() {
            self.backend.destroy_native_window(window.native_handle());
        }
        self.backend.shutdown();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .field("windows", &self.windows.len())
            .field("displays", &self.displays.len())
            .finish_non_exhaustive()
    }
}

/// Process entry: `init`, run the loop, `destroy`
///
/// Returns the process exit code: 0 on success, 1 if `init` failed.
pub fn run(backend: impl Backend + 'static, options: SessionOptions) -> i32 {
    let mut session = Session::new(backend);
    if let Err(e) = session.init(options) {
        log::error!("Failed to initialize session: {}", e);
        return 1;
    }
    session.run_loop();
    session.destroy();
    0
}
