//! Configuration system
//!
//! Window layouts and logging setup can be described in TOML or RON files
//! and turned into [`WindowOptions`] at startup.

pub use serde::{Deserialize, Serialize};

use crate::foundation::logging;
use crate::session::Session;
use crate::window::{DisplayMode, PositionMode, WindowId, WindowOptions};
use std::path::Path;

/// Serialized file format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Format for a path, `None` for unknown extensions
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "ron" => Some(Self::Ron),
            _ => None,
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Parse configuration text in the given format
    fn parse(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Toml => {
                toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            ConfigFormat::Ron => {
                ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
        }
    }

    /// Render configuration text in the given format
    fn render(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }

    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = format_for(path)?;
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents, format)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.render(format_for(path)?)?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

fn format_for(path: &Path) -> Result<ConfigFormat, ConfigError> {
    ConfigFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Serializable description of one window
///
/// Callbacks and user data cannot be serialized; attach them to the
/// [`WindowOptions`] returned by [`WindowConfig::to_options`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title bar text
    pub title: Option<String>,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
    /// Left edge for custom placement
    pub x: i32,
    /// Top edge for custom placement
    pub y: i32,
    /// Placement strategy
    pub position: PositionMode,
    /// Initial display mode
    pub display_mode: DisplayMode,
}

impl Default for WindowConfig {
    fn default() -> Self {
        let defaults = WindowOptions::default();
        Self {
            title: None,
            width: defaults.width,
            height: defaults.height,
            x: defaults.x,
            y: defaults.y,
            position: defaults.position,
            display_mode: defaults.display_mode,
        }
    }
}

impl Config for WindowConfig {}

impl WindowConfig {
    /// Window options without callbacks
    pub fn to_options(&self) -> WindowOptions {
        WindowOptions {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            position: self.position,
            display_mode: self.display_mode,
            title: self.title.clone(),
            ..WindowOptions::default()
        }
    }
}

/// Startup configuration for a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// `env_logger` filter; `RUST_LOG` / `info` when absent
    pub log_filter: Option<String>,
    /// Windows opened at startup, in order
    pub windows: Vec<WindowConfig>,
}

impl Config for SessionConfig {}

impl SessionConfig {
    /// Install the logger described by this configuration
    pub fn init_logging(&self) {
        match &self.log_filter {
            Some(filter) => logging::init_with_filter(filter),
            None => logging::init(),
        }
    }

    /// Create every configured window, returning the ids in order
    ///
    /// Windows the backend failed to create show up as [`WindowId::INVALID`].
    pub fn create_windows(&self, session: &mut Session) -> Vec<WindowId> {
        self.windows
            .iter()
            .map(|window| session.window_create(window.to_options()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::headless::HeadlessBackend;
    use crate::foundation::Rect;
    use crate::session::SessionOptions;

    const SESSION_TOML: &str = r#"
log_filter = "zap=debug"

[[windows]]
title = "Main"
width = 800
height = 600
position = "Centered"

[[windows]]
width = 320
height = 240
x = 10
y = 20
position = "Custom"
display_mode = "Maximized"
"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("zap.toml")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("dir/zap.ron")), Some(ConfigFormat::Ron));
        assert_eq!(ConfigFormat::from_path(Path::new("zap.json")), None);
        assert_eq!(ConfigFormat::from_path(Path::new("zap")), None);
    }

    #[test]
    fn test_parse_toml() {
        let config = SessionConfig::parse(SESSION_TOML, ConfigFormat::Toml).unwrap();

        assert_eq!(config.log_filter.as_deref(), Some("zap=debug"));
        assert_eq!(config.windows.len(), 2);
        assert_eq!(config.windows[0].title.as_deref(), Some("Main"));
        assert_eq!(config.windows[0].position, PositionMode::Centered);
        assert_eq!(config.windows[0].display_mode, DisplayMode::Normal);
        assert_eq!(config.windows[1].title, None);
        assert_eq!(config.windows[1].display_mode, DisplayMode::Maximized);
    }

    #[test]
    fn test_parse_ron() {
        let ron = r#"(
            title: Some("Tool palette"),
            width: 200,
            height: 500,
            position: Auto,
            display_mode: BorderlessFullscreen,
        )"#;
        let config = WindowConfig::parse(ron, ConfigFormat::Ron).unwrap();

        assert_eq!(config.title.as_deref(), Some("Tool palette"));
        assert_eq!((config.width, config.height), (200, 500));
        assert_eq!(config.display_mode, DisplayMode::BorderlessFullscreen);
        // Missing fields fall back to defaults
        assert_eq!((config.x, config.y), (0, 0));
    }

    #[test]
    fn test_parse_errors() {
        let result = SessionConfig::parse("windows = 3", ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        let result = SessionConfig::load_from_file("settings.ini");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SessionConfig::parse("", ConfigFormat::Toml).unwrap();
        assert_eq!(config, SessionConfig::default());

        let window = WindowConfig::default().to_options();
        assert_eq!((window.width, window.height), (1280, 720));
        assert_eq!(window.resolved_title(), crate::window::DEFAULT_TITLE);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("zap-config-{}.ron", std::process::id()));
        let config = SessionConfig::parse(SESSION_TOML, ConfigFormat::Toml).unwrap();

        config.save_to_file(&path).unwrap();
        let loaded = SessionConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_create_windows_from_config() {
        let config = SessionConfig::parse(SESSION_TOML, ConfigFormat::Toml).unwrap();
        let mut session = Session::new(HeadlessBackend::new());
        session.init(SessionOptions::new()).unwrap();

        let ids = config.create_windows(&mut session);

        assert_eq!(ids.len(), 2);
        assert_eq!(session.window_rect(ids[0]), Some(Rect::new(560, 240, 800, 600)));
        assert_eq!(session.window(ids[0]).unwrap().title(), "Main");
        assert_eq!(session.window_rect(ids[1]), Some(Rect::new(10, 20, 320, 240)));
        assert_eq!(session.window_display_mode(ids[1]), Some(DisplayMode::Maximized));
    }
}
