//! Boot configuration for a fresh desktop.

use serde::{Deserialize, Serialize};
use thinker_file_tree::FileSystemState;
use thiserror::Error;

use crate::model::{
    DesktopPreferences, DesktopState, DockConfig, Position, Size, WindowConfig, INITIAL_Z_INDEX,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid desktop config JSON: {0}")]
    Malformed(String),
    #[error("invalid desktop config: {0}")]
    Invalid(String),
}

/// The window hosting the file-tree panel at boot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainWindowConfig {
    pub title: String,
    pub position: Position,
    pub size: Size,
}

impl Default for MainWindowConfig {
    fn default() -> Self {
        Self {
            title: "Workspace".to_string(),
            position: Position::default(),
            size: Size::default(),
        }
    }
}

/// Desktop boot settings. Every field is optional in JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    pub preferences: DesktopPreferences,
    pub dock: DockConfig,
    pub dock_visible: bool,
    /// First z-index handed out.
    pub initial_z_index: u32,
    /// Start with the demo tree instead of an empty one.
    pub seed_demo_tree: bool,
    /// Main window opened at boot; `None` boots an empty desktop.
    pub main_window: Option<MainWindowConfig>,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            preferences: DesktopPreferences::default(),
            dock: DockConfig::default(),
            dock_visible: true,
            initial_z_index: INITIAL_Z_INDEX,
            seed_demo_tree: true,
            main_window: Some(MainWindowConfig::default()),
        }
    }
}

impl DesktopConfig {
    /// Parses and validates a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] for unparsable JSON and [`ConfigError::Invalid`] for
    /// values [`Self::validate`] rejects.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Malformed(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects non-positive sizes and a negative cascade step.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefs = &self.preferences;
        for (field, size) in [
            ("preferences.default_window_size", prefs.default_window_size),
            ("preferences.min_window_size", prefs.min_window_size),
        ] {
            if size.width <= 0 || size.height <= 0 {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be positive, got {}x{}",
                    size.width, size.height
                )));
            }
        }
        if prefs.cascade_step < 0 {
            return Err(ConfigError::Invalid(format!(
                "preferences.cascade_step must not be negative, got {}",
                prefs.cascade_step
            )));
        }
        if let Some(main) = &self.main_window {
            if main.title.trim().is_empty() {
                return Err(ConfigError::Invalid("main_window.title is empty".to_string()));
            }
        }
        Ok(())
    }

    /// Builds the initial stores described by this config.
    pub fn initial_state(&self) -> (DesktopState, FileSystemState) {
        let mut desktop = DesktopState {
            preferences: self.preferences,
            next_z_index: self.initial_z_index,
            ..DesktopState::default()
        };
        desktop.dock.is_visible = self.dock_visible;
        desktop.dock.config = self.dock;
        if let Some(main) = &self.main_window {
            desktop.create_window(
                WindowConfig::new(main.title.clone())
                    .with_position(main.position)
                    .with_size(main.size)
                    .with_file_tree(),
            );
        }
        desktop.sync_dock();

        let files = if self.seed_demo_tree {
            FileSystemState::demo()
        } else {
            FileSystemState::new()
        };
        (desktop, files)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::DockPosition;

    #[test]
    fn empty_json_yields_defaults() {
        assert_eq!(DesktopConfig::from_json_str("{}").unwrap(), DesktopConfig::default());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = DesktopConfig::from_json_str(
            r#"{
                "dock": {"position": "left"},
                "preferences": {"cascade_step": 12},
                "seed_demo_tree": false
            }"#,
        )
        .unwrap();
        assert_eq!(config.dock.position, DockPosition::Left);
        assert!(!config.dock.show_labels);
        assert_eq!(config.preferences.cascade_step, 12);
        assert_eq!(config.preferences.file_window_origin, Position { x: 200, y: 100 });
        assert!(!config.seed_demo_tree);
        assert!(config.main_window.is_some());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            DesktopConfig::from_json_str(
                r#"{"preferences": {"min_window_size": {"width": 0, "height": 10}}}"#
            ),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DesktopConfig::from_json_str(r#"{"preferences": {"cascade_step": -1}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DesktopConfig::from_json_str("[1, 2"),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn initial_state_opens_main_window_with_tree() {
        let (desktop, files) = DesktopConfig::default().initial_state();
        let main = desktop.main_window().unwrap();
        assert_eq!(main.title, "Workspace");
        assert_eq!(main.z_index, INITIAL_Z_INDEX);
        assert_eq!(desktop.active_window_id, Some(main.id));
        assert_eq!(desktop.dock.items.len(), 1);
        assert_eq!(files, FileSystemState::demo());
    }

    #[test]
    fn bare_config_boots_empty_desktop() {
        let config = DesktopConfig {
            main_window: None,
            seed_demo_tree: false,
            initial_z_index: 10,
            ..DesktopConfig::default()
        };
        let (mut desktop, files) = config.initial_state();
        assert!(desktop.windows.is_empty());
        assert!(files.is_empty());
        let id = desktop.create_window(WindowConfig::new("first"));
        assert_eq!(desktop.window(id).unwrap().z_index, 10);
    }
}
