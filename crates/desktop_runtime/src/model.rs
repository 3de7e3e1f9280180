use std::fmt;

use serde::{Deserialize, Serialize};
use thinker_file_tree::{FileSystemState, ItemId};

pub const DESKTOP_LAYOUT_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_WINDOW_X: i32 = 100;
pub const DEFAULT_WINDOW_Y: i32 = 100;
pub const DEFAULT_WINDOW_WIDTH: i32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;
pub const MIN_WINDOW_WIDTH: i32 = 240;
pub const MIN_WINDOW_HEIGHT: i32 = 160;
/// First z-index handed out by a fresh desktop.
pub const INITIAL_Z_INDEX: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self {
            x: DEFAULT_WINDOW_X,
            y: DEFAULT_WINDOW_Y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn clamped_min(self, min: Size) -> Self {
        Self {
            width: self.width.max(min.width),
            height: self.height.max(min.height),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// An open file inside a window. `content` is a snapshot taken when the tab was opened and is
/// independent of the live tree item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabItem {
    pub id: TabId,
    pub file_id: ItemId,
    pub file_name: String,
    pub content: String,
    pub is_active: bool,
    #[serde(default)]
    pub is_dirty: bool,
}

impl TabItem {
    pub fn new(
        id: TabId,
        file_id: ItemId,
        file_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            file_id,
            file_name: file_name.into(),
            content: content.into(),
            is_active: false,
            is_dirty: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    pub id: WindowId,
    pub title: String,
    pub position: Position,
    pub size: Size,
    pub is_maximized: bool,
    pub is_minimized: bool,
    pub z_index: u32,
    pub tabs: Vec<TabItem>,
    pub active_tab_id: Option<TabId>,
    /// Marks the main window that hosts the file-tree panel.
    pub has_file_tree: bool,
}

impl WindowState {
    pub fn tab(&self, tab_id: TabId) -> Option<&TabItem> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    pub fn tab_index(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    pub fn active_tab(&self) -> Option<&TabItem> {
        self.active_tab_id.and_then(|id| self.tab(id))
    }

    pub fn tab_for_file(&self, file_id: &ItemId) -> Option<&TabItem> {
        self.tabs.iter().find(|t| &t.file_id == file_id)
    }
}

/// Request for [`DesktopState::create_window`]; unset fields fall back to the preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub has_file_tree: bool,
    pub initial_tab: Option<TabItem>,
}

impl WindowConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            position: None,
            size: None,
            has_file_tree: false,
            initial_tab: None,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_file_tree(mut self) -> Self {
        self.has_file_tree = true;
        self
    }

    pub fn with_tab(mut self, tab: TabItem) -> Self {
        self.initial_tab = Some(tab);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DockPosition {
    #[default]
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DockSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl DockSize {
    /// Launcher icon edge length in px.
    pub fn icon_px(self) -> u32 {
        match self {
            Self::Small => 32,
            Self::Medium => 40,
            Self::Large => 48,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DockConfig {
    pub position: DockPosition,
    pub auto_hide: bool,
    pub size: DockSize,
    pub show_labels: bool,
}

/// One launcher in the dock, derived from a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockItem {
    pub window_id: WindowId,
    pub title: String,
    pub icon: String,
    pub is_active: bool,
    pub is_minimized: bool,
    pub has_multiple_tabs: bool,
    pub tab_count: usize,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockState {
    pub is_visible: bool,
    pub config: DockConfig,
    pub items: Vec<DockItem>,
}

impl Default for DockState {
    fn default() -> Self {
        Self {
            is_visible: true,
            config: DockConfig::default(),
            items: Vec::new(),
        }
    }
}

/// Window placement defaults applied when a request leaves fields unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopPreferences {
    pub default_window_position: Position,
    pub default_window_size: Size,
    pub min_window_size: Size,
    /// Origin of windows created by dropping a file on the desktop.
    pub file_window_origin: Position,
    /// Origin of windows created by dropping a tab on the desktop.
    pub detached_tab_origin: Position,
    /// Per-window cascade step for drop-created windows.
    pub cascade_step: i32,
}

impl Default for DesktopPreferences {
    fn default() -> Self {
        Self {
            default_window_position: Position::default(),
            default_window_size: Size::default(),
            min_window_size: Size {
                width: MIN_WINDOW_WIDTH,
                height: MIN_WINDOW_HEIGHT,
            },
            file_window_origin: Position { x: 200, y: 100 },
            detached_tab_origin: Position { x: 300, y: 150 },
            cascade_step: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopState {
    /// Windows in creation order; stacking order is given by `z_index`.
    pub windows: Vec<WindowState>,
    pub active_window_id: Option<WindowId>,
    pub next_window_id: u64,
    pub next_tab_id: u64,
    pub next_z_index: u32,
    pub dock: DockState,
    pub preferences: DesktopPreferences,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            active_window_id: None,
            next_window_id: 1,
            next_tab_id: 1,
            next_z_index: INITIAL_Z_INDEX,
            dock: DockState::default(),
            preferences: DesktopPreferences::default(),
        }
    }
}

impl DesktopState {
    pub fn window(&self, window_id: WindowId) -> Option<&WindowState> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn active_window(&self) -> Option<&WindowState> {
        self.active_window_id.and_then(|id| self.window(id))
    }

    /// The window owning the file-tree panel, if one is open.
    pub fn main_window(&self) -> Option<&WindowState> {
        self.windows.iter().find(|w| w.has_file_tree)
    }

    /// Windows sorted bottom-to-top, the order a renderer should paint them in.
    pub fn windows_by_z(&self) -> Vec<&WindowState> {
        let mut windows: Vec<&WindowState> = self.windows.iter().collect();
        windows.sort_by_key(|w| w.z_index);
        windows
    }

    pub fn snapshot(&self, files: &FileSystemState) -> DesktopSnapshot {
        DesktopSnapshot {
            schema_version: DESKTOP_LAYOUT_SCHEMA_VERSION,
            windows: self.windows.clone(),
            active_window_id: self.active_window_id,
            dock_visible: self.dock.is_visible,
            dock_config: self.dock.config,
            preferences: self.preferences,
            files: files.clone(),
        }
    }

    /// Rebuilds runtime state from a snapshot, re-deriving every counter from the restored
    /// windows so new ids and z-indices never collide with restored ones.
    pub fn from_snapshot(snapshot: DesktopSnapshot) -> (Self, FileSystemState) {
        let mut state = Self {
            windows: snapshot.windows,
            preferences: snapshot.preferences,
            ..Self::default()
        };
        state.dock.is_visible = snapshot.dock_visible;
        state.dock.config = snapshot.dock_config;
        state.next_window_id = state
            .windows
            .iter()
            .map(|w| w.id.0)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        state.next_tab_id = state
            .windows
            .iter()
            .flat_map(|w| w.tabs.iter().map(|t| t.id.0))
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        state.next_z_index = state
            .windows
            .iter()
            .map(|w| w.z_index.saturating_add(1))
            .max()
            .unwrap_or(INITIAL_Z_INDEX)
            .max(INITIAL_Z_INDEX);
        state.active_window_id = snapshot
            .active_window_id
            .filter(|id| state.window(*id).is_some());
        state.dock.sync(&state.windows, state.active_window_id);
        (state, snapshot.files)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopSnapshot {
    pub schema_version: u32,
    pub windows: Vec<WindowState>,
    pub active_window_id: Option<WindowId>,
    #[serde(default = "default_dock_visible")]
    pub dock_visible: bool,
    #[serde(default)]
    pub dock_config: DockConfig,
    #[serde(default)]
    pub preferences: DesktopPreferences,
    pub files: FileSystemState,
}

fn default_dock_visible() -> bool {
    true
}
