//! Dock launcher derivation and click behavior.

use thinker_file_tree::FileIcon;

use crate::{
    model::{DesktopState, DockConfig, DockItem, DockState, WindowId, WindowState},
    reducer::ReducerError,
};

/// What a dock click did to its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockActivation {
    Focused,
    Minimized,
}

/// Launcher icon for a window: the tree window gets a folder, editors follow their active tab.
pub fn dock_icon_for_window(window: &WindowState) -> &'static str {
    if window.has_file_tree {
        return FileIcon::FolderClosed.icon_id();
    }
    window
        .active_tab()
        .or_else(|| window.tabs.first())
        .map(|tab| FileIcon::for_file_name(&tab.file_name).icon_id())
        .unwrap_or("file")
}

impl DockState {
    /// Rebuilds launcher items so they mirror `windows` in creation order.
    pub fn sync(&mut self, windows: &[WindowState], active_window_id: Option<WindowId>) {
        self.items = windows
            .iter()
            .enumerate()
            .map(|(order, window)| DockItem {
                window_id: window.id,
                title: window.title.clone(),
                icon: dock_icon_for_window(window).to_string(),
                is_active: active_window_id == Some(window.id),
                is_minimized: window.is_minimized,
                has_multiple_tabs: window.tabs.len() > 1,
                tab_count: window.tabs.len(),
                order,
            })
            .collect();
    }
}

impl DesktopState {
    /// Dock click: restores a minimized window, minimizes the active one, focuses any other.
    pub fn activate_dock_item(
        &mut self,
        window_id: WindowId,
    ) -> Result<DockActivation, ReducerError> {
        let window = self
            .window(window_id)
            .ok_or(ReducerError::WindowNotFound(window_id))?;
        let is_active = self.active_window_id == Some(window_id);
        if !window.is_minimized && is_active {
            self.minimize_window(window_id)?;
            Ok(DockActivation::Minimized)
        } else {
            self.focus_window(window_id)?;
            Ok(DockActivation::Focused)
        }
    }

    pub fn toggle_dock_visibility(&mut self) {
        self.dock.is_visible = !self.dock.is_visible;
    }

    pub fn set_dock_config(&mut self, config: DockConfig) {
        self.dock.config = config;
    }

    pub(crate) fn sync_dock(&mut self) {
        self.dock.sync(&self.windows, self.active_window_id);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use thinker_file_tree::ItemId;

    use super::*;
    use crate::model::{TabItem, WindowConfig};

    #[test]
    fn dock_items_mirror_windows() {
        let mut state = DesktopState::default();
        let main = state.create_window(WindowConfig::new("Workspace").with_file_tree());
        let editor = state.create_window(WindowConfig::new("Button.tsx"));
        let a = state.allocate_tab_id();
        let b = state.allocate_tab_id();
        state
            .add_tab(editor, TabItem::new(a, ItemId::from("button-tsx"), "Button.tsx", ""))
            .unwrap();
        state
            .add_tab(editor, TabItem::new(b, ItemId::from("readme-md"), "README.md", ""))
            .unwrap();
        state.sync_dock();

        let items = &state.dock.items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].window_id, main);
        assert_eq!(items[0].icon, "folder");
        assert!(!items[0].is_active);
        assert_eq!(items[1].icon, "file-text");
        assert!(items[1].is_active);
        assert!(items[1].has_multiple_tabs);
        assert_eq!(items[1].tab_count, 2);
        assert_eq!(items[1].order, 1);
    }

    #[test]
    fn dock_click_cycles_focus_minimize_restore() {
        let mut state = DesktopState::default();
        let w1 = state.create_window(WindowConfig::new("one"));
        let w2 = state.create_window(WindowConfig::new("two"));

        assert_eq!(state.activate_dock_item(w2).unwrap(), DockActivation::Minimized);
        assert!(state.window(w2).unwrap().is_minimized);
        assert_eq!(state.active_window_id, Some(w1));

        assert_eq!(state.activate_dock_item(w2).unwrap(), DockActivation::Focused);
        assert!(!state.window(w2).unwrap().is_minimized);
        assert_eq!(state.active_window_id, Some(w2));

        assert_eq!(state.activate_dock_item(w1).unwrap(), DockActivation::Focused);
        assert_eq!(state.active_window_id, Some(w1));
    }

    #[test]
    fn empty_editor_window_uses_plain_icon() {
        let mut state = DesktopState::default();
        let id = state.create_window(WindowConfig::new("blank"));
        assert_eq!(dock_icon_for_window(state.window(id).unwrap()), "file");
    }
}
