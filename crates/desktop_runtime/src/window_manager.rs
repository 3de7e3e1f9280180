//! Window lifecycle, stacking, and placement transitions used by the desktop reducer.

use crate::{
    model::{DesktopState, Position, Size, WindowConfig, WindowId, WindowState},
    reducer::ReducerError,
};

impl DesktopState {
    /// Creates a window from `config`, raises it above every other window, and makes it active.
    pub fn create_window(&mut self, config: WindowConfig) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id = self.next_window_id.saturating_add(1);
        let z_index = self.allocate_z_index();

        let (tabs, active_tab_id) = match config.initial_tab {
            Some(mut tab) => {
                tab.is_active = true;
                let tab_id = tab.id;
                (vec![tab], Some(tab_id))
            }
            None => (Vec::new(), None),
        };

        self.windows.push(WindowState {
            id,
            title: config.title,
            position: config
                .position
                .unwrap_or(self.preferences.default_window_position),
            size: config
                .size
                .unwrap_or(self.preferences.default_window_size)
                .clamped_min(self.preferences.min_window_size),
            is_maximized: false,
            is_minimized: false,
            z_index,
            tabs,
            active_tab_id,
            has_file_tree: config.has_file_tree,
        });
        self.active_window_id = Some(id);
        id
    }

    /// Removes a window. Closing the active window hands activity to the remaining window with
    /// the highest z-index, or to nobody when none remain.
    pub fn close_window(&mut self, window_id: WindowId) -> Result<WindowState, ReducerError> {
        let index = self.window_index(window_id)?;
        let removed = self.windows.remove(index);
        if self.active_window_id == Some(window_id) {
            self.active_window_id = self.windows.iter().max_by_key(|w| w.z_index).map(|w| w.id);
        }
        Ok(removed)
    }

    /// Raises a window to the top, restores it if minimized, and makes it active.
    pub fn focus_window(&mut self, window_id: WindowId) -> Result<(), ReducerError> {
        let index = self.window_index(window_id)?;
        let z_index = self.allocate_z_index();
        let window = &mut self.windows[index];
        window.z_index = z_index;
        window.is_minimized = false;
        self.active_window_id = Some(window_id);
        Ok(())
    }

    pub fn move_window(
        &mut self,
        window_id: WindowId,
        position: Position,
    ) -> Result<(), ReducerError> {
        self.window_mut(window_id)?.position = position;
        Ok(())
    }

    pub fn resize_window(&mut self, window_id: WindowId, size: Size) -> Result<(), ReducerError> {
        let min = self.preferences.min_window_size;
        self.window_mut(window_id)?.size = size.clamped_min(min);
        Ok(())
    }

    pub fn toggle_maximize_window(&mut self, window_id: WindowId) -> Result<(), ReducerError> {
        let window = self.window_mut(window_id)?;
        window.is_maximized = !window.is_maximized;
        Ok(())
    }

    /// Minimizes a window. Minimizing the active window re-elects the highest non-minimized
    /// window as active; z-indices are untouched.
    pub fn minimize_window(&mut self, window_id: WindowId) -> Result<(), ReducerError> {
        self.window_mut(window_id)?.is_minimized = true;
        if self.active_window_id == Some(window_id) {
            self.active_window_id = self
                .windows
                .iter()
                .filter(|w| !w.is_minimized)
                .max_by_key(|w| w.z_index)
                .map(|w| w.id);
        }
        Ok(())
    }

    pub fn set_window_title(
        &mut self,
        window_id: WindowId,
        title: impl Into<String>,
    ) -> Result<(), ReducerError> {
        self.window_mut(window_id)?.title = title.into();
        Ok(())
    }

    /// Next value of the monotonically increasing stacking counter.
    pub(crate) fn allocate_z_index(&mut self) -> u32 {
        let z_index = self.next_z_index;
        self.next_z_index = self.next_z_index.saturating_add(1);
        z_index
    }

    pub(crate) fn window_index(&self, window_id: WindowId) -> Result<usize, ReducerError> {
        self.windows
            .iter()
            .position(|w| w.id == window_id)
            .ok_or(ReducerError::WindowNotFound(window_id))
    }

    pub(crate) fn window_mut(
        &mut self,
        window_id: WindowId,
    ) -> Result<&mut WindowState, ReducerError> {
        self.windows
            .iter_mut()
            .find(|w| w.id == window_id)
            .ok_or(ReducerError::WindowNotFound(window_id))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{TabId, TabItem, INITIAL_Z_INDEX};

    #[test]
    fn create_window_applies_defaults_and_activates() {
        let mut state = DesktopState::default();
        let id = state.create_window(WindowConfig::new("Editor"));

        let window = state.window(id).unwrap();
        assert_eq!(window.position, Position { x: 100, y: 100 });
        assert_eq!(window.size, Size { width: 800, height: 600 });
        assert_eq!(window.z_index, INITIAL_Z_INDEX);
        assert!(!window.has_file_tree);
        assert!(window.tabs.is_empty());
        assert_eq!(window.active_tab_id, None);
        assert_eq!(state.active_window_id, Some(id));
        assert_eq!(state.next_z_index, INITIAL_Z_INDEX + 1);
    }

    #[test]
    fn create_window_seeds_initial_tab_as_active() {
        let mut state = DesktopState::default();
        let tab = TabItem::new(TabId(7), "readme-md".into(), "README.md", "# hi");
        let id = state.create_window(WindowConfig::new("README.md").with_tab(tab));

        let window = state.window(id).unwrap();
        assert_eq!(window.tabs.len(), 1);
        assert!(window.tabs[0].is_active);
        assert_eq!(window.active_tab_id, Some(TabId(7)));
    }

    #[test]
    fn close_active_window_elects_highest_z_remaining() {
        let mut state = DesktopState::default();
        let w1 = state.create_window(WindowConfig::new("one"));
        let w2 = state.create_window(WindowConfig::new("two"));
        let w3 = state.create_window(WindowConfig::new("three"));
        state.focus_window(w1).unwrap();
        state.focus_window(w3).unwrap();

        state.close_window(w3).unwrap();
        assert_eq!(state.active_window_id, Some(w1));

        state.close_window(w2).unwrap();
        assert_eq!(state.active_window_id, Some(w1));

        state.close_window(w1).unwrap();
        assert_eq!(state.active_window_id, None);
        assert!(state.windows.is_empty());
    }

    #[test]
    fn closing_inactive_window_keeps_active() {
        let mut state = DesktopState::default();
        let w1 = state.create_window(WindowConfig::new("one"));
        let w2 = state.create_window(WindowConfig::new("two"));
        state.close_window(w1).unwrap();
        assert_eq!(state.active_window_id, Some(w2));
    }

    #[test]
    fn focus_raises_and_unminimizes() {
        let mut state = DesktopState::default();
        let w1 = state.create_window(WindowConfig::new("one"));
        let w2 = state.create_window(WindowConfig::new("two"));
        state.minimize_window(w1).unwrap();

        state.focus_window(w1).unwrap();

        let one = state.window(w1).unwrap();
        assert!(!one.is_minimized);
        assert!(one.z_index > state.window(w2).unwrap().z_index);
        assert_eq!(state.active_window_id, Some(w1));
    }

    #[test]
    fn minimizing_active_window_elects_next_visible() {
        let mut state = DesktopState::default();
        let w1 = state.create_window(WindowConfig::new("one"));
        let w2 = state.create_window(WindowConfig::new("two"));

        state.minimize_window(w2).unwrap();
        assert_eq!(state.active_window_id, Some(w1));
        assert_eq!(state.window(w2).unwrap().z_index, INITIAL_Z_INDEX + 1);

        state.minimize_window(w1).unwrap();
        assert_eq!(state.active_window_id, None);
    }

    #[test]
    fn unknown_window_operations_leave_state_unchanged() {
        let mut state = DesktopState::default();
        state.create_window(WindowConfig::new("one"));
        let before = state.clone();
        let ghost = WindowId(99);

        assert_eq!(
            state.move_window(ghost, Position { x: 1, y: 2 }),
            Err(ReducerError::WindowNotFound(ghost))
        );
        assert!(state.resize_window(ghost, Size::default()).is_err());
        assert!(state.focus_window(ghost).is_err());
        assert!(state.toggle_maximize_window(ghost).is_err());
        assert!(state.minimize_window(ghost).is_err());
        assert!(state.close_window(ghost).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn resize_clamps_to_minimum() {
        let mut state = DesktopState::default();
        let id = state.create_window(WindowConfig::new("one"));
        state
            .resize_window(id, Size { width: 10, height: 900 })
            .unwrap();
        assert_eq!(
            state.window(id).unwrap().size,
            Size {
                width: crate::model::MIN_WINDOW_WIDTH,
                height: 900
            }
        );
    }

    #[test]
    fn toggle_maximize_flips_flag() {
        let mut state = DesktopState::default();
        let id = state.create_window(WindowConfig::new("one"));
        state.toggle_maximize_window(id).unwrap();
        assert!(state.window(id).unwrap().is_maximized);
        state.toggle_maximize_window(id).unwrap();
        assert!(!state.window(id).unwrap().is_maximized);
    }
}
