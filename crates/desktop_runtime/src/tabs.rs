//! Per-window tab lists: open, close, switch, reorder, and cross-window moves.
//!
//! Whenever the active tab leaves a window (closed or moved out), the last remaining tab becomes
//! active.

use thinker_file_tree::{FileSystemError, FileSystemItem, FileSystemNode};

use crate::{
    model::{DesktopState, Position, TabId, TabItem, WindowConfig, WindowId, WindowState},
    reducer::ReducerError,
};

impl WindowState {
    /// Makes `tab_id` the only active tab (or clears activity for `None`).
    pub(crate) fn set_active_tab(&mut self, tab_id: Option<TabId>) {
        for tab in &mut self.tabs {
            tab.is_active = Some(tab.id) == tab_id;
        }
        self.active_tab_id = tab_id;
    }

    fn take_tab(&mut self, tab_id: TabId) -> Option<TabItem> {
        let index = self.tab_index(tab_id)?;
        let tab = self.tabs.remove(index);
        if self.active_tab_id == Some(tab_id) {
            let next = self.tabs.last().map(|t| t.id);
            self.set_active_tab(next);
        }
        Some(tab)
    }

    /// Inserts `tab` as active at `index` (clamped), or re-activates an existing tab for the
    /// same file. Unsaved edits carried by `tab` replace the existing tab's buffer. Returns the
    /// id of the tab that ended up active.
    fn insert_or_activate(&mut self, mut tab: TabItem, index: Option<usize>) -> TabId {
        if let Some(existing) = self.tabs.iter_mut().find(|t| t.file_id == tab.file_id) {
            if tab.is_dirty {
                existing.content = tab.content;
                existing.is_dirty = true;
            }
            let existing = existing.id;
            self.set_active_tab(Some(existing));
            return existing;
        }
        let tab_id = tab.id;
        tab.is_active = true;
        let index = index.unwrap_or(self.tabs.len()).min(self.tabs.len());
        self.tabs.insert(index, tab);
        self.set_active_tab(Some(tab_id));
        tab_id
    }
}

impl DesktopState {
    pub fn allocate_tab_id(&mut self) -> TabId {
        let id = TabId(self.next_tab_id);
        self.next_tab_id = self.next_tab_id.saturating_add(1);
        id
    }

    /// Builds a tab for a tree file, snapshotting its current content.
    ///
    /// Returns `None` for folders.
    pub fn tab_for_item(&mut self, item: &FileSystemItem) -> Option<TabItem> {
        let FileSystemNode::File { content } = &item.node else {
            return None;
        };
        let id = self.allocate_tab_id();
        Some(TabItem::new(id, item.id.clone(), item.name.clone(), content.clone()))
    }

    /// Opens `tab` in a window. A tab for the same file already in that window is re-activated
    /// instead of duplicated. Returns the id of the active tab.
    pub fn add_tab(&mut self, window_id: WindowId, tab: TabItem) -> Result<TabId, ReducerError> {
        self.insert_tab(window_id, tab, None)
    }

    /// [`Self::add_tab`] at a specific slot (clamped); `None` appends.
    pub fn insert_tab(
        &mut self,
        window_id: WindowId,
        tab: TabItem,
        index: Option<usize>,
    ) -> Result<TabId, ReducerError> {
        Ok(self.window_mut(window_id)?.insert_or_activate(tab, index))
    }

    pub fn remove_tab(
        &mut self,
        window_id: WindowId,
        tab_id: TabId,
    ) -> Result<TabItem, ReducerError> {
        self.window_mut(window_id)?
            .take_tab(tab_id)
            .ok_or(ReducerError::TabNotFound { window_id, tab_id })
    }

    pub fn switch_tab(&mut self, window_id: WindowId, tab_id: TabId) -> Result<(), ReducerError> {
        let window = self.window_mut(window_id)?;
        if window.tab(tab_id).is_none() {
            return Err(ReducerError::TabNotFound { window_id, tab_id });
        }
        window.set_active_tab(Some(tab_id));
        Ok(())
    }

    /// Moves a tab to `to_window` at `index` (default: append), active there.
    ///
    /// A move within one window is a [`Self::reorder_tab`]. If the destination already shows the
    /// same file, that tab is activated and the moved tab is dropped.
    pub fn move_tab(
        &mut self,
        from_window: WindowId,
        to_window: WindowId,
        tab_id: TabId,
        index: Option<usize>,
    ) -> Result<(), ReducerError> {
        if from_window == to_window {
            let last = self
                .window(from_window)
                .ok_or(ReducerError::WindowNotFound(from_window))?
                .tabs
                .len()
                .saturating_sub(1);
            return self.reorder_tab(from_window, tab_id, index.unwrap_or(last));
        }

        let source = self
            .window(from_window)
            .ok_or(ReducerError::WindowNotFound(from_window))?;
        if source.tab(tab_id).is_none() {
            return Err(ReducerError::TabNotFound {
                window_id: from_window,
                tab_id,
            });
        }
        self.window_index(to_window)?;

        let tab = self
            .window_mut(from_window)?
            .take_tab(tab_id)
            .ok_or(ReducerError::TabNotFound {
                window_id: from_window,
                tab_id,
            })?;
        self.window_mut(to_window)?.insert_or_activate(tab, index);
        Ok(())
    }

    /// Moves a tab to `target_index` (clamped) within its window, keeping activity flags.
    pub fn reorder_tab(
        &mut self,
        window_id: WindowId,
        tab_id: TabId,
        target_index: usize,
    ) -> Result<(), ReducerError> {
        let window = self.window_mut(window_id)?;
        let index = window
            .tab_index(tab_id)
            .ok_or(ReducerError::TabNotFound { window_id, tab_id })?;
        let tab = window.tabs.remove(index);
        let target_index = target_index.min(window.tabs.len());
        window.tabs.insert(target_index, tab);
        Ok(())
    }

    /// Replaces a tab's content snapshot and marks it dirty.
    pub fn update_tab_content(
        &mut self,
        window_id: WindowId,
        tab_id: TabId,
        content: impl Into<String>,
    ) -> Result<(), ReducerError> {
        let tab = self.tab_mut(window_id, tab_id)?;
        tab.content = content.into();
        tab.is_dirty = true;
        Ok(())
    }

    pub fn mark_tab_saved(
        &mut self,
        window_id: WindowId,
        tab_id: TabId,
    ) -> Result<(), ReducerError> {
        self.tab_mut(window_id, tab_id)?.is_dirty = false;
        Ok(())
    }

    /// Opens a tree file as a tab. Without an explicit window the file lands in the main window,
    /// then the active one, and otherwise in a new window of its own. The receiving window is
    /// focused.
    pub fn open_file(
        &mut self,
        window_id: Option<WindowId>,
        item: &FileSystemItem,
    ) -> Result<(WindowId, TabId), ReducerError> {
        if item.is_folder() {
            return Err(FileSystemError::NotAFile(item.id.clone()).into());
        }
        let target = match window_id {
            Some(id) => Some(self.window_index(id).map(|_| id)?),
            None => self
                .main_window()
                .or_else(|| self.active_window())
                .map(|window| window.id),
        };
        let tab = self
            .tab_for_item(item)
            .ok_or_else(|| FileSystemError::NotAFile(item.id.clone()))?;

        match target {
            Some(window_id) => {
                let tab_id = self.add_tab(window_id, tab)?;
                self.focus_window(window_id)?;
                Ok((window_id, tab_id))
            }
            None => {
                let tab_id = tab.id;
                let position = self.cascade_position(self.preferences.file_window_origin);
                let config = WindowConfig::new(item.name.clone())
                    .with_position(position)
                    .with_tab(tab);
                Ok((self.create_window(config), tab_id))
            }
        }
    }

    /// Pulls a tab out of its window into a new window of its own, returning the new window.
    pub fn detach_tab(
        &mut self,
        window_id: WindowId,
        tab_id: TabId,
        position: Position,
    ) -> Result<WindowId, ReducerError> {
        let tab = self
            .window_mut(window_id)?
            .take_tab(tab_id)
            .ok_or(ReducerError::TabNotFound { window_id, tab_id })?;
        let config = WindowConfig::new(tab.file_name.clone())
            .with_position(position)
            .with_tab(tab);
        Ok(self.create_window(config))
    }

    /// Origin for the next drop-created window, cascading from `origin` by the window count.
    pub fn cascade_position(&self, origin: Position) -> Position {
        let count = i32::try_from(self.windows.len()).unwrap_or(i32::MAX);
        let step = self.preferences.cascade_step.saturating_mul(count);
        origin.offset(step, step)
    }

    fn tab_mut(
        &mut self,
        window_id: WindowId,
        tab_id: TabId,
    ) -> Result<&mut TabItem, ReducerError> {
        self.window_mut(window_id)?
            .tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or(ReducerError::TabNotFound { window_id, tab_id })
    }
}
