//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use leptos::logging;
use thinker_file_tree::{FileSystemError, FileSystemInstruction, FileSystemState, ItemId, ItemKind};
use thiserror::Error;

use crate::{
    drag::{
        DesktopInstruction, DragCoordinator, DragPayload, DropOutcome, DropTarget, PointerPosition,
        TargetRect,
    },
    model::{
        DesktopSnapshot, DesktopState, DockConfig, Position, Size, TabId, TabItem, WindowConfig,
        WindowId,
    },
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate the desktop and file-tree stores.
pub enum DesktopAction {
    /// Select a tree item.
    SelectFile {
        /// Item to select.
        item_id: ItemId,
    },
    /// Expand or collapse a folder.
    ToggleFolder {
        /// Folder to toggle.
        item_id: ItemId,
    },
    /// Create an empty file or folder.
    CreateItem {
        /// Containing folder, or `None` for the root level.
        parent: Option<ItemId>,
        /// Kind of item to create.
        kind: ItemKind,
        /// Display name.
        name: String,
    },
    /// Delete an item and its whole subtree.
    DeleteItem {
        /// Item to delete.
        item_id: ItemId,
    },
    /// Rename an item in place.
    RenameItem {
        /// Item to rename.
        item_id: ItemId,
        /// New display name.
        name: String,
    },
    /// Move a tree item relative to another one.
    MoveItem {
        /// Item being moved.
        item_id: ItemId,
        /// Placement relative to the instruction's target.
        instruction: FileSystemInstruction,
    },
    /// Open a tree file as a tab, in `window_id` or wherever [`DesktopState::open_file`] picks.
    OpenFile {
        /// File to open.
        item_id: ItemId,
        /// Receiving window, if the caller has one in mind.
        window_id: Option<WindowId>,
    },
    /// Open a new window.
    OpenWindow(WindowConfig),
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Move a window to a new origin.
    MoveWindow {
        /// Window to move.
        window_id: WindowId,
        /// New top-left corner.
        position: Position,
    },
    /// Resize a window; sizes below the configured minimum are clamped.
    ResizeWindow {
        /// Window to resize.
        window_id: WindowId,
        /// Requested size.
        size: Size,
    },
    /// Flip a window's maximized flag.
    ToggleMaximizeWindow {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Add a tab to a window. The tab receives a freshly allocated id.
    AddTab {
        /// Receiving window.
        window_id: WindowId,
        /// Tab to add.
        tab: TabItem,
    },
    /// Close a tab.
    RemoveTab {
        /// Window holding the tab.
        window_id: WindowId,
        /// Tab to close.
        tab_id: TabId,
    },
    /// Make a tab the active one in its window.
    SwitchTab {
        /// Window holding the tab.
        window_id: WindowId,
        /// Tab to activate.
        tab_id: TabId,
    },
    /// Move a tab between windows (or within one).
    MoveTab {
        /// Window the tab currently lives in.
        from_window: WindowId,
        /// Receiving window.
        to_window: WindowId,
        /// Tab to move.
        tab_id: TabId,
        /// Insertion slot; `None` appends.
        index: Option<usize>,
    },
    /// Reorder a tab inside its window.
    ReorderTab {
        /// Window holding the tab.
        window_id: WindowId,
        /// Tab to move.
        tab_id: TabId,
        /// Destination index (clamped).
        index: usize,
    },
    /// Replace a tab's buffer, marking it dirty.
    UpdateTabContent {
        /// Window holding the tab.
        window_id: WindowId,
        /// Edited tab.
        tab_id: TabId,
        /// New buffer content.
        content: String,
    },
    /// Write a tab's buffer back to its tree file and clear the dirty flag.
    SaveTab {
        /// Window holding the tab.
        window_id: WindowId,
        /// Tab to save.
        tab_id: TabId,
    },
    /// Dock click on a window's launcher.
    ActivateDockItem {
        /// Window behind the launcher.
        window_id: WindowId,
    },
    /// Show or hide the dock.
    ToggleDockVisibility,
    /// Replace the dock configuration.
    SetDockConfig(DockConfig),
    /// Start a drag gesture.
    BeginDrag {
        /// What is being dragged.
        payload: DragPayload,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Pointer moved during a drag.
    DragOver {
        /// Current pointer position.
        pointer: PointerPosition,
        /// Drop target under the pointer, if any.
        target: Option<DropTarget>,
        /// Measured bounds of `target`.
        bounds: Option<TargetRect>,
    },
    /// Pointer left a drop target.
    LeaveDropTarget {
        /// Target that was left.
        target: DropTarget,
    },
    /// Pointer released; resolves and applies the hovered drop.
    Drop,
    /// Abandon the current drag.
    CancelDrag,
    /// Restore windows, dock, and file tree from a persisted snapshot.
    HydrateSnapshot {
        /// Snapshot payload to restore.
        snapshot: DesktopSnapshot,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the runtime to execute.
pub enum RuntimeEffect {
    /// Persist the current window and dock layout.
    PersistLayout,
    /// Persist file-tree changes.
    PersistFileTree,
    /// Move focus into the newly focused window's primary input.
    FocusWindowInput(WindowId),
    /// A drag gesture finished; `applied` tells whether a drop instruction took effect.
    DragEnded {
        /// Whether an instruction was applied.
        applied: bool,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions. State is left untouched whenever one is returned.
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window `{0}` not found")]
    WindowNotFound(WindowId),
    /// The tab id is not open in the given window.
    #[error("tab `{tab_id}` not found in window `{window_id}`")]
    TabNotFound {
        /// Window that was searched.
        window_id: WindowId,
        /// Missing tab.
        tab_id: TabId,
    },
    /// The file tree rejected the operation.
    #[error(transparent)]
    FileSystem(#[from] FileSystemError),
    /// A snapshot references windows or tabs inconsistently.
    #[error("snapshot rejected: {0}")]
    InvalidSnapshot(String),
}

/// Applies a [`DesktopAction`] to the desktop runtime stores and collects resulting side effects.
///
/// This function is the authoritative state transition engine for the file tree, windows, tabs,
/// dock, and drag gestures. Every successful reduction leaves the dock in sync with the windows.
///
/// # Errors
///
/// Returns [`ReducerError`] when an action references a missing window, tab, or tree item, or when
/// the file tree rejects the operation. No store is modified in that case. Rejected drops are not
/// errors: they end the gesture and emit [`RuntimeEffect::DragEnded`] with `applied: false`.
pub fn reduce_desktop(
    desktop: &mut DesktopState,
    files: &mut FileSystemState,
    drag: &mut DragCoordinator,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::SelectFile { item_id } => {
            files.select_file(&item_id)?;
            effects.push(RuntimeEffect::PersistFileTree);
        }
        DesktopAction::ToggleFolder { item_id } => {
            files.toggle_folder(&item_id)?;
            effects.push(RuntimeEffect::PersistFileTree);
        }
        DesktopAction::CreateItem { parent, kind, name } => {
            files.create_item(parent.as_ref(), kind, name)?;
            effects.push(RuntimeEffect::PersistFileTree);
        }
        DesktopAction::DeleteItem { item_id } => {
            files.delete_item(&item_id)?;
            effects.push(RuntimeEffect::PersistFileTree);
        }
        DesktopAction::RenameItem { item_id, name } => {
            files.rename_item(&item_id, name)?;
            effects.push(RuntimeEffect::PersistFileTree);
        }
        DesktopAction::MoveItem {
            item_id,
            instruction,
        } => {
            files.move_item(&instruction, &item_id)?;
            effects.push(RuntimeEffect::PersistFileTree);
        }
        DesktopAction::OpenFile { item_id, window_id } => {
            let item = files
                .get(&item_id)
                .ok_or_else(|| FileSystemError::ItemNotFound(item_id.clone()))?;
            let (window_id, _) = desktop.open_file(window_id, item)?;
            files.select_file(&item_id)?;
            effects.push(RuntimeEffect::PersistLayout);
            effects.push(RuntimeEffect::PersistFileTree);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::OpenWindow(config) => {
            let window_id = desktop.create_window(config);
            effects.push(RuntimeEffect::PersistLayout);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::CloseWindow { window_id } => {
            desktop.close_window(window_id)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::FocusWindow { window_id } => {
            desktop.focus_window(window_id)?;
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::MoveWindow {
            window_id,
            position,
        } => {
            // Pointer streams can outlive their window; stale ids are ignored.
            if desktop.window(window_id).is_some() {
                desktop.move_window(window_id, position)?;
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::ResizeWindow { window_id, size } => {
            if desktop.window(window_id).is_some() {
                desktop.resize_window(window_id, size)?;
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::ToggleMaximizeWindow { window_id } => {
            desktop.toggle_maximize_window(window_id)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::MinimizeWindow { window_id } => {
            desktop.minimize_window(window_id)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::AddTab { window_id, mut tab } => {
            desktop.window_index(window_id)?;
            tab.id = desktop.allocate_tab_id();
            desktop.add_tab(window_id, tab)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::RemoveTab { window_id, tab_id } => {
            desktop.remove_tab(window_id, tab_id)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::SwitchTab { window_id, tab_id } => {
            desktop.switch_tab(window_id, tab_id)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::MoveTab {
            from_window,
            to_window,
            tab_id,
            index,
        } => {
            desktop.move_tab(from_window, to_window, tab_id, index)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ReorderTab {
            window_id,
            tab_id,
            index,
        } => {
            desktop.reorder_tab(window_id, tab_id, index)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::UpdateTabContent {
            window_id,
            tab_id,
            content,
        } => {
            desktop.update_tab_content(window_id, tab_id, content)?;
        }
        DesktopAction::SaveTab { window_id, tab_id } => {
            let tab = desktop
                .window(window_id)
                .ok_or(ReducerError::WindowNotFound(window_id))?
                .tab(tab_id)
                .ok_or(ReducerError::TabNotFound { window_id, tab_id })?;
            files.write_file(&tab.file_id, tab.content.clone())?;
            desktop.mark_tab_saved(window_id, tab_id)?;
            effects.push(RuntimeEffect::PersistFileTree);
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ActivateDockItem { window_id } => {
            desktop.activate_dock_item(window_id)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ToggleDockVisibility => {
            desktop.toggle_dock_visibility();
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::SetDockConfig(config) => {
            desktop.set_dock_config(config);
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::BeginDrag { payload, pointer } => {
            drag.begin_drag(payload, pointer);
        }
        DesktopAction::DragOver {
            pointer,
            target,
            bounds,
        } => {
            let measured = move |_: &DropTarget| bounds;
            drag.drag_over(pointer, target, &measured, files, desktop);
        }
        DesktopAction::LeaveDropTarget { target } => {
            drag.leave_target(&target);
        }
        DesktopAction::Drop => {
            let applied = match drag.drop(files, desktop) {
                DropOutcome::Instruction(instruction) => {
                    match apply_instruction(desktop, files, instruction) {
                        Ok(mut applied_effects) => {
                            effects.append(&mut applied_effects);
                            true
                        }
                        Err(err) => {
                            logging::warn!("drop instruction failed: {err}");
                            false
                        }
                    }
                }
                DropOutcome::Rejected(rejection) => {
                    logging::debug_warn!("drop rejected: {rejection:?}");
                    false
                }
                DropOutcome::Cancelled => false,
            };
            effects.push(RuntimeEffect::DragEnded { applied });
        }
        DesktopAction::CancelDrag => {
            if drag.cancel() {
                effects.push(RuntimeEffect::DragEnded { applied: false });
            }
        }
        DesktopAction::HydrateSnapshot { snapshot } => {
            validate_snapshot(&snapshot)?;
            let (restored_desktop, restored_files) = DesktopState::from_snapshot(snapshot);
            *desktop = restored_desktop;
            *files = restored_files;
            *drag = DragCoordinator::default();
        }
    }

    desktop.sync_dock();
    Ok(effects)
}

/// Applies a resolved drop instruction.
///
/// # Errors
///
/// Fails without side effects when the instruction references state that has since changed.
pub fn apply_instruction(
    desktop: &mut DesktopState,
    files: &mut FileSystemState,
    instruction: DesktopInstruction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match instruction {
        DesktopInstruction::MoveFileSystemItem {
            source,
            instruction,
        } => {
            files.move_item(&instruction, &source)?;
            effects.push(RuntimeEffect::PersistFileTree);
        }
        DesktopInstruction::CreateWindowFromFile {
            file_id,
            file_name,
            content,
        } => {
            let tab = TabItem::new(desktop.allocate_tab_id(), file_id, file_name.clone(), content);
            let position = desktop.cascade_position(desktop.preferences.file_window_origin);
            let window_id = desktop.create_window(
                WindowConfig::new(file_name)
                    .with_position(position)
                    .with_tab(tab),
            );
            effects.push(RuntimeEffect::PersistLayout);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopInstruction::OpenFileInWindow {
            window_id,
            file_id,
            file_name,
            content,
            index,
        } => {
            desktop.window_index(window_id)?;
            let tab = TabItem::new(desktop.allocate_tab_id(), file_id, file_name, content);
            desktop.insert_tab(window_id, tab, index)?;
            desktop.focus_window(window_id)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopInstruction::MoveTabToWindow {
            from_window,
            to_window,
            tab_id,
            index,
        } => {
            desktop.move_tab(from_window, to_window, tab_id, index)?;
            desktop.focus_window(to_window)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopInstruction::ReorderTab {
            window_id,
            tab_id,
            index,
        } => {
            desktop.reorder_tab(window_id, tab_id, index)?;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopInstruction::DetachTab { window_id, tab_id } => {
            let position = desktop.cascade_position(desktop.preferences.detached_tab_origin);
            let new_window = desktop.detach_tab(window_id, tab_id, position)?;
            effects.push(RuntimeEffect::PersistLayout);
            effects.push(RuntimeEffect::FocusWindowInput(new_window));
        }
    }
    Ok(effects)
}

fn validate_snapshot(snapshot: &DesktopSnapshot) -> Result<(), ReducerError> {
    snapshot.files.check_invariants()?;
    let mut window_ids = Vec::with_capacity(snapshot.windows.len());
    let mut tab_ids = Vec::new();
    for window in &snapshot.windows {
        if window_ids.contains(&window.id) {
            return Err(ReducerError::InvalidSnapshot(format!(
                "duplicate window id `{}`",
                window.id
            )));
        }
        window_ids.push(window.id);
        if let Some(active) = window.active_tab_id {
            if window.tab(active).is_none() {
                return Err(ReducerError::InvalidSnapshot(format!(
                    "window `{}` activates missing tab `{active}`",
                    window.id
                )));
            }
        }
        for tab in &window.tabs {
            if tab_ids.contains(&tab.id) {
                return Err(ReducerError::InvalidSnapshot(format!(
                    "duplicate tab id `{}`",
                    tab.id
                )));
            }
            tab_ids.push(tab.id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{drag::DropOperation, model::DESKTOP_LAYOUT_SCHEMA_VERSION};

    struct Stores {
        desktop: DesktopState,
        files: FileSystemState,
        drag: DragCoordinator,
    }

    impl Stores {
        fn demo() -> Self {
            Self {
                desktop: DesktopState::default(),
                files: FileSystemState::demo(),
                drag: DragCoordinator::default(),
            }
        }

        fn dispatch(&mut self, action: DesktopAction) -> Result<Vec<RuntimeEffect>, ReducerError> {
            reduce_desktop(&mut self.desktop, &mut self.files, &mut self.drag, action)
        }

        fn open(&mut self, title: &str) -> WindowId {
            self.dispatch(DesktopAction::OpenWindow(WindowConfig::new(title)))
                .expect("open window");
            self.desktop.windows.last().expect("window").id
        }
    }

    #[test]
    fn open_window_focuses_new_window_and_syncs_dock() {
        let mut stores = Stores::demo();
        let first = stores.open("one");
        let second = stores.open("two");

        assert_eq!(stores.desktop.active_window_id, Some(second));
        assert_eq!(stores.desktop.dock.items.len(), 2);
        assert_eq!(stores.desktop.dock.items[0].window_id, first);
        assert!(stores.desktop.dock.items[1].is_active);
    }

    #[test]
    fn open_window_requests_input_focus() {
        let mut stores = Stores::demo();
        let effects = stores
            .dispatch(DesktopAction::OpenWindow(WindowConfig::new("one")))
            .unwrap();
        let id = stores.desktop.windows[0].id;
        assert_eq!(
            effects,
            vec![RuntimeEffect::PersistLayout, RuntimeEffect::FocusWindowInput(id)]
        );
    }

    #[test]
    fn missing_window_errors_leave_stores_untouched() {
        let mut stores = Stores::demo();
        stores.open("one");
        let (desktop, files) = (stores.desktop.clone(), stores.files.clone());
        let ghost = WindowId(404);

        for action in [
            DesktopAction::CloseWindow { window_id: ghost },
            DesktopAction::FocusWindow { window_id: ghost },
            DesktopAction::MinimizeWindow { window_id: ghost },
            DesktopAction::ActivateDockItem { window_id: ghost },
            DesktopAction::AddTab {
                window_id: ghost,
                tab: TabItem::new(TabId(1), ItemId::from("readme-md"), "README.md", ""),
            },
            DesktopAction::OpenFile {
                item_id: ItemId::from("readme-md"),
                window_id: Some(ghost),
            },
        ] {
            assert_eq!(
                stores.dispatch(action),
                Err(ReducerError::WindowNotFound(ghost))
            );
        }
        assert_eq!(stores.desktop, desktop);
        assert_eq!(stores.files, files);
    }

    #[test]
    fn stale_move_and_resize_are_silent_no_ops() {
        let mut stores = Stores::demo();
        stores.open("one");
        let desktop = stores.desktop.clone();
        let ghost = WindowId(404);

        let moved = stores.dispatch(DesktopAction::MoveWindow {
            window_id: ghost,
            position: Position { x: 10, y: 20 },
        });
        let resized = stores.dispatch(DesktopAction::ResizeWindow {
            window_id: ghost,
            size: Size {
                width: 640,
                height: 480,
            },
        });

        assert_eq!(moved, Ok(vec![]));
        assert_eq!(resized, Ok(vec![]));
        assert_eq!(stores.desktop, desktop);
    }

    #[test]
    fn tree_errors_surface_as_file_system_errors() {
        let mut stores = Stores::demo();
        let err = stores
            .dispatch(DesktopAction::MoveItem {
                item_id: ItemId::from("src"),
                instruction: FileSystemInstruction::MoveIntoFolder {
                    target_id: ItemId::from("utils"),
                },
            })
            .unwrap_err();
        assert!(matches!(err, ReducerError::FileSystem(_)));
        assert_eq!(stores.files, FileSystemState::demo());
    }

    #[test]
    fn open_file_selects_and_focuses() {
        let mut stores = Stores::demo();
        let effects = stores
            .dispatch(DesktopAction::OpenFile {
                item_id: ItemId::from("index-ts"),
                window_id: None,
            })
            .unwrap();
        let window = stores.desktop.active_window().unwrap();
        assert_eq!(window.active_tab().unwrap().file_id, ItemId::from("index-ts"));
        assert_eq!(stores.files.selected_file, Some(ItemId::from("index-ts")));
        assert!(effects.contains(&RuntimeEffect::FocusWindowInput(window.id)));
    }

    #[test]
    fn save_tab_writes_buffer_back_to_tree() {
        let mut stores = Stores::demo();
        stores
            .dispatch(DesktopAction::OpenFile {
                item_id: ItemId::from("readme-md"),
                window_id: None,
            })
            .unwrap();
        let window_id = stores.desktop.windows[0].id;
        let tab_id = stores.desktop.windows[0].tabs[0].id;

        stores
            .dispatch(DesktopAction::UpdateTabContent {
                window_id,
                tab_id,
                content: "# edited".to_string(),
            })
            .unwrap();
        assert!(stores.desktop.windows[0].tabs[0].is_dirty);

        stores
            .dispatch(DesktopAction::SaveTab { window_id, tab_id })
            .unwrap();
        assert!(!stores.desktop.windows[0].tabs[0].is_dirty);
        assert_eq!(
            stores.files.get(&ItemId::from("readme-md")).unwrap().content(),
            Some("# edited")
        );
    }

    #[test]
    fn add_tab_allocates_fresh_id() {
        let mut stores = Stores::demo();
        let window_id = stores.open("one");
        stores
            .dispatch(DesktopAction::AddTab {
                window_id,
                tab: TabItem::new(TabId(0), ItemId::from("readme-md"), "README.md", ""),
            })
            .unwrap();
        let tab = &stores.desktop.windows[0].tabs[0];
        assert_ne!(tab.id, TabId(0));
        assert!(tab.is_active);
    }

    #[test]
    fn tree_drop_applies_move_and_ends_drag() {
        let mut stores = Stores::demo();
        let payload = DragPayload::from_item(stores.files.get(&ItemId::from("readme-md")).unwrap());
        stores
            .dispatch(DesktopAction::BeginDrag {
                payload,
                pointer: PointerPosition { x: 0, y: 0 },
            })
            .unwrap();
        stores
            .dispatch(DesktopAction::DragOver {
                pointer: PointerPosition { x: 10, y: 20 },
                target: Some(DropTarget::FileTreeItem {
                    item_id: ItemId::from("src"),
                }),
                bounds: Some(TargetRect {
                    x: 0,
                    y: 0,
                    width: 200,
                    height: 40,
                }),
            })
            .unwrap();
        assert_eq!(
            stores.drag.hover().and_then(|h| h.operation),
            Some(DropOperation::Combine)
        );

        let effects = stores.dispatch(DesktopAction::Drop).unwrap();

        assert!(effects.contains(&RuntimeEffect::DragEnded { applied: true }));
        assert_eq!(
            stores.files.get(&ItemId::from("readme-md")).unwrap().parent,
            Some(ItemId::from("src"))
        );
        assert!(!stores.drag.is_dragging());
    }

    #[test]
    fn rejected_drop_resets_gesture_without_error() {
        let mut stores = Stores::demo();
        let payload = DragPayload::from_item(stores.files.get(&ItemId::from("src")).unwrap());
        stores
            .dispatch(DesktopAction::BeginDrag {
                payload,
                pointer: PointerPosition { x: 0, y: 0 },
            })
            .unwrap();
        stores
            .dispatch(DesktopAction::DragOver {
                pointer: PointerPosition { x: 10, y: 20 },
                target: Some(DropTarget::FileTreeItem {
                    item_id: ItemId::from("utils"),
                }),
                bounds: Some(TargetRect {
                    x: 0,
                    y: 0,
                    width: 200,
                    height: 40,
                }),
            })
            .unwrap();

        let effects = stores.dispatch(DesktopAction::Drop).unwrap();

        assert_eq!(effects, vec![RuntimeEffect::DragEnded { applied: false }]);
        assert_eq!(stores.files, FileSystemState::demo());
        assert!(!stores.drag.is_dragging());
    }

    #[test]
    fn desktop_drop_of_file_cascades_new_windows() {
        let mut stores = Stores::demo();
        stores.open("existing");
        let payload = DragPayload::DesktopFile {
            file_id: ItemId::from("helper-ts"),
            file_name: "helper.ts".to_string(),
            content: "export {}".to_string(),
        };
        stores
            .dispatch(DesktopAction::BeginDrag {
                payload,
                pointer: PointerPosition { x: 0, y: 0 },
            })
            .unwrap();
        stores
            .dispatch(DesktopAction::DragOver {
                pointer: PointerPosition { x: 500, y: 500 },
                target: Some(DropTarget::Desktop),
                bounds: None,
            })
            .unwrap();
        stores.dispatch(DesktopAction::Drop).unwrap();

        let created = stores.desktop.active_window().unwrap();
        assert_eq!(created.title, "helper.ts");
        assert_eq!(created.position, Position { x: 230, y: 130 });
        assert_eq!(created.tabs[0].content, "export {}");
    }

    #[test]
    fn cancel_drag_only_resets_gesture() {
        let mut stores = Stores::demo();
        stores.open("one");
        let (desktop, files) = (stores.desktop.clone(), stores.files.clone());
        let payload = DragPayload::from_item(stores.files.get(&ItemId::from("readme-md")).unwrap());
        stores
            .dispatch(DesktopAction::BeginDrag {
                payload,
                pointer: PointerPosition { x: 0, y: 0 },
            })
            .unwrap();

        let effects = stores.dispatch(DesktopAction::CancelDrag).unwrap();

        assert_eq!(effects, vec![RuntimeEffect::DragEnded { applied: false }]);
        assert_eq!(stores.desktop, desktop);
        assert_eq!(stores.files, files);
        assert_eq!(stores.drag, DragCoordinator::default());
        assert_eq!(stores.dispatch(DesktopAction::CancelDrag).unwrap(), vec![]);
    }

    #[test]
    fn hydrate_rejects_inconsistent_snapshot() {
        let mut stores = Stores::demo();
        let w = stores.open("one");
        let mut snapshot = stores.desktop.snapshot(&stores.files);
        snapshot.windows[0].active_tab_id = Some(TabId(9));
        let before = stores.desktop.clone();

        assert!(matches!(
            stores.dispatch(DesktopAction::HydrateSnapshot { snapshot }),
            Err(ReducerError::InvalidSnapshot(_))
        ));
        assert_eq!(stores.desktop, before);
        assert_eq!(stores.desktop.active_window_id, Some(w));
    }

    #[test]
    fn hydrate_restores_counters_past_restored_ids() {
        let mut source = Stores::demo();
        source.open("one");
        let keep = source.open("two");
        source
            .dispatch(DesktopAction::OpenFile {
                item_id: ItemId::from("readme-md"),
                window_id: Some(keep),
            })
            .unwrap();
        let snapshot = source.desktop.snapshot(&source.files);
        assert_eq!(snapshot.schema_version, DESKTOP_LAYOUT_SCHEMA_VERSION);

        let mut stores = Stores {
            desktop: DesktopState::default(),
            files: FileSystemState::new(),
            drag: DragCoordinator::default(),
        };
        stores
            .dispatch(DesktopAction::HydrateSnapshot { snapshot })
            .unwrap();

        assert_eq!(stores.desktop.windows, source.desktop.windows);
        assert_eq!(stores.files, source.files);
        let fresh = stores.open("three");
        assert!(fresh.0 > keep.0);
        let top = stores.desktop.windows_by_z();
        assert_eq!(top.last().unwrap().id, fresh);
        assert_eq!(stores.desktop.dock.items.len(), 3);
    }
}
