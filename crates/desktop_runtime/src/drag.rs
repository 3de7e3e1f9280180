//! Pointer drag lifecycle and drop resolution.
//!
//! The coordinator only tracks ephemeral gesture state. Dropping resolves the gesture into a
//! [`DesktopInstruction`] against the current stores; applying it is the reducer's job.

mod hitbox;

use serde::{Deserialize, Serialize};
use thinker_file_tree::{FileSystemInstruction, FileSystemItem, FileSystemState, ItemId, ItemKind};

pub use hitbox::{classify_drop, DragAxis, DropOperation, PointerPosition, TargetRect};

use crate::model::{DesktopState, TabId, TabItem, WindowId};

/// Data captured when a drag starts, enough to rebuild the instruction on drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DragPayload {
    /// A row of the file tree.
    FileSystemItem {
        item_id: ItemId,
        kind: ItemKind,
        name: String,
        /// Content snapshot for files, `None` for folders.
        content: Option<String>,
    },
    /// A tab header inside a window.
    DesktopTab { window_id: WindowId, tab: TabItem },
    /// A file dragged from outside the tree (for example a desktop shortcut).
    DesktopFile {
        file_id: ItemId,
        file_name: String,
        content: String,
    },
}

impl DragPayload {
    pub fn from_item(item: &FileSystemItem) -> Self {
        Self::FileSystemItem {
            item_id: item.id.clone(),
            kind: item.kind(),
            name: item.name.clone(),
            content: item.content().map(str::to_string),
        }
    }

    pub fn from_tab(window_id: WindowId, tab: &TabItem) -> Self {
        Self::DesktopTab {
            window_id,
            tab: tab.clone(),
        }
    }

    /// Wire name of the drag source kind.
    pub fn source_kind(&self) -> &'static str {
        match self {
            Self::FileSystemItem { .. } => "file-system-item",
            Self::DesktopTab { .. } => "desktop-tab",
            Self::DesktopFile { .. } => "desktop-file",
        }
    }

    /// File identity carried by the payload, if it describes a single file.
    fn file(&self) -> Option<(&ItemId, &str, &str)> {
        match self {
            Self::FileSystemItem {
                item_id,
                name,
                content: Some(content),
                ..
            } => Some((item_id, name.as_str(), content.as_str())),
            Self::FileSystemItem { .. } => None,
            Self::DesktopTab { tab, .. } => {
                Some((&tab.file_id, tab.file_name.as_str(), tab.content.as_str()))
            }
            Self::DesktopFile {
                file_id,
                file_name,
                content,
            } => Some((file_id, file_name.as_str(), content.as_str())),
        }
    }
}

/// Surfaces that accept drops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DropTarget {
    FileTreeItem { item_id: ItemId },
    TabHeader { window_id: WindowId, tab_id: TabId },
    /// Empty strip of a window's tab bar.
    TabBar { window_id: WindowId },
    /// Bare desktop background.
    Desktop,
}

impl DropTarget {
    /// Axis used for hitbox classification; area targets have none.
    pub fn axis(&self) -> Option<DragAxis> {
        match self {
            Self::FileTreeItem { .. } => Some(DragAxis::Vertical),
            Self::TabHeader { .. } => Some(DragAxis::Horizontal),
            Self::TabBar { .. } | Self::Desktop => None,
        }
    }
}

/// Host-toolkit capability for measuring drop targets.
pub trait TargetGeometry {
    fn bounding_rect(&self, target: &DropTarget) -> Option<TargetRect>;
}

impl<F> TargetGeometry for F
where
    F: Fn(&DropTarget) -> Option<TargetRect>,
{
    fn bounding_rect(&self, target: &DropTarget) -> Option<TargetRect> {
        self(target)
    }
}

/// Indicator state for the target under the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverState {
    pub target: DropTarget,
    /// Hitbox zone for list-item targets, `None` for area targets.
    pub operation: Option<DropOperation>,
    /// Whether dropping here would apply an instruction.
    pub accepts: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragSession {
    pub payload: DragPayload,
    pub pointer_start: PointerPosition,
    pub pointer: PointerPosition,
    pub hover: Option<HoverState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Domain instruction produced by a successful drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DesktopInstruction {
    MoveFileSystemItem {
        source: ItemId,
        instruction: FileSystemInstruction,
    },
    CreateWindowFromFile {
        file_id: ItemId,
        file_name: String,
        content: String,
    },
    OpenFileInWindow {
        window_id: WindowId,
        file_id: ItemId,
        file_name: String,
        content: String,
        index: Option<usize>,
    },
    MoveTabToWindow {
        from_window: WindowId,
        to_window: WindowId,
        tab_id: TabId,
        index: Option<usize>,
    },
    ReorderTab {
        window_id: WindowId,
        tab_id: TabId,
        index: usize,
    },
    DetachTab { window_id: WindowId, tab_id: TabId },
}

/// Why a drop did not produce an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropRejection {
    SelfDrop,
    /// The tree refused the move (target inside the dragged subtree).
    InvalidMove,
    UnsupportedTarget,
    /// Payload or target refers to something that no longer exists.
    StaleReference,
    /// The drop would leave everything where it is.
    NoChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Instruction(DesktopInstruction),
    Rejected(DropRejection),
    /// Released outside any drop target, or no drag was active.
    Cancelled,
}

/// Gesture state machine: `Idle -> Dragging -> (dropped | cancelled) -> Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DragCoordinator {
    pub phase: DragPhase,
}

impl DragCoordinator {
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.phase {
            DragPhase::Dragging(session) => Some(session),
            DragPhase::Idle => None,
        }
    }

    pub fn hover(&self) -> Option<&HoverState> {
        self.session().and_then(|s| s.hover.as_ref())
    }

    /// Starts a gesture, abandoning any unfinished one.
    pub fn begin_drag(&mut self, payload: DragPayload, pointer: PointerPosition) {
        self.phase = DragPhase::Dragging(DragSession {
            payload,
            pointer_start: pointer,
            pointer,
            hover: None,
        });
    }

    /// Tracks the pointer and re-classifies the target under it. Ignored while idle.
    pub fn drag_over(
        &mut self,
        pointer: PointerPosition,
        target: Option<DropTarget>,
        geometry: &dyn TargetGeometry,
        files: &FileSystemState,
        desktop: &DesktopState,
    ) -> Option<&HoverState> {
        let DragPhase::Dragging(session) = &mut self.phase else {
            return None;
        };
        session.pointer = pointer;
        session.hover = target.and_then(|target| {
            let operation = match target.axis() {
                Some(axis) => {
                    let rect = geometry.bounding_rect(&target)?;
                    let combine = combine_available(&session.payload, &target, files);
                    Some(classify_drop(rect, pointer, axis, combine))
                }
                None => None,
            };
            let mut hover = HoverState {
                target,
                operation,
                accepts: false,
            };
            hover.accepts = resolve_drop(&session.payload, &hover, files, desktop).is_ok();
            Some(hover)
        });
        session.hover.as_ref()
    }

    /// Clears the indicator when the pointer leaves `target`.
    pub fn leave_target(&mut self, target: &DropTarget) {
        if let DragPhase::Dragging(session) = &mut self.phase {
            if session.hover.as_ref().is_some_and(|h| &h.target == target) {
                session.hover = None;
            }
        }
    }

    /// Ends the gesture and resolves it against the hovered target.
    pub fn drop(&mut self, files: &FileSystemState, desktop: &DesktopState) -> DropOutcome {
        let DragPhase::Dragging(session) = std::mem::take(&mut self.phase) else {
            return DropOutcome::Cancelled;
        };
        let Some(hover) = session.hover else {
            return DropOutcome::Cancelled;
        };
        match resolve_drop(&session.payload, &hover, files, desktop) {
            Ok(instruction) => DropOutcome::Instruction(instruction),
            Err(rejection) => DropOutcome::Rejected(rejection),
        }
    }

    /// Abandons the gesture. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        matches!(std::mem::take(&mut self.phase), DragPhase::Dragging(_))
    }
}

/// Only tree items dropped on a folder row get a combine zone.
fn combine_available(payload: &DragPayload, target: &DropTarget, files: &FileSystemState) -> bool {
    match (payload, target) {
        (DragPayload::FileSystemItem { .. }, DropTarget::FileTreeItem { item_id }) => {
            files.get(item_id).is_some_and(FileSystemItem::is_folder)
        }
        _ => false,
    }
}

/// Translates a payload dropped on `hover` into an instruction without touching any store.
pub fn resolve_drop(
    payload: &DragPayload,
    hover: &HoverState,
    files: &FileSystemState,
    desktop: &DesktopState,
) -> Result<DesktopInstruction, DropRejection> {
    match (&hover.target, payload) {
        (
            DropTarget::FileTreeItem { item_id: target },
            DragPayload::FileSystemItem { item_id, .. },
        ) => {
            if item_id == target {
                return Err(DropRejection::SelfDrop);
            }
            if !files.contains(item_id) || !files.contains(target) {
                return Err(DropRejection::StaleReference);
            }
            let target_id = target.clone();
            let instruction = match hover.operation {
                Some(DropOperation::Combine) => FileSystemInstruction::MoveIntoFolder { target_id },
                Some(DropOperation::ReorderBefore) => {
                    FileSystemInstruction::ReorderBefore { target_id }
                }
                Some(DropOperation::ReorderAfter) => {
                    FileSystemInstruction::ReorderAfter { target_id }
                }
                None => return Err(DropRejection::UnsupportedTarget),
            };
            if !files.can_move(item_id, target) {
                return Err(DropRejection::InvalidMove);
            }
            Ok(DesktopInstruction::MoveFileSystemItem {
                source: item_id.clone(),
                instruction,
            })
        }
        (DropTarget::FileTreeItem { .. }, _) => Err(DropRejection::UnsupportedTarget),

        (DropTarget::Desktop, DragPayload::DesktopTab { window_id, tab }) => {
            require_tab(desktop, *window_id, tab.id)?;
            Ok(DesktopInstruction::DetachTab {
                window_id: *window_id,
                tab_id: tab.id,
            })
        }
        (DropTarget::Desktop, payload) => {
            let (file_id, file_name, content) =
                payload.file().ok_or(DropRejection::UnsupportedTarget)?;
            Ok(DesktopInstruction::CreateWindowFromFile {
                file_id: file_id.clone(),
                file_name: file_name.to_string(),
                content: content.to_string(),
            })
        }

        (DropTarget::TabHeader { window_id, tab_id }, payload) => {
            let window = desktop
                .window(*window_id)
                .ok_or(DropRejection::StaleReference)?;
            let target_index = window.tab_index(*tab_id).ok_or(DropRejection::StaleReference)?;
            let insert_at = match hover.operation {
                Some(DropOperation::ReorderAfter) => target_index + 1,
                _ => target_index,
            };
            drop_on_window(payload, *window_id, Some(insert_at), Some(*tab_id), desktop)
        }
        (DropTarget::TabBar { window_id }, payload) => {
            desktop
                .window(*window_id)
                .ok_or(DropRejection::StaleReference)?;
            drop_on_window(payload, *window_id, None, None, desktop)
        }
    }
}

/// Resolves a drop into a window's tab strip. `insert_at` counts slots in the current tab list;
/// `None` appends.
fn drop_on_window(
    payload: &DragPayload,
    window_id: WindowId,
    insert_at: Option<usize>,
    target_tab: Option<TabId>,
    desktop: &DesktopState,
) -> Result<DesktopInstruction, DropRejection> {
    match payload {
        DragPayload::DesktopTab {
            window_id: from_window,
            tab,
        } => {
            if target_tab == Some(tab.id) {
                return Err(DropRejection::SelfDrop);
            }
            let source_index = require_tab(desktop, *from_window, tab.id)?;
            if *from_window != window_id {
                return Ok(DesktopInstruction::MoveTabToWindow {
                    from_window: *from_window,
                    to_window: window_id,
                    tab_id: tab.id,
                    index: insert_at,
                });
            }
            let len = desktop
                .window(window_id)
                .map_or(0, |window| window.tabs.len());
            let insert_at = insert_at.unwrap_or(len);
            // The source slot disappears before reinsertion.
            let index = if insert_at > source_index {
                insert_at - 1
            } else {
                insert_at
            };
            if index == source_index {
                return Err(DropRejection::NoChange);
            }
            Ok(DesktopInstruction::ReorderTab {
                window_id,
                tab_id: tab.id,
                index,
            })
        }
        payload => {
            let (file_id, file_name, content) =
                payload.file().ok_or(DropRejection::UnsupportedTarget)?;
            Ok(DesktopInstruction::OpenFileInWindow {
                window_id,
                file_id: file_id.clone(),
                file_name: file_name.to_string(),
                content: content.to_string(),
                index: insert_at,
            })
        }
    }
}

fn require_tab(
    desktop: &DesktopState,
    window_id: WindowId,
    tab_id: TabId,
) -> Result<usize, DropRejection> {
    desktop
        .window(window_id)
        .and_then(|window| window.tab_index(tab_id))
        .ok_or(DropRejection::StaleReference)
}
