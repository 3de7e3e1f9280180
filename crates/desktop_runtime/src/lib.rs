//! Headless state core for the drag-and-drop desktop IDE: windows, tabs, dock, drag gestures,
//! and the leptos runtime that commits reducer output.

pub mod config;
mod dock;
pub mod drag;
pub mod effect_executor;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod runtime_context;
mod tabs;
mod window_manager;

pub use config::{ConfigError, DesktopConfig, MainWindowConfig};
pub use dock::{dock_icon_for_window, DockActivation};
pub use drag::{
    DesktopInstruction, DragCoordinator, DragPayload, DropOutcome, DropRejection, DropTarget,
    TargetGeometry,
};
pub use model::*;
pub use persistence::{
    decode_snapshot, encode_snapshot, load_local_snapshot, persist_local_snapshot, SnapshotError,
};
pub use reducer::{apply_instruction, reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};
pub use thinker_file_tree as file_tree;
