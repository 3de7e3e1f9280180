//! Runtime provider and context wiring for the desktop.
//!
//! This module owns the long-lived reducer container: the committed stores, the runtime effect
//! queue, and the dispatch callback. Readers only ever observe committed snapshots because every
//! action is reduced on scratch copies.
#![allow(clippy::clone_on_copy)]

use leptos::*;
use thinker_file_tree::FileSystemState;

use crate::{
    config::DesktopConfig,
    drag::{DragCoordinator, DropTarget, PointerPosition, TargetGeometry},
    effect_executor,
    model::DesktopState,
    persistence,
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Reactive window, tab, and dock state.
    pub desktop: RwSignal<DesktopState>,
    /// Reactive virtual file tree.
    pub files: RwSignal<FileSystemState>,
    /// Reactive drag gesture state.
    pub drag: RwSignal<DragCoordinator>,
    /// Queue of runtime effects emitted by the reducer and drained by the effect executor.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Creates the stores described by `config` and the dispatch callback committing into them.
    ///
    /// Must be called inside a reactive owner.
    pub fn new(config: &DesktopConfig) -> Self {
        let (initial_desktop, initial_files) = config.initial_state();
        let desktop = create_rw_signal(initial_desktop);
        let files = create_rw_signal(initial_files);
        let drag = create_rw_signal(DragCoordinator::default());
        let effects = create_rw_signal(Vec::<RuntimeEffect>::new());

        let dispatch = Callback::new(move |action: DesktopAction| {
            let mut next_desktop = desktop.get_untracked();
            let mut next_files = files.get_untracked();
            let mut next_drag = drag.get_untracked();

            match reduce_desktop(&mut next_desktop, &mut next_files, &mut next_drag, action) {
                Ok(new_effects) => {
                    if next_desktop != desktop.get_untracked() {
                        desktop.set(next_desktop);
                    }
                    if next_files != files.get_untracked() {
                        files.set(next_files);
                    }
                    if next_drag != drag.get_untracked() {
                        drag.set(next_drag);
                    }
                    if !new_effects.is_empty() {
                        effects.update(|queue| queue.extend(new_effects));
                    }
                }
                Err(err) => logging::warn!("desktop reducer error: {err}"),
            }
        });

        Self {
            desktop,
            files,
            drag,
            effects,
            dispatch,
        }
    }

    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Measures `target` through the host toolkit and reports the pointer move.
    pub fn drag_over(
        &self,
        pointer: PointerPosition,
        target: Option<DropTarget>,
        geometry: &dyn TargetGeometry,
    ) {
        let bounds = target
            .as_ref()
            .and_then(|target| geometry.bounding_rect(target));
        self.dispatch_action(DesktopAction::DragOver {
            pointer,
            target,
            bounds,
        });
    }
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and restores the saved snapshot.
pub fn DesktopProvider(
    /// Boot configuration; defaults apply when omitted.
    #[prop(optional)]
    config: Option<DesktopConfig>,
    children: Children,
) -> impl IntoView {
    let runtime = DesktopRuntimeContext::new(&config.unwrap_or_default());

    if let Some(snapshot) = persistence::load_local_snapshot() {
        runtime.dispatch_action(DesktopAction::HydrateSnapshot { snapshot });
    }

    provide_context(runtime.clone());

    effect_executor::install(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use thinker_file_tree::ItemId;

    use super::*;
    use crate::{drag::TargetRect, drag::DragPayload, model::WindowId};

    #[test]
    fn dispatch_commits_successful_actions() {
        let owner = create_runtime();
        let runtime = DesktopRuntimeContext::new(&DesktopConfig::default());

        runtime.dispatch_action(DesktopAction::OpenFile {
            item_id: ItemId::from("index-ts"),
            window_id: None,
        });

        let desktop = runtime.desktop.get_untracked();
        let main = desktop.main_window().unwrap();
        assert_eq!(main.tabs.len(), 1);
        assert_eq!(
            runtime.files.get_untracked().selected_file,
            Some(ItemId::from("index-ts"))
        );
        assert!(runtime
            .effects
            .get_untracked()
            .contains(&RuntimeEffect::FocusWindowInput(main.id)));
        owner.dispose();
    }

    #[test]
    fn failed_actions_leave_committed_state_untouched() {
        let owner = create_runtime();
        let runtime = DesktopRuntimeContext::new(&DesktopConfig::default());
        let desktop = runtime.desktop.get_untracked();
        let files = runtime.files.get_untracked();

        runtime.dispatch_action(DesktopAction::CloseWindow {
            window_id: WindowId(42),
        });
        runtime.dispatch_action(DesktopAction::DeleteItem {
            item_id: ItemId::from("missing"),
        });

        assert_eq!(runtime.desktop.get_untracked(), desktop);
        assert_eq!(runtime.files.get_untracked(), files);
        assert!(runtime.effects.get_untracked().is_empty());
        owner.dispose();
    }

    #[test]
    fn drag_over_measures_through_geometry() {
        let owner = create_runtime();
        let runtime = DesktopRuntimeContext::new(&DesktopConfig::default());
        let files = runtime.files.get_untracked();
        let payload = DragPayload::from_item(files.get(&ItemId::from("readme-md")).unwrap());
        runtime.dispatch_action(DesktopAction::BeginDrag {
            payload,
            pointer: PointerPosition { x: 0, y: 0 },
        });

        let geometry = |_: &DropTarget| {
            Some(TargetRect {
                x: 0,
                y: 0,
                width: 100,
                height: 20,
            })
        };
        runtime.drag_over(
            PointerPosition { x: 5, y: 18 },
            Some(DropTarget::FileTreeItem {
                item_id: ItemId::from("index-ts"),
            }),
            &geometry,
        );
        runtime.dispatch_action(DesktopAction::Drop);

        let files = runtime.files.get_untracked();
        assert_eq!(
            files.get(&ItemId::from("readme-md")).unwrap().parent,
            Some(ItemId::from("src"))
        );
        let src = files.children_of(Some(&ItemId::from("src")));
        assert_eq!(src.last().unwrap().id, ItemId::from("readme-md"));
        assert!(!runtime.drag.get_untracked().is_dragging());
        owner.dispose();
    }
}
