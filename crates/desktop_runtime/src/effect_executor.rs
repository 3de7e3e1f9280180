//! Explicit runtime effect-queue executor for reducer-emitted side effects.

use leptos::*;

use crate::{
    model::WindowId, persistence, reducer::RuntimeEffect, runtime_context::DesktopRuntimeContext,
};

/// Installs the effect executor that drains reducer-emitted runtime effects in order.
pub fn install(runtime: DesktopRuntimeContext) {
    // Clear the current queue before processing so nested dispatches enqueue a fresh batch instead
    // of being overwritten by the in-flight drain.
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());
        run_effects(runtime, queued);
    });
}

/// Executes one drained batch. Persistence runs at most once per batch.
pub fn run_effects(runtime: DesktopRuntimeContext, effects: Vec<RuntimeEffect>) {
    let mut persist = false;
    for effect in effects {
        match effect {
            RuntimeEffect::PersistLayout | RuntimeEffect::PersistFileTree => persist = true,
            RuntimeEffect::FocusWindowInput(window_id) => focus_window_input(window_id),
            RuntimeEffect::DragEnded { .. } => {}
        }
    }

    if persist {
        let desktop = runtime.desktop.get_untracked();
        let files = runtime.files.get_untracked();
        if let Err(err) = persistence::persist_local_snapshot(&desktop, &files) {
            logging::warn!("persist desktop snapshot failed: {err}");
        }
    }
}

/// Focuses the element marked `data-window-input="<window id>"`, if the view rendered one.
fn focus_window_input(window_id: WindowId) {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;

        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        let selector = format!("[data-window-input=\"{window_id}\"]");
        if let Ok(Some(element)) = document.query_selector(&selector) {
            if let Ok(input) = element.dyn_into::<web_sys::HtmlElement>() {
                if let Err(err) = input.focus() {
                    logging::warn!("focus window input failed: {err:?}");
                }
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = window_id;
    }
}
