//! Desktop snapshot encoding and browser localStorage adapters.

use serde_json::Value;
use thinker_file_tree::{FileSystemError, FileSystemState};
use thiserror::Error;

use crate::model::{DesktopSnapshot, DesktopState, DESKTOP_LAYOUT_SCHEMA_VERSION};

/// localStorage key holding the serialized [`DesktopSnapshot`].
pub const SNAPSHOT_KEY: &str = "thinker.desktop.v1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("malformed desktop snapshot: {0}")]
    Malformed(String),
    #[error("unsupported desktop snapshot schema version {0}")]
    UnsupportedSchema(u32),
    #[error("snapshot file tree is corrupted: {0}")]
    Corrupted(#[from] FileSystemError),
}

/// Serializes the current stores into a schema-versioned JSON snapshot.
///
/// # Errors
///
/// Returns [`SnapshotError::Malformed`] if serialization fails.
pub fn encode_snapshot(
    desktop: &DesktopState,
    files: &FileSystemState,
) -> Result<String, SnapshotError> {
    serde_json::to_string(&desktop.snapshot(files))
        .map_err(|err| SnapshotError::Malformed(err.to_string()))
}

/// Parses a snapshot, migrating older schemas and checking the tree's invariants.
///
/// # Errors
///
/// Returns [`SnapshotError`] for unparsable JSON, a schema newer than this build, or a tree whose
/// links are inconsistent.
pub fn decode_snapshot(raw: &str) -> Result<DesktopSnapshot, SnapshotError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| SnapshotError::Malformed(err.to_string()))?;
    let schema_version = value
        .get("schema_version")
        .and_then(Value::as_u64)
        .unwrap_or(0) as u32;
    let value = migrate_desktop_snapshot(schema_version, value)?;
    let snapshot: DesktopSnapshot =
        serde_json::from_value(value).map_err(|err| SnapshotError::Malformed(err.to_string()))?;
    snapshot.files.check_invariants()?;
    Ok(snapshot)
}

/// Schema 0 stored the tree under `file_system` and had no dock or version fields.
fn migrate_desktop_snapshot(schema_version: u32, mut value: Value) -> Result<Value, SnapshotError> {
    match schema_version {
        0 => {
            let Some(object) = value.as_object_mut() else {
                return Err(SnapshotError::Malformed("snapshot is not an object".to_string()));
            };
            if let Some(files) = object.remove("file_system") {
                object.insert("files".to_string(), files);
            }
            object.insert(
                "schema_version".to_string(),
                Value::from(DESKTOP_LAYOUT_SCHEMA_VERSION),
            );
            Ok(value)
        }
        DESKTOP_LAYOUT_SCHEMA_VERSION => Ok(value),
        newer => Err(SnapshotError::UnsupportedSchema(newer)),
    }
}

/// Loads the snapshot saved in localStorage, if any.
///
/// On non-WASM targets this returns `None`.
pub fn load_local_snapshot() -> Option<DesktopSnapshot> {
    #[cfg(target_arch = "wasm32")]
    {
        let raw = local_storage()?.get_item(SNAPSHOT_KEY).ok().flatten()?;
        match decode_snapshot(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                leptos::logging::warn!("desktop snapshot load failed: {err}");
                None
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

/// Writes the current stores to localStorage. A no-op off the browser.
///
/// # Errors
///
/// Returns a description of the encoding or storage failure.
pub fn persist_local_snapshot(
    desktop: &DesktopState,
    files: &FileSystemState,
) -> Result<(), String> {
    let raw = encode_snapshot(desktop, files).map_err(|err| err.to_string())?;

    #[cfg(target_arch = "wasm32")]
    {
        let storage = local_storage().ok_or_else(|| "localStorage unavailable".to_string())?;
        storage
            .set_item(SNAPSHOT_KEY, &raw)
            .map_err(|err| format!("localStorage write failed: {err:?}"))?;
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = raw;
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}
