//! In-memory file/folder forest used by the desktop file-tree panel.
//!
//! Every mutating operation validates its inputs before touching the tree; an `Err` from any of
//! them means the tree is unchanged.

mod error;
pub mod icons;
pub mod model;
mod moves;
mod ops;
mod seed;

pub use error::FileSystemError;
pub use icons::{file_extension, FileIcon};
pub use model::*;
