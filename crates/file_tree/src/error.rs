use thiserror::Error;

use crate::model::ItemId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors for file-tree operations. An `Err` always leaves the tree unchanged.
pub enum FileSystemError {
    /// The referenced item is not in the tree (deleted or never created).
    #[error("item `{0}` not found")]
    ItemNotFound(ItemId),
    /// The operation needs a folder but the item is a file.
    #[error("item `{0}` is not a folder")]
    NotAFolder(ItemId),
    /// The operation needs a file but the item is a folder.
    #[error("item `{0}` is not a file")]
    NotAFile(ItemId),
    /// Self-move, or a move of an item into its own subtree.
    #[error("cannot move `{item}` relative to `{target}`")]
    InvalidMove {
        /// Item being moved.
        item: ItemId,
        /// Drop target.
        target: ItemId,
    },
    /// The tree no longer forms a forest with consistent back-references.
    #[error("file tree invariant violated: {0}")]
    Corrupted(String),
}
