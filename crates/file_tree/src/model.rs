use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a file or folder in a [`FileSystemState`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    File,
    Folder,
}

/// Kind-specific payload of a tree item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FileSystemNode {
    /// Leaf carrying opaque text content.
    File { content: String },
    /// Container with ordered child ids and an expand/collapse flag.
    Folder { children: Vec<ItemId>, is_open: bool },
}

impl FileSystemNode {
    /// Creation defaults for `kind`: empty content, or a closed folder with no children.
    pub fn empty(kind: ItemKind) -> Self {
        match kind {
            ItemKind::File => Self::File {
                content: String::new(),
            },
            ItemKind::Folder => Self::Folder {
                children: Vec::new(),
                is_open: false,
            },
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::File { .. } => ItemKind::File,
            Self::Folder { .. } => ItemKind::Folder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemItem {
    pub id: ItemId,
    pub name: String,
    /// Containing folder; `None` for root-level items.
    pub parent: Option<ItemId>,
    pub node: FileSystemNode,
}

impl FileSystemItem {
    pub fn kind(&self) -> ItemKind {
        self.node.kind()
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.node, FileSystemNode::Folder { .. })
    }

    /// File content, or `None` for folders.
    pub fn content(&self) -> Option<&str> {
        match &self.node {
            FileSystemNode::File { content } => Some(content),
            FileSystemNode::Folder { .. } => None,
        }
    }

    /// Ordered child ids. Files have none.
    pub fn children(&self) -> &[ItemId] {
        match &self.node {
            FileSystemNode::Folder { children, .. } => children,
            FileSystemNode::File { .. } => &[],
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.node, FileSystemNode::Folder { is_open: true, .. })
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<ItemId>> {
        match &mut self.node {
            FileSystemNode::Folder { children, .. } => Some(children),
            FileSystemNode::File { .. } => None,
        }
    }
}

/// Domain instruction produced by a file-tree drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FileSystemInstruction {
    /// Append the source to the target folder's children.
    MoveIntoFolder { target_id: ItemId },
    /// Place the source immediately before the target in the target's container.
    ReorderBefore { target_id: ItemId },
    /// Place the source immediately after the target in the target's container.
    ReorderAfter { target_id: ItemId },
}

impl FileSystemInstruction {
    pub fn target_id(&self) -> &ItemId {
        match self {
            Self::MoveIntoFolder { target_id }
            | Self::ReorderBefore { target_id }
            | Self::ReorderAfter { target_id } => target_id,
        }
    }
}

/// The whole file tree: an item map plus the ordered root-level ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileSystemState {
    pub items: BTreeMap<ItemId, FileSystemItem>,
    pub root_items: Vec<ItemId>,
    pub selected_file: Option<ItemId>,
    #[serde(default)]
    pub next_item_id: u64,
}
