//! Icon classification for tree rows and dock launchers.

use serde::{Deserialize, Serialize};

use crate::model::{FileSystemItem, FileSystemNode};

/// Extension after the last `.`, ignoring dot-files such as `.gitignore`.
pub fn file_extension(name: &str) -> Option<&str> {
    match name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < name.len() => Some(&name[dot + 1..]),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileIcon {
    FolderOpen,
    FolderClosed,
    TypeScript,
    JavaScript,
    Markdown,
    Json,
    Stylesheet,
    Plain,
}

impl FileIcon {
    pub fn for_item(item: &FileSystemItem) -> Self {
        match &item.node {
            FileSystemNode::Folder { is_open: true, .. } => Self::FolderOpen,
            FileSystemNode::Folder { .. } => Self::FolderClosed,
            FileSystemNode::File { .. } => Self::for_file_name(&item.name),
        }
    }

    pub fn for_file_name(name: &str) -> Self {
        match file_extension(name).map(str::to_ascii_lowercase).as_deref() {
            Some("ts" | "tsx") => Self::TypeScript,
            Some("js" | "jsx") => Self::JavaScript,
            Some("md") => Self::Markdown,
            Some("json") => Self::Json,
            Some("css" | "scss") => Self::Stylesheet,
            _ => Self::Plain,
        }
    }

    /// Launcher icon id understood by the dock renderer.
    pub fn icon_id(self) -> &'static str {
        match self {
            Self::FolderOpen | Self::FolderClosed => "folder",
            Self::TypeScript | Self::JavaScript => "code",
            Self::Markdown => "file-text",
            Self::Json => "settings",
            Self::Stylesheet => "paintbrush",
            Self::Plain => "file",
        }
    }
}
