//! Sample tree shown when the desktop boots without a persisted snapshot.

use crate::model::{FileSystemNode, FileSystemState, ItemId};

const INDEX_TS: &str = "export * from './components';\nexport * from './utils';\n";
const BUTTON_TSX: &str = "export function Button({ children, onClick }) {\n  \
     return <button onClick={onClick}>{children}</button>;\n}\n";
const HELPER_TS: &str =
    "export function formatDate(date: Date): string {\n  return date.toLocaleDateString();\n}\n";
const README_MD: &str = "# File System Demo\n\n\
     Drag files and folders to reorganize the tree.\n\
     Drop a file on the desktop to open it in its own window.\n";

impl FileSystemState {
    /// Small project tree:
    ///
    /// ```text
    /// src/            (open)
    ///   components/
    ///     Button.tsx
    ///   utils/
    ///     helper.ts
    ///   index.ts
    /// README.md       (selected)
    /// ```
    pub fn demo() -> Self {
        let mut state = Self::new();
        let entries: [(&str, Option<&str>, &str, FileSystemNode); 7] = [
            ("src", None, "src", folder(true)),
            ("components", Some("src"), "components", folder(false)),
            ("utils", Some("src"), "utils", folder(false)),
            ("index-ts", Some("src"), "index.ts", file(INDEX_TS)),
            ("button-tsx", Some("components"), "Button.tsx", file(BUTTON_TSX)),
            ("helper-ts", Some("utils"), "helper.ts", file(HELPER_TS)),
            ("readme-md", None, "README.md", file(README_MD)),
        ];
        for (id, parent, name, node) in entries {
            let parent = parent.map(ItemId::from);
            // Ids are unique and every parent precedes its children.
            let inserted =
                state.insert_item(ItemId::from(id), parent.as_ref(), name.to_string(), node);
            debug_assert!(inserted.is_ok(), "demo entry `{id}` rejected: {inserted:?}");
        }
        state.selected_file = Some(ItemId::from("readme-md"));
        debug_assert_eq!(state.check_invariants(), Ok(()));
        state
    }
}

fn folder(is_open: bool) -> FileSystemNode {
    FileSystemNode::Folder {
        children: Vec::new(),
        is_open,
    }
}

fn file(content: &str) -> FileSystemNode {
    FileSystemNode::File {
        content: content.to_string(),
    }
}
