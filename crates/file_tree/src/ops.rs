//! Selection, creation, deletion, and inspection operations on [`FileSystemState`].

use std::collections::BTreeSet;

use crate::{
    error::FileSystemError,
    model::{FileSystemItem, FileSystemNode, FileSystemState, ItemId, ItemKind},
};

impl FileSystemState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ItemId) -> Option<&FileSystemItem> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currently selected item, if it still exists.
    pub fn selected(&self) -> Option<&FileSystemItem> {
        self.selected_file.as_ref().and_then(|id| self.items.get(id))
    }

    /// Ordered items of a container: the folder `parent`, or the root level when `None`.
    pub fn children_of(&self, parent: Option<&ItemId>) -> Vec<&FileSystemItem> {
        let ids: &[ItemId] = match parent {
            Some(parent) => self
                .items
                .get(parent)
                .map(FileSystemItem::children)
                .unwrap_or(&[]),
            None => &self.root_items,
        };
        ids.iter().filter_map(|id| self.items.get(id)).collect()
    }

    /// Marks `id` as selected. Callers decide whether folders are selectable.
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError::ItemNotFound`] for an unknown id.
    pub fn select_file(&mut self, id: &ItemId) -> Result<(), FileSystemError> {
        self.require(id)?;
        self.selected_file = Some(id.clone());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_file = None;
    }

    /// Flips the expand/collapse flag of a folder.
    ///
    /// # Errors
    ///
    /// Unknown ids and files are rejected without changing the tree.
    pub fn toggle_folder(&mut self, id: &ItemId) -> Result<(), FileSystemError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| FileSystemError::ItemNotFound(id.clone()))?;
        match &mut item.node {
            FileSystemNode::Folder { is_open, .. } => {
                *is_open = !*is_open;
                Ok(())
            }
            FileSystemNode::File { .. } => Err(FileSystemError::NotAFolder(id.clone())),
        }
    }

    /// Creates an item with per-kind defaults under `parent` (or at root level).
    ///
    /// A newly created file becomes the selected file.
    ///
    /// # Errors
    ///
    /// Fails when `parent` is unknown or is not a folder.
    pub fn create_item(
        &mut self,
        parent: Option<&ItemId>,
        kind: ItemKind,
        name: impl Into<String>,
    ) -> Result<ItemId, FileSystemError> {
        let id = self.allocate_id();
        self.insert_item(id, parent, name.into(), FileSystemNode::empty(kind))
    }

    /// Creates a file with initial `content`; see [`Self::create_item`].
    pub fn create_file(
        &mut self,
        parent: Option<&ItemId>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<ItemId, FileSystemError> {
        let id = self.allocate_id();
        self.insert_item(
            id,
            parent,
            name.into(),
            FileSystemNode::File {
                content: content.into(),
            },
        )
    }

    /// Creates an empty, collapsed folder; see [`Self::create_item`].
    pub fn create_folder(
        &mut self,
        parent: Option<&ItemId>,
        name: impl Into<String>,
    ) -> Result<ItemId, FileSystemError> {
        self.create_item(parent, ItemKind::Folder, name)
    }

    /// Deletes `id` and its whole subtree, returning every removed id (`id` first).
    ///
    /// Clears the selection when the selected item was removed.
    pub fn delete_item(&mut self, id: &ItemId) -> Result<Vec<ItemId>, FileSystemError> {
        let parent = self.require(id)?.parent.clone();

        let mut removed = vec![id.clone()];
        removed.extend(self.descendants(id));

        self.container_mut(parent.as_ref())?.retain(|child| child != id);
        for removed_id in &removed {
            self.items.remove(removed_id);
        }
        if self
            .selected_file
            .as_ref()
            .is_some_and(|selected| removed.contains(selected))
        {
            self.selected_file = None;
        }
        Ok(removed)
    }

    pub fn rename_item(
        &mut self,
        id: &ItemId,
        name: impl Into<String>,
    ) -> Result<(), FileSystemError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| FileSystemError::ItemNotFound(id.clone()))?;
        item.name = name.into();
        Ok(())
    }

    /// Replaces the text of a file.
    pub fn write_file(
        &mut self,
        id: &ItemId,
        text: impl Into<String>,
    ) -> Result<(), FileSystemError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| FileSystemError::ItemNotFound(id.clone()))?;
        match &mut item.node {
            FileSystemNode::File { content } => {
                *content = text.into();
                Ok(())
            }
            FileSystemNode::Folder { .. } => Err(FileSystemError::NotAFile(id.clone())),
        }
    }

    /// All ids below `id`, in depth-first pre-order. Empty for files and unknown ids.
    pub fn descendants(&self, id: &ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut stack: Vec<ItemId> = self
            .items
            .get(id)
            .map(|item| item.children().iter().rev().cloned().collect())
            .unwrap_or_default();
        let mut seen = BTreeSet::new();
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(item) = self.items.get(&current) {
                stack.extend(item.children().iter().rev().cloned());
            }
            out.push(current);
        }
        out
    }

    /// Ids from the root-level ancestor down to `id` inclusive. Empty for unknown ids.
    pub fn item_path(&self, id: &ItemId) -> Vec<ItemId> {
        let mut path = Vec::new();
        let mut current = Some(id.clone());
        while let Some(current_id) = current {
            let Some(item) = self.items.get(&current_id) else {
                break;
            };
            // A corrupted parent chain would otherwise loop forever.
            if path.len() > self.items.len() {
                break;
            }
            current = item.parent.clone();
            path.push(current_id);
        }
        path.reverse();
        path
    }

    /// Names along [`Self::item_path`], joined with `/`.
    pub fn display_path(&self, id: &ItemId) -> String {
        self.item_path(id)
            .iter()
            .filter_map(|id| self.items.get(id))
            .map(|item| item.name.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Verifies the forest invariants: existing references, matching back-references, every
    /// non-root item listed by exactly one parent, exact root set, and no cycles.
    pub fn check_invariants(&self) -> Result<(), FileSystemError> {
        let corrupted = |msg: String| Err(FileSystemError::Corrupted(msg));

        let mut listed = BTreeSet::new();
        for root in &self.root_items {
            match self.items.get(root) {
                None => return corrupted(format!("root `{root}` does not exist")),
                Some(item) if item.parent.is_some() => {
                    return corrupted(format!("root `{root}` has a parent"))
                }
                Some(_) => {}
            }
            if !listed.insert(root.clone()) {
                return corrupted(format!("`{root}` listed twice"));
            }
        }

        for item in self.items.values() {
            for child in item.children() {
                match self.items.get(child) {
                    None => {
                        return corrupted(format!("`{}` lists missing child `{child}`", item.id))
                    }
                    Some(child_item) if child_item.parent.as_ref() != Some(&item.id) => {
                        return corrupted(format!(
                            "`{child}` is listed by `{}` but points elsewhere",
                            item.id
                        ))
                    }
                    Some(_) => {}
                }
                if !listed.insert(child.clone()) {
                    return corrupted(format!("`{child}` listed twice"));
                }
            }
        }

        for (id, item) in &self.items {
            if !listed.contains(id) {
                return corrupted(format!("`{id}` is not listed by any container"));
            }
            if let Some(parent) = &item.parent {
                if !self.items.get(parent).is_some_and(FileSystemItem::is_folder) {
                    return corrupted(format!("`{id}` has non-folder parent `{parent}`"));
                }
            }
            if self.item_path(id).len() > self.items.len() {
                return corrupted(format!("`{id}` is its own ancestor"));
            }
        }

        if let Some(selected) = &self.selected_file {
            if !self.items.contains_key(selected) {
                return corrupted(format!("selected `{selected}` does not exist"));
            }
        }
        Ok(())
    }

    pub(crate) fn require(&self, id: &ItemId) -> Result<&FileSystemItem, FileSystemError> {
        self.items
            .get(id)
            .ok_or_else(|| FileSystemError::ItemNotFound(id.clone()))
    }

    /// Child list of `parent`, or the root list.
    pub(crate) fn container_mut(
        &mut self,
        parent: Option<&ItemId>,
    ) -> Result<&mut Vec<ItemId>, FileSystemError> {
        match parent {
            None => Ok(&mut self.root_items),
            Some(parent) => self
                .items
                .get_mut(parent)
                .ok_or_else(|| FileSystemError::ItemNotFound(parent.clone()))?
                .children_mut()
                .ok_or_else(|| FileSystemError::NotAFolder(parent.clone())),
        }
    }

    pub(crate) fn insert_item(
        &mut self,
        id: ItemId,
        parent: Option<&ItemId>,
        name: String,
        node: FileSystemNode,
    ) -> Result<ItemId, FileSystemError> {
        if let Some(parent) = parent {
            if !self.require(parent)?.is_folder() {
                return Err(FileSystemError::NotAFolder(parent.clone()));
            }
        }
        let is_file = matches!(node, FileSystemNode::File { .. });
        self.container_mut(parent)?.push(id.clone());
        self.items.insert(
            id.clone(),
            FileSystemItem {
                id: id.clone(),
                name,
                parent: parent.cloned(),
                node,
            },
        );
        if is_file {
            self.selected_file = Some(id.clone());
        }
        Ok(id)
    }

    fn allocate_id(&mut self) -> ItemId {
        loop {
            self.next_item_id = self.next_item_id.saturating_add(1);
            let id = ItemId(format!("item-{}", self.next_item_id));
            if !self.items.contains_key(&id) {
                return id;
            }
        }
    }
}
