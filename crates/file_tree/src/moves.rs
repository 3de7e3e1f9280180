//! Reparenting and sibling reordering driven by [`FileSystemInstruction`]s.

use crate::{
    error::FileSystemError,
    model::{FileSystemInstruction, FileSystemState, ItemId},
};

impl FileSystemState {
    /// Returns `true` when `source` may be dropped relative to `target`.
    ///
    /// Rejects self-moves, targets inside the subtree rooted at `source`, and ids that are no
    /// longer in the tree.
    pub fn can_move(&self, source: &ItemId, target: &ItemId) -> bool {
        if source == target || !self.contains(source) || !self.contains(target) {
            return false;
        }
        !self.item_path(target).contains(source)
    }

    /// Moves `source` according to `instruction`.
    ///
    /// The move is computed on a scratch copy of the tree and committed only once every step
    /// succeeded, so a rejected or stale instruction leaves the tree exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`FileSystemError::ItemNotFound`] when the source or target no longer exists.
    /// - [`FileSystemError::InvalidMove`] when [`Self::can_move`] rejects the pair.
    /// - [`FileSystemError::NotAFolder`] for a move into a file.
    pub fn move_item(
        &mut self,
        instruction: &FileSystemInstruction,
        source: &ItemId,
    ) -> Result<(), FileSystemError> {
        let target = instruction.target_id();
        self.require(source)?;
        let target_is_folder = self.require(target)?.is_folder();
        if !self.can_move(source, target) {
            return Err(FileSystemError::InvalidMove {
                item: source.clone(),
                target: target.clone(),
            });
        }
        if matches!(instruction, FileSystemInstruction::MoveIntoFolder { .. }) && !target_is_folder
        {
            return Err(FileSystemError::NotAFolder(target.clone()));
        }

        let mut scratch = self.clone();
        scratch.detach(source)?;

        let new_parent = match instruction {
            FileSystemInstruction::MoveIntoFolder { target_id } => {
                scratch
                    .container_mut(Some(target_id))?
                    .push(source.clone());
                Some(target_id.clone())
            }
            FileSystemInstruction::ReorderBefore { target_id }
            | FileSystemInstruction::ReorderAfter { target_id } => {
                let parent = scratch.require(target_id)?.parent.clone();
                let container = scratch.container_mut(parent.as_ref())?;
                let index = container
                    .iter()
                    .position(|id| id == target_id)
                    .ok_or_else(|| FileSystemError::ItemNotFound(target_id.clone()))?;
                let index = match instruction {
                    FileSystemInstruction::ReorderAfter { .. } => index + 1,
                    _ => index,
                };
                container.insert(index, source.clone());
                parent
            }
        };

        if let Some(item) = scratch.items.get_mut(source) {
            item.parent = new_parent;
        }
        scratch.recompute_root_items();
        debug_assert_eq!(scratch.check_invariants(), Ok(()));
        *self = scratch;
        Ok(())
    }

    /// Rebuilds `root_items` as exactly the parentless ids, keeping their current order and
    /// appending any parentless id that was missing.
    pub fn recompute_root_items(&mut self) {
        let mut roots: Vec<ItemId> = Vec::with_capacity(self.root_items.len());
        for id in &self.root_items {
            let is_root = self.items.get(id).is_some_and(|item| item.parent.is_none());
            if is_root && !roots.contains(id) {
                roots.push(id.clone());
            }
        }
        for (id, item) in &self.items {
            if item.parent.is_none() && !roots.contains(id) {
                roots.push(id.clone());
            }
        }
        self.root_items = roots;
    }

    fn detach(&mut self, id: &ItemId) -> Result<(), FileSystemError> {
        let parent = self.require(id)?.parent.clone();
        self.container_mut(parent.as_ref())?
            .retain(|child| child != id);
        Ok(())
    }
}
