//! Block CRUD operations

use shared::{Block, BlockId, BlockUpdate, Metrics, NewBlock};

use super::{ProjectStore, StoreError};

pub(crate) fn new_block_id() -> BlockId {
    uuid::Uuid::new_v4().to_string()
}

impl ProjectStore {
    /// Append a block under a fresh id. The color always follows `usage`.
    pub fn add_block(&mut self, block: NewBlock) -> BlockId {
        let id = new_block_id();
        self.blocks.push(Block::from_new(id.clone(), block));
        self.commit();
        id
    }

    /// Merge a partial update into a block
    pub fn update_block(&mut self, id: &str, update: BlockUpdate) -> Result<Metrics, StoreError> {
        let Some(block) = self.get_block_mut(id) else {
            tracing::warn!(id, "update for unknown block ignored");
            return Err(StoreError::NotFound(id.to_string()));
        };
        block.apply(update);
        Ok(self.commit())
    }

    /// Remove a block by ID
    pub fn remove_block(&mut self, id: &str) -> Result<Metrics, StoreError> {
        let Some(index) = self.blocks.iter().position(|b| b.id == id) else {
            tracing::warn!(id, "remove for unknown block ignored");
            return Err(StoreError::NotFound(id.to_string()));
        };
        self.blocks.remove(index);
        Ok(self.commit())
    }

    /// Copy a block under a new id with " (Copy)" appended to its name.
    ///
    /// Coordinates are copied as-is; offsetting the copy on the map is up to the caller.
    pub fn duplicate_block(&mut self, id: &str) -> Result<BlockId, StoreError> {
        let Some(source) = self.get_block(id) else {
            tracing::warn!(id, "duplicate of unknown block ignored");
            return Err(StoreError::NotFound(id.to_string()));
        };
        let mut copy = source.to_new();
        copy.name = format!("{} (Copy)", source.name);
        Ok(self.add_block(copy))
    }
}
