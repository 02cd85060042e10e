//! Ordered block list.
//!
//! # Overview
//!
//! [`BlockModel`] owns the document's ordered block sequence and is the only
//! place block fields are written. It maintains two invariants:
//!
//! - the list always contains at least one block (the removal sites enforce it)
//! - every block id is unique (the insertion sites enforce it)
//!
//! All operations are synchronous and total over valid indices; an operation
//! given an out-of-range index is a no-op. Callers compute indices from the
//! current list, so out-of-range arguments only arise from stale references,
//! which the engine treats as expected (see the focus manager).
//!
//! Every user-visible change bumps a monotonic version counter, which the host
//! can poll to detect edits without subscribing to callbacks.
//!
//! # Example
//!
//! ```rust
//! use block_engine::{Block, BlockKind, BlockModel};
//!
//! let mut model = BlockModel::new(vec![Block::new(BlockKind::Paragraph, "Hello")]);
//! model.insert_at(1, Block::empty(BlockKind::Quote));
//! assert_eq!(model.len(), 2);
//! assert_eq!(model.get_at(0).unwrap().content.plain, "Hello");
//! ```

use crate::block::{Block, BlockColor, BlockId, BlockKind};

/// Partial update applied to a single block.
///
/// Fields left as `None` are untouched. Patching never rewrites the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPatch {
    /// New kind, if changing.
    pub kind: Option<BlockKind>,
    /// New plain text, if changing. Rich spans are clamped to the new text
    /// length; spans that collapse to nothing are dropped.
    pub plain: Option<String>,
    /// New color, if changing.
    pub color: Option<BlockColor>,
}

impl BlockPatch {
    /// Patch that replaces only the plain text.
    pub fn plain(text: impl Into<String>) -> Self {
        BlockPatch {
            plain: Some(text.into()),
            ..BlockPatch::default()
        }
    }

    /// Patch that replaces only the kind.
    pub fn kind(kind: BlockKind) -> Self {
        BlockPatch {
            kind: Some(kind),
            ..BlockPatch::default()
        }
    }

    /// Patch that replaces only the color.
    pub fn color(color: BlockColor) -> Self {
        BlockPatch {
            color: Some(color),
            ..BlockPatch::default()
        }
    }
}

/// The ordered, mutable block sequence forming one document.
#[derive(Debug, Clone)]
pub struct BlockModel {
    blocks: Vec<Block>,
    version: u64,
}

impl BlockModel {
    /// Create a model from an initial block list.
    ///
    /// An empty list is seeded with one empty heading block so the invariant
    /// "at least one block" holds from the start. Duplicate-id checking is the
    /// load path's job (see `EditorSession::load`); this constructor trusts
    /// internally generated input.
    pub fn new(blocks: Vec<Block>) -> Self {
        let blocks = if blocks.is_empty() {
            vec![Block::empty(BlockKind::Heading1)]
        } else {
            blocks
        };
        BlockModel { blocks, version: 0 }
    }

    /// Number of blocks in the document.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Current state version. Bumped on every user-visible change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Snapshot of all blocks in document order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Block at `index`, or `None` when out of range.
    pub fn get_at(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Block with the given id, or `None` when it does not exist.
    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.index_of(id).map(|i| &self.blocks[i])
    }

    /// Index of the block with the given id.
    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    /// Insert a block at `index` (existing blocks shift right).
    ///
    /// `index == len` appends. Out-of-range indices and duplicate ids are
    /// no-ops.
    pub fn insert_at(&mut self, index: usize, block: Block) {
        if index > self.blocks.len() || self.index_of(&block.id).is_some() {
            return;
        }
        self.blocks.insert(index, block);
        self.version += 1;
    }

    /// Remove the block at `index`.
    ///
    /// A no-op when `index` is out of range or when the block is the last one
    /// remaining (the document may never become empty).
    pub fn remove_at(&mut self, index: usize) -> Option<Block> {
        if index >= self.blocks.len() || self.blocks.len() == 1 {
            return None;
        }
        let removed = self.blocks.remove(index);
        self.version += 1;
        Some(removed)
    }

    /// Move the block at `from` to position `to`.
    ///
    /// `to` is the target index in the list *after* removal, matching the
    /// usual drop-target semantics. A no-op when either index is out of range
    /// or when `from == to`.
    pub fn move_to(&mut self, from: usize, to: usize) {
        if from >= self.blocks.len() || to >= self.blocks.len() || from == to {
            return;
        }
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        self.version += 1;
    }

    /// Apply a patch to the block at `index`.
    ///
    /// A no-op when out of range or when the patch changes nothing (no version
    /// bump for no-ops, so hosts polling the version see only real edits).
    pub fn update(&mut self, index: usize, patch: BlockPatch) {
        let Some(block) = self.blocks.get_mut(index) else {
            return;
        };
        let mut changed = false;
        if let Some(kind) = patch.kind
            && block.kind != kind
        {
            block.kind = kind;
            changed = true;
        }
        if let Some(plain) = patch.plain
            && block.content.plain != plain
        {
            block.content.plain = plain;
            // Keep spans inside the new text so every snapshot stays loadable.
            let len = block.content.plain.chars().count();
            block.content.rich.retain_mut(|span| {
                span.end = span.end.min(len);
                span.start = span.start.min(span.end);
                span.start < span.end
            });
            changed = true;
        }
        if let Some(color) = patch.color
            && block.color != color
        {
            block.color = color;
            changed = true;
        }
        if changed {
            self.version += 1;
        }
    }

    /// Replace the whole block list (host loads a different document).
    ///
    /// An empty list is seeded like in [`BlockModel::new`].
    pub fn replace_all(&mut self, blocks: Vec<Block>) {
        self.blocks = if blocks.is_empty() {
            vec![Block::empty(BlockKind::Heading1)]
        } else {
            blocks
        };
        self.version += 1;
    }
}
