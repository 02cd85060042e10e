//! Structural editing commands.
//!
//! # Overview
//!
//! The command layer is the only writer of document *structure*: splitting,
//! merging, duplicating, retyping, recoloring, deleting, and moving blocks all
//! go through [`CommandProcessor::apply`]. Text content is written by the
//! surface binding instead (see [`crate::surface`]).
//!
//! Commands never fail with an error. An operation whose precondition does not
//! hold (deleting the last remaining block, merging before the first block,
//! merging a non-empty block, a stale index) returns
//! [`CommandResult::Rejected`] and leaves the model untouched. These cases are
//! ordinary edge cases, not faults: the UI affordances that trigger them always
//! exist.
//!
//! Mutating commands report a *refocus target*: the block that should receive
//! the caret once the host has re-rendered the list. The target block's surface
//! does not exist yet at command time (a split's new block has no widget until
//! the next render), so the caller hands the target to the
//! [`crate::focus::FocusManager`], which defers the lookup.
//!
//! # Example
//!
//! ```rust
//! use block_engine::{Block, BlockKind, BlockModel, BlockCommand, CommandProcessor, CommandResult};
//!
//! let mut model = BlockModel::new(vec![Block::new(BlockKind::Paragraph, "Hello")]);
//! let result = CommandProcessor::apply(&mut model, BlockCommand::SplitAt { index: 0 });
//!
//! assert!(matches!(result, CommandResult::Applied { .. }));
//! assert_eq!(model.len(), 2);
//! assert_eq!(model.get_at(0).unwrap().content.plain, "Hello");
//! assert_eq!(model.get_at(1).unwrap().content.plain, "");
//! ```

use crate::block::{Block, BlockColor, BlockId, BlockKind};
use crate::model::{BlockModel, BlockPatch};

/// Which edge of a block's text the caret should land on after a refocus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretEdge {
    /// Before the first character.
    Start,
    /// After the last character.
    End,
}

/// The block that should receive the caret after a structural mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTarget {
    /// Id of the block to focus.
    pub id: BlockId,
    /// Caret placement within that block's text.
    pub caret: CaretEdge,
}

impl FocusTarget {
    /// Target the start of the given block.
    pub fn start(id: BlockId) -> Self {
        FocusTarget {
            id,
            caret: CaretEdge::Start,
        }
    }

    /// Target the end of the given block.
    pub fn end(id: BlockId) -> Self {
        FocusTarget {
            id,
            caret: CaretEdge::End,
        }
    }
}

/// Structural commands over the block list. Indices are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockCommand {
    /// Press Enter on block `index`: insert a new empty block of the same kind
    /// right after it.
    ///
    /// The triggering block's text is left untouched; the new block always
    /// starts empty regardless of where the caret was.
    SplitAt {
        /// Index of the block holding the caret.
        index: usize,
    },
    /// Press Backspace on the *empty* block `index`: remove it and return the
    /// caret to the end of the previous block.
    ///
    /// Rejected for the first block and for non-empty blocks (callers check
    /// emptiness before routing Backspace here; the check is repeated as a
    /// guard against miswired callers).
    BackspaceMerge {
        /// Index of the empty block to remove.
        index: usize,
    },
    /// Insert a copy of block `index` right after it: same kind, same plain
    /// text, same color, fresh id, rich spans dropped.
    Duplicate {
        /// Index of the block to copy.
        index: usize,
    },
    /// "Turn into": change block `index`'s kind, leaving its content alone.
    Retype {
        /// Index of the block to retype.
        index: usize,
        /// New kind.
        kind: BlockKind,
    },
    /// Set block `index`'s color hint, leaving its content alone.
    SetColor {
        /// Index of the block to recolor.
        index: usize,
        /// New color.
        color: BlockColor,
    },
    /// Remove block `index`. Rejected when it is the last block remaining.
    Delete {
        /// Index of the block to remove.
        index: usize,
    },
    /// Move the block at `from` to position `to` (reorder drop).
    Move {
        /// Current index of the dragged block.
        from: usize,
        /// Target index after removal.
        to: usize,
    },
}

/// Command execution result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// The model was mutated.
    Applied {
        /// Block to focus after the host re-renders, when the command implies
        /// a caret move (reorder does not).
        refocus: Option<FocusTarget>,
    },
    /// A precondition did not hold; the model is unchanged.
    Rejected,
}

impl CommandResult {
    fn applied(refocus: FocusTarget) -> Self {
        CommandResult::Applied {
            refocus: Some(refocus),
        }
    }
}

/// Applies [`BlockCommand`]s to a [`BlockModel`].
///
/// Stateless: the session owns the model and passes it in per call.
pub struct CommandProcessor;

impl CommandProcessor {
    /// Execute one command against the model.
    pub fn apply(model: &mut BlockModel, command: BlockCommand) -> CommandResult {
        match command {
            BlockCommand::SplitAt { index } => Self::split_at(model, index),
            BlockCommand::BackspaceMerge { index } => Self::backspace_merge(model, index),
            BlockCommand::Duplicate { index } => Self::duplicate(model, index),
            BlockCommand::Retype { index, kind } => Self::retype(model, index, kind),
            BlockCommand::SetColor { index, color } => Self::set_color(model, index, color),
            BlockCommand::Delete { index } => Self::delete(model, index),
            BlockCommand::Move { from, to } => Self::move_block(model, from, to),
        }
    }

    fn split_at(model: &mut BlockModel, index: usize) -> CommandResult {
        let Some(source) = model.get_at(index) else {
            return CommandResult::Rejected;
        };
        let block = Block::empty(source.kind);
        let id = block.id.clone();
        model.insert_at(index + 1, block);
        CommandResult::applied(FocusTarget::start(id))
    }

    fn backspace_merge(model: &mut BlockModel, index: usize) -> CommandResult {
        if index == 0 {
            // No block before the first one to merge into.
            return CommandResult::Rejected;
        }
        let Some(block) = model.get_at(index) else {
            return CommandResult::Rejected;
        };
        if !block.content.is_empty() {
            // Caller contract: only empty blocks are routed here.
            return CommandResult::Rejected;
        }
        let previous_id = model.get_at(index - 1).expect("index > 0").id.clone();
        if model.remove_at(index).is_none() {
            return CommandResult::Rejected;
        }
        CommandResult::applied(FocusTarget::end(previous_id))
    }

    fn duplicate(model: &mut BlockModel, index: usize) -> CommandResult {
        let Some(source) = model.get_at(index) else {
            return CommandResult::Rejected;
        };
        let mut copy = Block::new(source.kind, source.content.plain.clone());
        copy.color = source.color;
        let id = copy.id.clone();
        model.insert_at(index + 1, copy);
        CommandResult::applied(FocusTarget::end(id))
    }

    fn retype(model: &mut BlockModel, index: usize, kind: BlockKind) -> CommandResult {
        let Some(block) = model.get_at(index) else {
            return CommandResult::Rejected;
        };
        let id = block.id.clone();
        model.update(index, BlockPatch::kind(kind));
        CommandResult::applied(FocusTarget::end(id))
    }

    fn set_color(model: &mut BlockModel, index: usize, color: BlockColor) -> CommandResult {
        let Some(block) = model.get_at(index) else {
            return CommandResult::Rejected;
        };
        let id = block.id.clone();
        model.update(index, BlockPatch::color(color));
        CommandResult::applied(FocusTarget::end(id))
    }

    fn delete(model: &mut BlockModel, index: usize) -> CommandResult {
        if model.len() == 1 {
            // The last remaining block may not be deleted.
            return CommandResult::Rejected;
        }
        if model.get_at(index).is_none() {
            return CommandResult::Rejected;
        }
        if model.remove_at(index).is_none() {
            return CommandResult::Rejected;
        }
        // Neighbor that was before the deleted block, or the new occupant of
        // index 0 when the first block was deleted.
        let neighbor = if index == 0 { 0 } else { index - 1 };
        let id = model.get_at(neighbor).expect("list is non-empty").id.clone();
        CommandResult::applied(FocusTarget::end(id))
    }

    fn move_block(model: &mut BlockModel, from: usize, to: usize) -> CommandResult {
        if from >= model.len() || to >= model.len() || from == to {
            return CommandResult::Rejected;
        }
        model.move_to(from, to);
        CommandResult::Applied { refocus: None }
    }
}
