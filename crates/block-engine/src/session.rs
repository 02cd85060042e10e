//! Editing session and host interface.
//!
//! # Overview
//!
//! [`EditorSession`] is the engine's public surface: it owns the block model
//! and all controllers for one open document, and exposes to the host:
//!
//! - **State Queries**: the block snapshot and a monotonic version number
//! - **Change Notifications**: subscribe to per-change callbacks
//! - **Input Routing**: line-break and backspace keys, surface commits,
//!   pointer gestures on drag handles
//! - **Bulk Replace**: validated load of a host-supplied document
//!
//! Everything is synchronous on the host's event thread. The only deferral is
//! focus placement: structural commands queue a refocus target, and the host
//! flushes the queue after its next render (see [`crate::focus`]).
//!
//! # Example
//!
//! ```rust
//! use block_engine::{Block, BlockKind, EditorSession};
//!
//! let mut session = EditorSession::new(vec![Block::new(BlockKind::Paragraph, "Hello")]);
//!
//! // Enter at the end of block 0: a new empty paragraph appears after it.
//! session.handle_line_break(0, false);
//! assert_eq!(session.blocks().len(), 2);
//! assert!(session.focus_mut().has_pending());
//! ```

use crate::block::{Block, BlockId, BlockValidationError};
use crate::commands::{BlockCommand, CommandProcessor, CommandResult};
use crate::focus::FocusManager;
use crate::menu::CommandMenu;
use crate::model::BlockModel;
use crate::reorder::{GestureOutcome, PointerPoint, ReorderController};
use crate::surface::SurfaceBinding;
use std::collections::HashSet;

/// What kind of change a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Block structure changed (split, merge, duplicate, delete).
    Structure,
    /// A block's content or attributes changed (text commit, retype, color).
    Content,
    /// Block order changed.
    Reorder,
    /// The whole document was replaced.
    Reload,
}

/// A change notification delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionChange {
    /// What changed.
    pub kind: ChangeKind,
    /// The session version after the change.
    pub version: u64,
}

/// Subscriber callback type.
pub type ChangeCallback = Box<dyn FnMut(&SessionChange)>;

/// One document's editing session.
///
/// Owns the [`BlockModel`] plus the focus manager, command menu, reorder
/// controller, and the binding of the currently edited surface. One instance
/// per open document; instances share nothing.
pub struct EditorSession {
    model: BlockModel,
    focus: FocusManager,
    menu: CommandMenu,
    reorder: ReorderController,
    active: Option<SurfaceBinding>,
    callbacks: Vec<ChangeCallback>,
}

impl EditorSession {
    /// Create a session from an internally produced block list.
    ///
    /// An empty list is seeded with one empty heading block. Host-supplied
    /// documents go through [`EditorSession::load`] instead, which validates.
    pub fn new(blocks: Vec<Block>) -> Self {
        EditorSession {
            model: BlockModel::new(blocks),
            focus: FocusManager::new(),
            menu: CommandMenu::new(),
            reorder: ReorderController::new(),
            active: None,
            callbacks: Vec::new(),
        }
    }

    /// Create a session from a host-supplied block list, validating it.
    ///
    /// The whole load is rejected when any block is invalid or any id is
    /// duplicated; a partially-invalid document is never admitted. An empty
    /// or absent list is valid and gets the seed block.
    pub fn load(blocks: Vec<Block>) -> Result<Self, BlockValidationError> {
        validate_blocks(&blocks)?;
        Ok(Self::new(blocks))
    }

    /// Snapshot of all blocks in document order.
    ///
    /// Serializable as-is; the host's submit handler passes it whole to the
    /// persistence collaborator.
    pub fn blocks(&self) -> &[Block] {
        self.model.blocks()
    }

    /// Current session version. Bumped on every user-visible edit.
    pub fn version(&self) -> u64 {
        self.model.version()
    }

    /// Whether the state has changed since a version the host recorded.
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.model.version() > version
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&mut self, callback: impl FnMut(&SessionChange) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Bulk-replace the document (host loads a different document into the
    /// same session). Validated like [`EditorSession::load`].
    pub fn set_blocks(&mut self, blocks: Vec<Block>) -> Result<(), BlockValidationError> {
        validate_blocks(&blocks)?;
        self.model.replace_all(blocks);
        self.active = None;
        self.focus.clear();
        self.menu.close();
        self.reorder.cancel();
        self.notify(ChangeKind::Reload);
        Ok(())
    }

    /// The underlying block model (read-only).
    pub fn model(&self) -> &BlockModel {
        &self.model
    }

    /// The focus manager; the host flushes it after each render.
    pub fn focus_mut(&mut self) -> &mut FocusManager {
        &mut self.focus
    }

    /// The command menu (read-only, for rendering).
    pub fn menu(&self) -> &CommandMenu {
        &self.menu
    }

    /// The command menu, for item selection and search input. Commands the
    /// menu returns go back through [`EditorSession::execute`].
    pub fn menu_mut(&mut self) -> &mut CommandMenu {
        &mut self.menu
    }

    /// Execute a structural command, queueing its refocus target.
    pub fn execute(&mut self, command: BlockCommand) -> CommandResult {
        let kind = match &command {
            BlockCommand::Move { .. } => ChangeKind::Reorder,
            BlockCommand::Retype { .. } | BlockCommand::SetColor { .. } => ChangeKind::Content,
            _ => ChangeKind::Structure,
        };
        let result = CommandProcessor::apply(&mut self.model, command);
        if let CommandResult::Applied { refocus } = &result {
            if let Some(target) = refocus {
                self.focus.request(target.clone());
            }
            self.notify(kind);
        }
        result
    }

    // ---- key routing ------------------------------------------------------

    /// Route a line-break key pressed in block `index`.
    ///
    /// A non-shifted line break splits: a new empty block of the same kind
    /// appears after `index` and receives the caret. A shifted line break is
    /// not a structural edit and is left to the host. Returns whether the key
    /// was consumed.
    pub fn handle_line_break(&mut self, index: usize, shift: bool) -> bool {
        if shift {
            return false;
        }
        matches!(
            self.execute(BlockCommand::SplitAt { index }),
            CommandResult::Applied { .. }
        )
    }

    /// Route a backspace key pressed in block `index`.
    ///
    /// Only intercepts backspace on an *empty* block (remove it, return the
    /// caret to the previous block's end). Backspace inside text stays with
    /// the surface. Returns whether the key was consumed.
    pub fn handle_backspace(&mut self, index: usize) -> bool {
        let Some(block) = self.model.get_at(index) else {
            return false;
        };
        if !block.content.is_empty() {
            return false;
        }
        matches!(
            self.execute(BlockCommand::BackspaceMerge { index }),
            CommandResult::Applied { .. }
        )
    }

    // ---- surface binding --------------------------------------------------

    /// A surface gained focus: bind the session's commit path to it.
    ///
    /// Returns `false` when the id does not name a current block.
    pub fn begin_editing(&mut self, id: &BlockId) -> bool {
        let Some(block) = self.model.get(id) else {
            return false;
        };
        self.active = Some(SurfaceBinding::new(id.clone(), block.content.plain.clone()));
        true
    }

    /// The surface being edited, if any.
    pub fn editing_block(&self) -> Option<&BlockId> {
        self.active.as_ref().map(|b| b.block_id())
    }

    /// The surface lost focus: drop the binding.
    pub fn end_editing(&mut self) {
        self.active = None;
    }

    /// Model → surface path after an external mutation: text the host must
    /// write into the active surface, when it diverged from the model.
    pub fn refresh_surface(&mut self, surface_text: &str) -> Option<String> {
        let binding = self.active.as_mut()?;
        binding.refresh(&self.model, surface_text)
    }

    /// Surface → model path for an input event on the active surface.
    pub fn commit_input(&mut self, surface_text: &str) -> bool {
        let Some(binding) = self.active.as_mut() else {
            return false;
        };
        if binding.handle_input(&mut self.model, surface_text) {
            self.notify(ChangeKind::Content);
            return true;
        }
        false
    }

    /// A composition session opened on the active surface.
    pub fn begin_composition(&mut self) {
        if let Some(binding) = self.active.as_mut() {
            binding.begin_composition();
        }
    }

    /// The composition session closed: commit the final text once.
    pub fn end_composition(&mut self, surface_text: &str) -> bool {
        let Some(binding) = self.active.as_mut() else {
            return false;
        };
        if binding.end_composition(&mut self.model, surface_text) {
            self.notify(ChangeKind::Content);
            return true;
        }
        false
    }

    // ---- pointer gestures -------------------------------------------------

    /// Pointer pressed on the drag handle of block `source`.
    ///
    /// Closes an open command menu (the handle owns both affordances) and
    /// starts gesture tracking.
    pub fn pointer_down(&mut self, source: usize, at: PointerPoint, time_ms: u64) {
        self.menu.close();
        self.reorder.pointer_down(source, at, time_ms);
    }

    /// Pointer moved during a handle gesture.
    pub fn pointer_move(&mut self, at: PointerPoint) {
        self.reorder.pointer_move(at);
    }

    /// Whether a drag is in flight (hosts render a drop indicator).
    pub fn is_dragging(&self) -> bool {
        self.reorder.is_dragging()
    }

    /// Pointer released; classify and act on the gesture.
    ///
    /// A click toggles the menu for the source block, a drag onto another
    /// block moves it. Returns the classified outcome; a drop whose move was
    /// refused (stale indices) reports [`GestureOutcome::None`], so the
    /// outcome says what actually happened to the document.
    pub fn pointer_up(&mut self, drop_target: Option<usize>, time_ms: u64) -> GestureOutcome {
        let outcome = self.reorder.pointer_up(drop_target, time_ms);
        match outcome {
            GestureOutcome::ToggleMenu { index } => {
                self.menu.toggle(index);
            }
            GestureOutcome::Move { from, to } => {
                let result = self.execute(BlockCommand::Move { from, to });
                if result == CommandResult::Rejected {
                    return GestureOutcome::None;
                }
            }
            GestureOutcome::None => {}
        }
        outcome
    }

    fn notify(&mut self, kind: ChangeKind) {
        let change = SessionChange {
            kind,
            version: self.model.version(),
        };
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}

/// Reject a host-supplied list when any block is invalid or ids collide.
fn validate_blocks(blocks: &[Block]) -> Result<(), BlockValidationError> {
    let mut seen = HashSet::new();
    for block in blocks {
        block.validate()?;
        if !seen.insert(block.id.clone()) {
            return Err(BlockValidationError::DuplicateId(block.id.clone()));
        }
    }
    Ok(())
}
