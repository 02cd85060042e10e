#![warn(missing_docs)]
//! Block Engine - Headless Block-Document Editing Kernel
//!
//! # Overview
//!
//! `block-engine` is a headless editing engine for Notion-style block
//! documents. It owns the ordered list of typed content blocks behind a live
//! editable surface and implements the structural operations (split, merge,
//! duplicate, retype, delete, reorder) while preserving caret position, block
//! identity, and content fidelity. It does not render anything, assuming the
//! upper layer provides one editable text surface per block.
//!
//! # Core Features
//!
//! - **Ordered Block Model**: unique stable ids, at-least-one-block invariant,
//!   no-op out-of-range handling
//! - **Surface Binding**: one-directional surface ↔ model sync with IME
//!   composition gating and plain-text paste
//! - **Structural Commands**: split/merge/duplicate/retype/delete/move with
//!   refocus targets
//! - **Gesture Classification**: drag-to-reorder vs click-to-open-menu on one
//!   handle
//! - **Deferred Focus**: caret placement queued until the host has re-rendered
//! - **State Tracking**: version number mechanism and change notifications
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditorSession (host API & notifications)   │  ← Public API
//! ├──────────────┬───────────────┬──────────────┤
//! │  Commands    │  SurfaceBind  │  Reorder     │  ← Input routing
//! ├──────────────┴───────────────┴──────────────┤
//! │  FocusManager & CommandMenu                 │  ← Deferred UI effects
//! ├─────────────────────────────────────────────┤
//! │  BlockModel (ordered blocks + versioning)   │  ← Source of truth
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use block_engine::{Block, BlockCommand, BlockKind, CommandResult, EditorSession};
//!
//! let mut session = EditorSession::new(vec![Block::new(BlockKind::Paragraph, "Hello")]);
//!
//! // Press Enter at the end of the first block.
//! session.handle_line_break(0, false);
//! assert_eq!(session.blocks().len(), 2);
//!
//! // Turn the new block into a heading; its text is untouched.
//! let result = session.execute(BlockCommand::Retype {
//!     index: 1,
//!     kind: BlockKind::Heading2,
//! });
//! assert!(matches!(result, CommandResult::Applied { .. }));
//! ```
//!
//! # Module Description
//!
//! - [`block`] - block data model and host-load validation
//! - [`model`] - the ordered block list and its invariants
//! - [`commands`] - structural commands and refocus targets
//! - [`surface`] - editable-surface binding with composition gating
//! - [`reorder`] - drag/click gesture classification
//! - [`focus`] - deferred caret placement through a host registry
//! - [`menu`] - the contextual command menu state machine
//! - [`session`] - the per-document session tying it all together
//! - [`host`] - persistence/object-storage collaborator traits
//!
//! # Concurrency Model
//!
//! Single-threaded and event-driven: every operation completes synchronously
//! within the triggering input event. The only asynchrony is the deferral of
//! focus placement to after the host's next render, which is an ordering
//! guarantee, not a task. Each open document gets its own independent
//! [`EditorSession`] with no cross-instance sharing.

pub mod block;
pub mod commands;
pub mod focus;
pub mod host;
pub mod menu;
pub mod model;
pub mod reorder;
pub mod session;
pub mod surface;

pub use block::{
    Block, BlockColor, BlockContent, BlockId, BlockKind, BlockValidationError, RichSpan, SpanStyle,
};
pub use commands::{BlockCommand, CaretEdge, CommandProcessor, CommandResult, FocusTarget};
pub use focus::{EditableSurface, FocusManager, SurfaceRegistry};
pub use host::{DocumentStore, HostError, ObjectStore};
pub use menu::{CommandMenu, MenuState};
pub use model::{BlockModel, BlockPatch};
pub use reorder::{
    CLICK_MAX_MS, DRAG_SLOP_PX, GestureOutcome, PointerPoint, ReorderController,
};
pub use session::{ChangeCallback, ChangeKind, EditorSession, SessionChange};
pub use surface::{PasteOutcome, SurfaceBinding};
