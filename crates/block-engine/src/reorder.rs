//! Pointer-gesture reorder controller.
//!
//! # Overview
//!
//! Each block's drag handle is dual-purpose: dragging it reorders the block,
//! a short click on it toggles the command menu. [`ReorderController`] is the
//! small state machine that classifies the gesture (down → maybe-drag → up)
//! without depending on any gesture-recognition library.
//!
//! Classification rules:
//!
//! - while the pointer is down, displacement beyond [`DRAG_SLOP_PX`] in either
//!   axis marks the interaction as a drag, permanently for this gesture
//! - on release, a gesture that never became a drag and lasted less than
//!   [`CLICK_MAX_MS`] is a click (toggle the menu)
//! - otherwise, if a drop target differs from the source, the block moves
//!
//! The controller is headless: the host supplies pointer positions in pixels
//! and timestamps in milliseconds from its own event source, and maps the
//! release position to a drop target block itself (hit testing is a layout
//! concern). Reordering preserves every block id and every block's content;
//! only list position changes.

/// Displacement (pixels, either axis) beyond which a gesture is a drag.
pub const DRAG_SLOP_PX: i32 = 6;

/// Maximum duration (milliseconds) of a press that still counts as a click.
pub const CLICK_MAX_MS: u64 = 250;

/// A pointer position in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPoint {
    /// Horizontal position.
    pub x: i32,
    /// Vertical position.
    pub y: i32,
}

impl PointerPoint {
    /// Construct a point.
    pub fn new(x: i32, y: i32) -> Self {
        PointerPoint { x, y }
    }
}

/// What a completed gesture resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The gesture resolved to nothing (e.g. a drag released outside any
    /// block, or a slow press that never moved).
    None,
    /// A click on the handle of the block at `index`: toggle the menu.
    ToggleMenu {
        /// Index of the block whose handle was clicked.
        index: usize,
    },
    /// A drag completed onto another block: move `from` to `to`.
    Move {
        /// Index of the dragged block.
        from: usize,
        /// Index of the drop target.
        to: usize,
    },
}

#[derive(Debug, Clone, Copy)]
enum GestureState {
    Idle,
    Tracking {
        source: usize,
        down: PointerPoint,
        down_at_ms: u64,
        dragging: bool,
    },
}

/// Classifies drag-handle gestures into menu toggles and list moves.
#[derive(Debug)]
pub struct ReorderController {
    state: GestureState,
}

impl Default for ReorderController {
    fn default() -> Self {
        Self::new()
    }
}

impl ReorderController {
    /// Create an idle controller.
    pub fn new() -> Self {
        ReorderController {
            state: GestureState::Idle,
        }
    }

    /// Pointer pressed on the drag handle of the block at `source`.
    ///
    /// Starts tracking; any gesture already in flight is discarded. Closing
    /// an open command menu on press is the session's job, not the
    /// controller's.
    pub fn pointer_down(&mut self, source: usize, at: PointerPoint, time_ms: u64) {
        self.state = GestureState::Tracking {
            source,
            down: at,
            down_at_ms: time_ms,
            dragging: false,
        };
    }

    /// Pointer moved while pressed.
    ///
    /// Once displacement exceeds the slop in either axis, the gesture is a
    /// drag for the rest of the interaction, even if the pointer returns to
    /// the press position.
    pub fn pointer_move(&mut self, at: PointerPoint) {
        if let GestureState::Tracking { down, dragging, .. } = &mut self.state
            && !*dragging
            && ((at.x - down.x).abs() > DRAG_SLOP_PX || (at.y - down.y).abs() > DRAG_SLOP_PX)
        {
            *dragging = true;
        }
    }

    /// Whether the current gesture has been marked as a drag.
    pub fn is_dragging(&self) -> bool {
        matches!(
            self.state,
            GestureState::Tracking { dragging: true, .. }
        )
    }

    /// Index of the block being tracked, if a gesture is in flight.
    pub fn source(&self) -> Option<usize> {
        match self.state {
            GestureState::Tracking { source, .. } => Some(source),
            GestureState::Idle => None,
        }
    }

    /// Pointer released.
    ///
    /// `drop_target` is the block index under the release position, when the
    /// host's hit test found one. Returns the classified outcome and resets
    /// to idle.
    pub fn pointer_up(&mut self, drop_target: Option<usize>, time_ms: u64) -> GestureOutcome {
        let GestureState::Tracking {
            source,
            down_at_ms,
            dragging,
            ..
        } = self.state
        else {
            return GestureOutcome::None;
        };
        self.state = GestureState::Idle;

        let elapsed = time_ms.saturating_sub(down_at_ms);
        if !dragging && elapsed < CLICK_MAX_MS {
            return GestureOutcome::ToggleMenu { index: source };
        }
        match drop_target {
            Some(target) if target != source => GestureOutcome::Move {
                from: source,
                to: target,
            },
            _ => GestureOutcome::None,
        }
    }

    /// Abandon the gesture in flight (e.g. focus loss mid-drag).
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }
}
