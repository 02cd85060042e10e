//! Deferred focus placement.
//!
//! # Overview
//!
//! Structural commands report which block should receive the caret, but the
//! target's widget may not exist until the host re-renders the list (a split's
//! new block has no surface yet at command time). [`FocusManager`] therefore
//! queues [`FocusTarget`]s and resolves them only when the host calls
//! [`FocusManager::flush`] after its next render pass.
//!
//! Resolution goes through a [`SurfaceRegistry`] the host implements: an
//! id → live-surface lookup rebuilt on every render, not authoritative state.
//! A target whose block no longer exists at flush time (deleted between the
//! request and the render) is silently dropped; stale references are an
//! expected product of the deferral, not an error.

use crate::block::BlockId;
use crate::commands::{CaretEdge, FocusTarget};

/// A live editable surface the host can place a caret into.
pub trait EditableSurface {
    /// Length of the surface's text in chars (the caret offset for
    /// [`CaretEdge::End`]).
    fn text_len(&self) -> usize;

    /// Give this surface keyboard focus and place the caret at `offset`
    /// (chars from the start of the text).
    fn focus_at(&mut self, offset: usize);
}

/// Host-maintained lookup from block id to its currently rendered surface.
///
/// The mapping is rebuilt by the host on every render; the engine never holds
/// on to a resolved surface across renders.
pub trait SurfaceRegistry {
    /// Resolve `id` to its live surface, or `None` when the block is not
    /// currently rendered.
    fn resolve(&mut self, id: &BlockId) -> Option<&mut dyn EditableSurface>;
}

/// Queues refocus requests and executes them after the host has re-rendered.
#[derive(Debug, Default)]
pub struct FocusManager {
    pending: Vec<FocusTarget>,
}

impl FocusManager {
    /// Create a manager with no pending requests.
    pub fn new() -> Self {
        FocusManager::default()
    }

    /// Queue a refocus request for the next flush.
    pub fn request(&mut self, target: FocusTarget) {
        self.pending.push(target);
    }

    /// Whether any request is waiting for the next render.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Resolve and execute all pending requests against the current render.
    ///
    /// Called by the host once per render pass, after the widgets exist.
    /// Requests whose block is no longer rendered are dropped silently.
    /// Returns how many requests were actually focused.
    pub fn flush(&mut self, registry: &mut dyn SurfaceRegistry) -> usize {
        let mut focused = 0;
        for target in self.pending.drain(..) {
            let Some(surface) = registry.resolve(&target.id) else {
                continue;
            };
            let offset = match target.caret {
                CaretEdge::Start => 0,
                CaretEdge::End => surface.text_len(),
            };
            surface.focus_at(offset);
            focused += 1;
        }
        focused
    }

    /// Drop all pending requests without executing them.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeSurface {
        text: String,
        focused_at: Option<usize>,
    }

    impl EditableSurface for FakeSurface {
        fn text_len(&self) -> usize {
            self.text.chars().count()
        }

        fn focus_at(&mut self, offset: usize) {
            self.focused_at = Some(offset);
        }
    }

    #[derive(Default)]
    struct FakeRegistry {
        surfaces: HashMap<BlockId, FakeSurface>,
    }

    impl FakeRegistry {
        fn add(&mut self, id: BlockId, text: &str) {
            self.surfaces.insert(
                id,
                FakeSurface {
                    text: text.to_string(),
                    focused_at: None,
                },
            );
        }
    }

    impl SurfaceRegistry for FakeRegistry {
        fn resolve(&mut self, id: &BlockId) -> Option<&mut dyn EditableSurface> {
            self.surfaces
                .get_mut(id)
                .map(|s| s as &mut dyn EditableSurface)
        }
    }

    #[test]
    fn test_flush_places_caret_at_requested_edge() {
        let mut registry = FakeRegistry::default();
        let id_a = BlockId::generate();
        let id_b = BlockId::generate();
        registry.add(id_a.clone(), "hello");
        registry.add(id_b.clone(), "world!");

        let mut manager = FocusManager::new();
        manager.request(FocusTarget::start(id_a.clone()));
        manager.request(FocusTarget::end(id_b.clone()));

        assert_eq!(manager.flush(&mut registry), 2);
        assert_eq!(registry.surfaces[&id_a].focused_at, Some(0));
        assert_eq!(registry.surfaces[&id_b].focused_at, Some(6));
        assert!(!manager.has_pending());
    }

    #[test]
    fn test_stale_target_is_silently_dropped() {
        let mut registry = FakeRegistry::default();
        let mut manager = FocusManager::new();
        manager.request(FocusTarget::end(BlockId::generate()));

        assert_eq!(manager.flush(&mut registry), 0);
        assert!(!manager.has_pending());
    }

    #[test]
    fn test_requests_are_deferred_until_flush() {
        let mut manager = FocusManager::new();
        manager.request(FocusTarget::start(BlockId::generate()));
        assert!(manager.has_pending());
        manager.clear();
        assert!(!manager.has_pending());
    }
}
