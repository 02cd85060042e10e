//! Text surface binding.
//!
//! # Overview
//!
//! The host renders one editable text surface per block and owns its widgets;
//! the engine owns the text. [`SurfaceBinding`] is the one-directional sync
//! protocol between the two:
//!
//! - **model → surface**: after an external mutation (mount, post-split focus,
//!   a reload), [`SurfaceBinding::refresh`] reports the model text the host
//!   must write into the surface; no other path writes the surface.
//! - **surface → model**: on every input event,
//!   [`SurfaceBinding::handle_input`] compares the surface text against the
//!   last committed value and writes the difference into the model. Committing
//!   does not echo back into the surface, so there is no feedback loop to
//!   perturb the caret.
//!
//! Composed input (IME, dead keys) is buffered by the platform; while a
//! composition session is open the commit path is suspended, and exactly one
//! commit happens at session end with the final text.
//!
//! Paste replaces the platform's default insertion with plain text only:
//! formatting is stripped by construction because only the clipboard's plain
//! text enters [`SurfaceBinding::paste`], and control characters are dropped
//! so a multi-line clipboard cannot smuggle line breaks into a single block.
//!
//! The binding is synchronous: every input event is handled to completion
//! before the next one, with no debouncing or batching.

use unicode_segmentation::UnicodeSegmentation;

use crate::block::BlockId;
use crate::model::{BlockModel, BlockPatch};

/// Result of a paste: the surface text to display and the caret position
/// (in chars) after the inserted run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteOutcome {
    /// New surface text.
    pub text: String,
    /// Caret char offset after the pasted run.
    pub caret: usize,
}

/// Keeps one block's editable surface and its model text in sync.
#[derive(Debug, Clone)]
pub struct SurfaceBinding {
    block_id: BlockId,
    last_committed: String,
    composing: bool,
}

impl SurfaceBinding {
    /// Bind to the block with the given id.
    ///
    /// `initial_text` is the model's plain text at bind time, so the first
    /// input event has a baseline to compare against.
    pub fn new(block_id: BlockId, initial_text: impl Into<String>) -> Self {
        SurfaceBinding {
            block_id,
            last_committed: initial_text.into(),
            composing: false,
        }
    }

    /// Id of the bound block.
    pub fn block_id(&self) -> &BlockId {
        &self.block_id
    }

    /// Whether a composition session is open (commits suspended).
    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Model → surface path.
    ///
    /// Returns the text the host must write into the surface when the
    /// displayed text no longer matches the model (e.g. right after a mount or
    /// a reload), or `None` when they already agree. Never called mid-input;
    /// the host invokes it after external mutations only.
    pub fn refresh(&mut self, model: &BlockModel, surface_text: &str) -> Option<String> {
        let plain = &model.get(&self.block_id)?.content.plain;
        if plain == surface_text {
            return None;
        }
        self.last_committed = plain.clone();
        Some(plain.clone())
    }

    /// Surface → model path, called on every user input event.
    ///
    /// Commits the surface text into the model unless a composition session is
    /// open or the text is unchanged since the last commit. Returns whether a
    /// commit happened. A stale binding (block no longer in the model) is a
    /// silent no-op.
    pub fn handle_input(&mut self, model: &mut BlockModel, surface_text: &str) -> bool {
        if self.composing {
            return false;
        }
        self.commit(model, surface_text)
    }

    /// Open a composition session: intermediate input events stop committing.
    pub fn begin_composition(&mut self) {
        self.composing = true;
    }

    /// Close the composition session and commit the final text once.
    ///
    /// Identical to a normal input commit; returns whether the model changed.
    pub fn end_composition(&mut self, model: &mut BlockModel, surface_text: &str) -> bool {
        self.composing = false;
        self.commit(model, surface_text)
    }

    fn commit(&mut self, model: &mut BlockModel, surface_text: &str) -> bool {
        if surface_text == self.last_committed {
            return false;
        }
        let Some(index) = model.index_of(&self.block_id) else {
            return false;
        };
        model.update(index, BlockPatch::plain(surface_text));
        self.last_committed = surface_text.to_string();
        true
    }

    /// Compute the surface text resulting from pasting plain text at `caret`
    /// (a char offset into `surface_text`).
    ///
    /// The caret is snapped to the nearest grapheme boundary at or before it,
    /// so a paste can never land inside an emoji or combining sequence. The
    /// caller displays the returned text and then routes it through
    /// [`SurfaceBinding::handle_input`] like any other edit.
    pub fn paste(surface_text: &str, caret: usize, pasted: &str) -> PasteOutcome {
        let insertion = sanitize_paste(pasted);
        let boundary = snap_to_grapheme_boundary(surface_text, caret);
        let byte_at = |chars: usize| {
            surface_text
                .char_indices()
                .nth(chars)
                .map(|(b, _)| b)
                .unwrap_or(surface_text.len())
        };
        let split = byte_at(boundary);
        let mut text = String::with_capacity(surface_text.len() + insertion.len());
        text.push_str(&surface_text[..split]);
        text.push_str(&insertion);
        text.push_str(&surface_text[split..]);
        PasteOutcome {
            text,
            caret: boundary + insertion.chars().count(),
        }
    }
}

/// Strip a clipboard payload down to text a single block can hold.
///
/// Newline runs collapse to one space (line breaks enter the document via
/// Enter/split only); other control characters are dropped.
fn sanitize_paste(pasted: &str) -> String {
    let mut out = String::with_capacity(pasted.len());
    let mut pending_break = false;
    for ch in pasted.chars() {
        if ch == '\n' || ch == '\r' {
            pending_break = true;
            continue;
        }
        if ch.is_control() && ch != '\t' {
            continue;
        }
        if pending_break {
            out.push(' ');
            pending_break = false;
        }
        out.push(if ch == '\t' { ' ' } else { ch });
    }
    out
}

/// Largest grapheme-cluster boundary at or before `caret` (char offsets).
fn snap_to_grapheme_boundary(text: &str, caret: usize) -> usize {
    let mut boundary = 0;
    let mut chars_seen = 0;
    for grapheme in text.graphemes(true) {
        let next = chars_seen + grapheme.chars().count();
        if next > caret {
            return boundary;
        }
        boundary = next;
        chars_seen = next;
    }
    boundary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, BlockKind};

    fn model_and_binding(text: &str) -> (BlockModel, SurfaceBinding) {
        let block = Block::new(BlockKind::Paragraph, text);
        let id = block.id.clone();
        let model = BlockModel::new(vec![block]);
        let binding = SurfaceBinding::new(id, text);
        (model, binding)
    }

    #[test]
    fn test_input_commits_changed_text() {
        let (mut model, mut binding) = model_and_binding("Hi");
        assert!(binding.handle_input(&mut model, "Hi there"));
        assert_eq!(model.get_at(0).unwrap().content.plain, "Hi there");
    }

    #[test]
    fn test_unchanged_text_does_not_commit() {
        let (mut model, mut binding) = model_and_binding("Hi");
        let version = model.version();
        assert!(!binding.handle_input(&mut model, "Hi"));
        assert_eq!(model.version(), version);
    }

    #[test]
    fn test_composition_suspends_commits_until_end() {
        let (mut model, mut binding) = model_and_binding("");
        binding.begin_composition();

        // Intermediate events while composing: no commits.
        assert!(!binding.handle_input(&mut model, "n"));
        assert!(!binding.handle_input(&mut model, "ni"));
        assert_eq!(model.get_at(0).unwrap().content.plain, "");
        let version = model.version();

        // Exactly one commit at session end, with the final text.
        assert!(binding.end_composition(&mut model, "你"));
        assert_eq!(model.get_at(0).unwrap().content.plain, "你");
        assert_eq!(model.version(), version + 1);
        assert!(!binding.is_composing());
    }

    #[test]
    fn test_refresh_reports_model_text_when_surface_diverged() {
        let (mut model, mut binding) = model_and_binding("model text");
        model.update(0, BlockPatch::plain("updated"));
        assert_eq!(
            binding.refresh(&model, "model text"),
            Some("updated".to_string())
        );
        // After the overwrite, the surface agrees and the next refresh is idle.
        assert_eq!(binding.refresh(&model, "updated"), None);
    }

    #[test]
    fn test_refresh_on_stale_binding_is_noop() {
        let block = Block::new(BlockKind::Paragraph, "a");
        let model = BlockModel::new(vec![block]);
        let mut binding = SurfaceBinding::new(BlockId::generate(), "");
        assert_eq!(binding.refresh(&model, "whatever"), None);
    }

    #[test]
    fn test_stale_binding_input_is_noop() {
        let block = Block::new(BlockKind::Paragraph, "a");
        let mut model = BlockModel::new(vec![block]);
        let mut binding = SurfaceBinding::new(BlockId::generate(), "");
        assert!(!binding.handle_input(&mut model, "typed"));
        assert_eq!(model.get_at(0).unwrap().content.plain, "a");
    }

    #[test]
    fn test_paste_inserts_at_caret() {
        let outcome = SurfaceBinding::paste("Helo", 3, "l");
        assert_eq!(outcome.text, "Hello");
        assert_eq!(outcome.caret, 4);
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let outcome = SurfaceBinding::paste("", 0, "line one\r\nline two\nline three");
        assert_eq!(outcome.text, "line one line two line three");
    }

    #[test]
    fn test_paste_snaps_caret_inside_grapheme() {
        // "e\u{301}" is one grapheme of two chars; caret 1 points inside it
        // and must snap back to the boundary before it.
        let outcome = SurfaceBinding::paste("e\u{301}x", 1, "!");
        assert_eq!(outcome.text, "!e\u{301}x");
        assert_eq!(outcome.caret, 1);
    }

    #[test]
    fn test_paste_caret_past_end_appends() {
        let outcome = SurfaceBinding::paste("ab", 99, "c");
        assert_eq!(outcome.text, "abc");
        assert_eq!(outcome.caret, 3);
    }
}
