//! End-to-end structural editing scenario against the session API.

use block_engine::{
    Block, BlockCommand, BlockKind, CommandResult, EditorSession, FocusManager, SurfaceRegistry,
    EditableSurface, BlockId,
};
use std::collections::HashMap;

fn texts(session: &EditorSession) -> Vec<&str> {
    session
        .blocks()
        .iter()
        .map(|b| b.content.plain.as_str())
        .collect()
}

fn kinds(session: &EditorSession) -> Vec<BlockKind> {
    session.blocks().iter().map(|b| b.kind).collect()
}

#[test]
fn test_full_editing_scenario() {
    let mut session = EditorSession::new(vec![Block::new(BlockKind::Paragraph, "Hello")]);

    // Enter at block 0: two paragraphs, the second empty.
    assert!(session.handle_line_break(0, false));
    assert_eq!(texts(&session), ["Hello", ""]);
    assert_eq!(kinds(&session), [BlockKind::Paragraph, BlockKind::Paragraph]);

    // Duplicate block 0.
    let result = session.execute(BlockCommand::Duplicate { index: 0 });
    assert!(matches!(result, CommandResult::Applied { .. }));
    assert_eq!(texts(&session), ["Hello", "Hello", ""]);

    // Turn block 2 into a heading; contents unchanged.
    session.execute(BlockCommand::Retype {
        index: 2,
        kind: BlockKind::Heading1,
    });
    assert_eq!(
        kinds(&session),
        [BlockKind::Paragraph, BlockKind::Paragraph, BlockKind::Heading1]
    );
    assert_eq!(texts(&session), ["Hello", "Hello", ""]);

    // Backspace in a block with text stays with the surface: the session's
    // caller-side gate refuses to route it as a merge.
    assert!(!session.handle_backspace(1));
    assert_eq!(session.blocks().len(), 3);

    // Delete the duplicate.
    session.execute(BlockCommand::Delete { index: 1 });
    assert_eq!(texts(&session), ["Hello", ""]);
    assert_eq!(kinds(&session), [BlockKind::Paragraph, BlockKind::Heading1]);
}

struct MapSurface {
    text: String,
    caret: Option<usize>,
}

impl EditableSurface for MapSurface {
    fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    fn focus_at(&mut self, offset: usize) {
        self.caret = Some(offset);
    }
}

/// Registry the way a host builds one: rebuilt from the current block list on
/// every "render".
#[derive(Default)]
struct MapRegistry {
    surfaces: HashMap<BlockId, MapSurface>,
}

impl MapRegistry {
    fn render(session: &EditorSession) -> Self {
        let mut registry = MapRegistry::default();
        for block in session.blocks() {
            registry.surfaces.insert(
                block.id.clone(),
                MapSurface {
                    text: block.content.plain.clone(),
                    caret: None,
                },
            );
        }
        registry
    }
}

impl SurfaceRegistry for MapRegistry {
    fn resolve(&mut self, id: &BlockId) -> Option<&mut dyn EditableSurface> {
        self.surfaces
            .get_mut(id)
            .map(|s| s as &mut dyn EditableSurface)
    }
}

#[test]
fn test_split_focus_lands_in_new_block_after_render() {
    let mut session = EditorSession::new(vec![Block::new(BlockKind::Paragraph, "Hello")]);
    session.handle_line_break(0, false);

    // Host renders, then flushes deferred focus.
    let mut registry = MapRegistry::render(&session);
    assert_eq!(session.focus_mut().flush(&mut registry), 1);

    let new_id = session.blocks()[1].id.clone();
    assert_eq!(registry.surfaces[&new_id].caret, Some(0));
}

#[test]
fn test_focus_request_survives_only_until_target_vanishes() {
    let mut session = EditorSession::new(vec![
        Block::new(BlockKind::Paragraph, "a"),
        Block::new(BlockKind::Paragraph, ""),
    ]);

    // The merge queues a refocus to block 0's end...
    assert!(session.handle_backspace(1));

    // ...but the host replaces the document before rendering. The stale
    // request is dropped silently at flush time.
    session
        .set_blocks(vec![Block::new(BlockKind::Quote, "other doc")])
        .unwrap();
    let mut registry = MapRegistry::render(&session);
    assert_eq!(session.focus_mut().flush(&mut registry), 0);
}

#[test]
fn test_merge_refocus_places_caret_at_previous_end() {
    let mut session = EditorSession::new(vec![
        Block::new(BlockKind::Paragraph, "Hello"),
        Block::new(BlockKind::Paragraph, ""),
    ]);
    let previous = session.blocks()[0].id.clone();

    assert!(session.handle_backspace(1));
    let mut registry = MapRegistry::render(&session);
    session.focus_mut().flush(&mut registry);

    assert_eq!(registry.surfaces[&previous].caret, Some(5));
}

#[test]
fn test_menu_driven_turn_into_flow() {
    let mut session = EditorSession::new(vec![
        Block::new(BlockKind::Paragraph, "a"),
        Block::new(BlockKind::Paragraph, "make me a heading"),
    ]);

    session.menu_mut().toggle(1);
    session.menu_mut().open_turn_into();
    session.menu_mut().set_query("heading 2");
    assert_eq!(session.menu().filtered_kinds(), vec![BlockKind::Heading2]);

    let command = session.menu_mut().choose_kind(BlockKind::Heading2).unwrap();
    session.execute(command);

    assert!(!session.menu().is_open());
    let block = &session.blocks()[1];
    assert_eq!(block.kind, BlockKind::Heading2);
    assert_eq!(block.content.plain, "make me a heading");
}

#[test]
fn test_focus_manager_standalone_defers_until_flush() {
    let mut manager = FocusManager::new();
    assert!(!manager.has_pending());
    manager.request(block_engine::FocusTarget::end(BlockId::generate()));
    assert!(manager.has_pending());
}
