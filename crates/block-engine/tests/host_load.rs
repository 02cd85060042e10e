use block_engine::{
    Block, BlockKind, BlockValidationError, EditorSession, RichSpan, SpanStyle,
};

#[test]
fn test_empty_initial_list_seeds_one_heading() {
    let session = EditorSession::load(Vec::new()).unwrap();
    assert_eq!(session.blocks().len(), 1);
    let seed = &session.blocks()[0];
    assert_eq!(seed.kind, BlockKind::Heading1);
    assert!(seed.content.is_empty());
}

#[test]
fn test_valid_document_loads_in_order() {
    let blocks = vec![
        Block::new(BlockKind::Heading1, "Title"),
        Block::new(BlockKind::Paragraph, "Body"),
        Block::new(BlockKind::Image, "uploads/pic.png"),
    ];
    let ids: Vec<_> = blocks.iter().map(|b| b.id.clone()).collect();

    let session = EditorSession::load(blocks).unwrap();

    let loaded: Vec<_> = session.blocks().iter().map(|b| b.id.clone()).collect();
    assert_eq!(loaded, ids);
}

#[test]
fn test_partially_invalid_document_is_rejected_whole() {
    let good = Block::new(BlockKind::Paragraph, "fine");
    let mut bad = Block::new(BlockKind::Paragraph, "oops");
    bad.content.rich.push(RichSpan {
        start: 2,
        end: 40,
        style: SpanStyle::Bold,
    });

    let result = EditorSession::load(vec![good, bad]);

    assert!(matches!(
        result,
        Err(BlockValidationError::SpanOutOfRange { .. })
    ));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let block = Block::new(BlockKind::Paragraph, "a");
    let mut other = Block::new(BlockKind::Quote, "b");
    other.id = block.id.clone();

    let result = EditorSession::load(vec![block, other]);

    assert!(matches!(result, Err(BlockValidationError::DuplicateId(_))));
}

#[test]
fn test_unknown_kind_fails_at_deserialization() {
    let json = r#"{"id":"b1","kind":"spreadsheet","content":{"plain":""},"color":"default"}"#;
    let result: Result<Block, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

#[test]
fn test_snapshot_round_trips_through_json() {
    let mut session = EditorSession::load(vec![
        Block::new(BlockKind::Heading1, "Doc"),
        Block::new(BlockKind::Paragraph, "text"),
    ])
    .unwrap();
    session.handle_line_break(1, false);

    let json = serde_json::to_string(session.blocks()).unwrap();
    let parsed: Vec<Block> = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, session.blocks());
    // And the parsed form is loadable again (what the host does on reopen).
    let reloaded = EditorSession::load(parsed).unwrap();
    assert_eq!(reloaded.blocks(), session.blocks());
}

#[test]
fn test_snapshot_stays_loadable_after_shortening_spanned_text() {
    let mut spanned = Block::new(BlockKind::Paragraph, "hello world");
    spanned.content.rich.push(RichSpan {
        start: 0,
        end: 11,
        style: SpanStyle::Bold,
    });
    let id = spanned.id.clone();

    let mut session = EditorSession::load(vec![spanned]).unwrap();
    session.begin_editing(&id);
    assert!(session.commit_input("hi"));

    // The edit shrank the text; the snapshot must still pass its own loader.
    let json = serde_json::to_string(session.blocks()).unwrap();
    let parsed: Vec<Block> = serde_json::from_str(&json).unwrap();
    let reloaded = EditorSession::load(parsed).unwrap();

    let rich = &reloaded.blocks()[0].content.rich;
    assert_eq!(rich.len(), 1);
    assert_eq!((rich[0].start, rich[0].end), (0, 2));
}

#[test]
fn test_set_blocks_validates_like_load() {
    let mut session = EditorSession::load(Vec::new()).unwrap();
    let before = session.blocks().to_vec();

    let block = Block::new(BlockKind::Paragraph, "x");
    let dup = block.clone();
    let result = session.set_blocks(vec![block, dup]);

    assert!(result.is_err());
    // A rejected load leaves the session untouched.
    assert_eq!(session.blocks(), before.as_slice());
}
