//! Structural editing example
//!
//! Demonstrates driving the engine through `EditorSession`: split, duplicate,
//! turn-into, and delete, with the refocus queue a host would flush after
//! rendering.

use block_engine::{Block, BlockCommand, BlockKind, CommandResult, EditorSession};

fn dump(session: &EditorSession) {
    for (i, block) in session.blocks().iter().enumerate() {
        println!(
            "  [{i}] {:<10} {:?}",
            block.kind.display_name(),
            block.content.plain
        );
    }
    println!();
}

fn main() {
    let mut session = EditorSession::new(vec![Block::new(BlockKind::Paragraph, "Hello")]);

    println!("1. Initial document:");
    dump(&session);

    println!("2. Enter at block 0 (split):");
    session.handle_line_break(0, false);
    dump(&session);

    println!("3. Duplicate block 0:");
    session.execute(BlockCommand::Duplicate { index: 0 });
    dump(&session);

    println!("4. Turn block 2 into Heading 1:");
    session.execute(BlockCommand::Retype {
        index: 2,
        kind: BlockKind::Heading1,
    });
    dump(&session);

    println!("5. Delete block 1:");
    session.execute(BlockCommand::Delete { index: 1 });
    dump(&session);

    println!("6. Deleting the last block of a one-block document is refused:");
    session.execute(BlockCommand::Delete { index: 1 });
    let result = session.execute(BlockCommand::Delete { index: 0 });
    println!("  second delete -> {result:?}");
    dump(&session);

    println!(
        "Pending focus requests for the host to flush after render: {}",
        session.focus_mut().has_pending()
    );
}
