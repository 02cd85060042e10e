//! Host snapshot example
//!
//! Shows the host side of the boundary: subscribing to change notifications,
//! taking a serializable snapshot, and handing it to a `DocumentStore`
//! implementation on submit.

use block_engine::{
    Block, BlockKind, ChangeKind, DocumentStore, EditorSession, HostError,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Toy store that "persists" by printing the JSON payload.
struct PrintlnStore;

impl DocumentStore for PrintlnStore {
    fn save_document(&mut self, blocks: &[Block]) -> Result<(), HostError> {
        let json = serde_json::to_string_pretty(blocks)
            .map_err(|e| HostError::new(e.to_string()))?;
        println!("saving document:\n{json}");
        Ok(())
    }
}

fn main() {
    let mut session = EditorSession::load(vec![
        Block::new(BlockKind::Heading1, "Trip notes"),
        Block::new(BlockKind::Paragraph, "Pack the camera."),
    ])
    .expect("document is valid");

    let changes: Rc<RefCell<Vec<ChangeKind>>> = Rc::default();
    let sink = changes.clone();
    session.subscribe(move |change| {
        sink.borrow_mut().push(change.kind);
    });

    // Some edits arrive.
    session.handle_line_break(1, false);
    let id = session.blocks()[2].id.clone();
    session.begin_editing(&id);
    session.commit_input("Charge the batteries.");

    println!("observed changes: {:?}\n", changes.borrow());

    // Submit: the host reads the snapshot and calls its collaborator.
    let mut store = PrintlnStore;
    store
        .save_document(session.blocks())
        .expect("store accepts the payload");
}
