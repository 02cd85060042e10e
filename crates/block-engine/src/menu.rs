//! Block command menu.
//!
//! # Overview
//!
//! The popover menu a handle click opens. It is a pure dispatch layer: it
//! holds no block data, only which block it is open for and which panel is
//! showing. Every selection turns into a [`BlockCommand`] (or a link string
//! for copy-link) and closes the menu.
//!
//! The panel state is a simple non-reentrant four-state machine
//! ([`MenuState`]): opening a submenu replaces the current panel, any item
//! selection or an outside click returns to `Closed`. The "turn into" panel
//! carries a live search string filtering the kind list by display name.

use crate::block::{BlockColor, BlockId, BlockKind};
use crate::commands::BlockCommand;

/// Which panel of the menu is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    /// Menu not visible.
    Closed,
    /// Root panel (turn into / color / duplicate / copy link / delete).
    Root,
    /// "Turn into" submenu with its search field.
    TurnInto,
    /// Color submenu.
    Color,
}

/// The contextual command menu for one block.
#[derive(Debug)]
pub struct CommandMenu {
    state: MenuState,
    target: usize,
    query: String,
}

impl Default for CommandMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandMenu {
    /// Create a closed menu.
    pub fn new() -> Self {
        CommandMenu {
            state: MenuState::Closed,
            target: 0,
            query: String::new(),
        }
    }

    /// Current panel.
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Whether any panel is showing.
    pub fn is_open(&self) -> bool {
        self.state != MenuState::Closed
    }

    /// Index of the block the menu is open for, when open.
    pub fn target(&self) -> Option<usize> {
        if self.is_open() { Some(self.target) } else { None }
    }

    /// Handle a click on a block's handle: open the root panel for that
    /// block, or close the menu when it is already open for it.
    pub fn toggle(&mut self, index: usize) {
        if self.is_open() && self.target == index {
            self.close();
        } else {
            self.state = MenuState::Root;
            self.target = index;
            self.query.clear();
        }
    }

    /// Close the menu (item selected, outside click, or a drag started).
    pub fn close(&mut self) {
        self.state = MenuState::Closed;
        self.query.clear();
    }

    /// Open the "turn into" submenu. No-op while closed.
    pub fn open_turn_into(&mut self) {
        if self.is_open() {
            self.state = MenuState::TurnInto;
            self.query.clear();
        }
    }

    /// Open the color submenu. No-op while closed.
    pub fn open_color(&mut self) {
        if self.is_open() {
            self.state = MenuState::Color;
        }
    }

    /// Current "turn into" search string.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the "turn into" search string.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Kinds the "turn into" panel lists, filtered by the search string
    /// (case-insensitive substring match over display names).
    pub fn filtered_kinds(&self) -> Vec<BlockKind> {
        let needle = self.query.to_lowercase();
        BlockKind::ALL
            .into_iter()
            .filter(|kind| needle.is_empty() || kind.display_name().to_lowercase().contains(&needle))
            .collect()
    }

    /// Select a kind in the "turn into" panel.
    ///
    /// Returns the retype command for the target block and closes the menu.
    /// `None` when the panel is not showing.
    pub fn choose_kind(&mut self, kind: BlockKind) -> Option<BlockCommand> {
        if self.state != MenuState::TurnInto {
            return None;
        }
        let index = self.target;
        self.close();
        Some(BlockCommand::Retype { index, kind })
    }

    /// Select a color in the color panel.
    pub fn choose_color(&mut self, color: BlockColor) -> Option<BlockCommand> {
        if self.state != MenuState::Color {
            return None;
        }
        let index = self.target;
        self.close();
        Some(BlockCommand::SetColor { index, color })
    }

    /// Select "duplicate" in the root panel.
    pub fn choose_duplicate(&mut self) -> Option<BlockCommand> {
        if self.state != MenuState::Root {
            return None;
        }
        let index = self.target;
        self.close();
        Some(BlockCommand::Duplicate { index })
    }

    /// Select "delete" in the root panel.
    pub fn choose_delete(&mut self) -> Option<BlockCommand> {
        if self.state != MenuState::Root {
            return None;
        }
        let index = self.target;
        self.close();
        Some(BlockCommand::Delete { index })
    }

    /// Select "copy link" in the root panel.
    ///
    /// Returns the fragment link for the target block (the host owns the
    /// clipboard and any URL prefixing) and closes the menu.
    pub fn choose_copy_link(&mut self, id: &BlockId) -> Option<String> {
        if self.state != MenuState::Root {
            return None;
        }
        self.close();
        Some(format!("#block-{id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_opens_and_closes() {
        let mut menu = CommandMenu::new();
        assert!(!menu.is_open());

        menu.toggle(3);
        assert_eq!(menu.state(), MenuState::Root);
        assert_eq!(menu.target(), Some(3));

        menu.toggle(3);
        assert!(!menu.is_open());
        assert_eq!(menu.target(), None);
    }

    #[test]
    fn test_toggle_on_other_block_moves_the_menu() {
        let mut menu = CommandMenu::new();
        menu.toggle(0);
        menu.toggle(4);
        assert_eq!(menu.state(), MenuState::Root);
        assert_eq!(menu.target(), Some(4));
    }

    #[test]
    fn test_opening_a_submenu_replaces_the_panel() {
        let mut menu = CommandMenu::new();
        menu.toggle(0);
        menu.open_turn_into();
        assert_eq!(menu.state(), MenuState::TurnInto);
        menu.open_color();
        assert_eq!(menu.state(), MenuState::Color);
    }

    #[test]
    fn test_submenus_cannot_open_while_closed() {
        let mut menu = CommandMenu::new();
        menu.open_turn_into();
        assert_eq!(menu.state(), MenuState::Closed);
        menu.open_color();
        assert_eq!(menu.state(), MenuState::Closed);
    }

    #[test]
    fn test_turn_into_filter_matches_display_names() {
        let mut menu = CommandMenu::new();
        menu.toggle(0);
        menu.open_turn_into();

        menu.set_query("head");
        assert_eq!(
            menu.filtered_kinds(),
            vec![BlockKind::Heading1, BlockKind::Heading2, BlockKind::Heading3]
        );

        menu.set_query("QUOTE");
        assert_eq!(menu.filtered_kinds(), vec![BlockKind::Quote]);

        menu.set_query("");
        assert_eq!(menu.filtered_kinds().len(), BlockKind::ALL.len());
    }

    #[test]
    fn test_choose_kind_dispatches_retype_and_closes() {
        let mut menu = CommandMenu::new();
        menu.toggle(2);
        menu.open_turn_into();

        let command = menu.choose_kind(BlockKind::Heading1);
        assert_eq!(
            command,
            Some(BlockCommand::Retype {
                index: 2,
                kind: BlockKind::Heading1,
            })
        );
        assert!(!menu.is_open());
        assert_eq!(menu.query(), "");
    }

    #[test]
    fn test_root_items_require_the_root_panel() {
        let mut menu = CommandMenu::new();
        menu.toggle(1);
        menu.open_turn_into();
        assert_eq!(menu.choose_duplicate(), None);
        assert_eq!(menu.choose_delete(), None);
    }

    #[test]
    fn test_root_dispatch() {
        let mut menu = CommandMenu::new();
        menu.toggle(1);
        assert_eq!(
            menu.choose_duplicate(),
            Some(BlockCommand::Duplicate { index: 1 })
        );
        assert!(!menu.is_open());

        menu.toggle(1);
        assert_eq!(menu.choose_delete(), Some(BlockCommand::Delete { index: 1 }));
    }

    #[test]
    fn test_copy_link_yields_fragment() {
        let mut menu = CommandMenu::new();
        let id = crate::block::BlockId::from_raw("abc123");
        menu.toggle(0);
        assert_eq!(menu.choose_copy_link(&id), Some("#block-abc123".to_string()));
        assert!(!menu.is_open());
    }
}
