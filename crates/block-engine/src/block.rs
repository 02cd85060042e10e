//! Block data model.
//!
//! A document is an ordered list of typed blocks. Each block carries a stable
//! client-assigned id, a kind (paragraph, heading, quote, ...), and its text
//! content. The plain text is authoritative; rich spans are annotations over it
//! and are reserved for inline formatting.
//!
//! # Example
//!
//! ```rust
//! use block_engine::{Block, BlockKind};
//!
//! let block = Block::new(BlockKind::Paragraph, "Hello");
//! assert_eq!(block.content.plain, "Hello");
//! assert!(block.content.rich.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identifier for a block.
///
/// Assigned client-side at creation time, unique for the lifetime of the
/// document, and never reused after deletion. The id is not derived from the
/// block's position; reordering never changes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

static NEXT_BLOCK_SEQ: AtomicU64 = AtomicU64::new(1);

impl BlockId {
    /// Generate a fresh id.
    ///
    /// Ids combine a process-wide monotonic counter (unique within a process)
    /// with the wall-clock nanoseconds since the epoch, which makes collisions
    /// between processes unlikely but not impossible. Hosts that need stronger
    /// guarantees assign their own ids through [`BlockId::from_raw`].
    pub fn generate() -> Self {
        let seq = NEXT_BLOCK_SEQ.fetch_add(1, Ordering::Relaxed);
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        BlockId(format!("blk-{nanos:x}-{seq:x}"))
    }

    /// Wrap a host-supplied id (e.g. from a persisted document).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        BlockId(raw.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of block kinds.
///
/// The kind determines placeholder text and how the host styles the block's
/// text surface; it does not change the shape of the content. Changing a
/// block's kind ("turn into") never touches its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Body text.
    Paragraph,
    /// Top-level heading.
    #[serde(rename = "heading_1")]
    Heading1,
    /// Second-level heading.
    #[serde(rename = "heading_2")]
    Heading2,
    /// Third-level heading.
    #[serde(rename = "heading_3")]
    Heading3,
    /// Collapsible toggle block.
    Toggle,
    /// Quoted text.
    Quote,
    /// Reference to another page.
    Page,
    /// Image artifact.
    Image,
    /// Video artifact.
    Video,
}

impl BlockKind {
    /// All kinds, in the order the "turn into" menu lists them.
    pub const ALL: [BlockKind; 9] = [
        BlockKind::Paragraph,
        BlockKind::Heading1,
        BlockKind::Heading2,
        BlockKind::Heading3,
        BlockKind::Toggle,
        BlockKind::Quote,
        BlockKind::Page,
        BlockKind::Image,
        BlockKind::Video,
    ];

    /// Human-readable name, used by the "turn into" menu and its search filter.
    pub fn display_name(self) -> &'static str {
        match self {
            BlockKind::Paragraph => "Text",
            BlockKind::Heading1 => "Heading 1",
            BlockKind::Heading2 => "Heading 2",
            BlockKind::Heading3 => "Heading 3",
            BlockKind::Toggle => "Toggle",
            BlockKind::Quote => "Quote",
            BlockKind::Page => "Page",
            BlockKind::Image => "Image",
            BlockKind::Video => "Video",
        }
    }

    /// Placeholder text shown by the host while the block is empty.
    pub fn placeholder(self) -> &'static str {
        match self {
            BlockKind::Paragraph => "Type something...",
            BlockKind::Heading1 => "Heading 1",
            BlockKind::Heading2 => "Heading 2",
            BlockKind::Heading3 => "Heading 3",
            BlockKind::Toggle => "Toggle",
            BlockKind::Quote => "Quote",
            BlockKind::Page => "Untitled page",
            BlockKind::Image => "Image",
            BlockKind::Video => "Video",
        }
    }

    /// Whether the kind hosts an editable text surface.
    ///
    /// Media kinds render an artifact; their `plain` content stores the object
    /// key, not user-typed text.
    pub fn is_text(self) -> bool {
        !matches!(self, BlockKind::Image | BlockKind::Video)
    }
}

/// Styling color hint attached to a block by the menu's color submenu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockColor {
    /// No explicit color (host default).
    Default,
    /// Gray text.
    Gray,
    /// Brown text.
    Brown,
    /// Orange text.
    Orange,
    /// Yellow text.
    Yellow,
    /// Green text.
    Green,
    /// Blue text.
    Blue,
    /// Purple text.
    Purple,
    /// Pink text.
    Pink,
    /// Red text.
    Red,
}

impl BlockColor {
    /// All colors, in the order the color submenu lists them.
    pub const ALL: [BlockColor; 10] = [
        BlockColor::Default,
        BlockColor::Gray,
        BlockColor::Brown,
        BlockColor::Orange,
        BlockColor::Yellow,
        BlockColor::Green,
        BlockColor::Blue,
        BlockColor::Purple,
        BlockColor::Pink,
        BlockColor::Red,
    ];

    /// Human-readable name for the color submenu.
    pub fn display_name(self) -> &'static str {
        match self {
            BlockColor::Default => "Default",
            BlockColor::Gray => "Gray",
            BlockColor::Brown => "Brown",
            BlockColor::Orange => "Orange",
            BlockColor::Yellow => "Yellow",
            BlockColor::Green => "Green",
            BlockColor::Blue => "Blue",
            BlockColor::Purple => "Purple",
            BlockColor::Pink => "Pink",
            BlockColor::Red => "Red",
        }
    }
}

impl Default for BlockColor {
    fn default() -> Self {
        BlockColor::Default
    }
}

/// An inline-formatting annotation over a block's plain text.
///
/// Spans are half-open char ranges into `plain`. They are reserved for future
/// styling; none of the structural operations produce them, and duplication
/// deliberately drops them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichSpan {
    /// Inclusive start char offset into `plain`.
    pub start: usize,
    /// Exclusive end char offset into `plain`.
    pub end: usize,
    /// Annotation carried by the span.
    pub style: SpanStyle,
}

/// The inline style a [`RichSpan`] applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanStyle {
    /// Bold text.
    Bold,
    /// Italic text.
    Italic,
    /// Inline code.
    Code,
    /// Link to a URL.
    Link(String),
}

/// A block's content: authoritative plain text plus optional rich spans.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockContent {
    /// The block's plain text. Single source of truth.
    pub plain: String,
    /// Inline-formatting annotations over `plain`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rich: Vec<RichSpan>,
}

impl BlockContent {
    /// Content holding the given plain text and no spans.
    pub fn plain_text(text: impl Into<String>) -> Self {
        BlockContent {
            plain: text.into(),
            rich: Vec::new(),
        }
    }

    /// Whether the plain text is empty.
    pub fn is_empty(&self) -> bool {
        self.plain.is_empty()
    }
}

/// One unit of document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Stable identifier (see [`BlockId`]).
    pub id: BlockId,
    /// Block kind.
    pub kind: BlockKind,
    /// Text content.
    pub content: BlockContent,
    /// Styling color hint.
    #[serde(default)]
    pub color: BlockColor,
}

impl Block {
    /// Create a block with a freshly generated id.
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Block {
            id: BlockId::generate(),
            kind,
            content: BlockContent::plain_text(text),
            color: BlockColor::Default,
        }
    }

    /// Create an empty block of the given kind.
    pub fn empty(kind: BlockKind) -> Self {
        Block::new(kind, "")
    }

    /// Validate a host-supplied block (initial load path).
    ///
    /// Rich spans must stay inside `plain` and be well-ordered. Unknown kinds
    /// are rejected earlier, during deserialization of [`BlockKind`].
    pub fn validate(&self) -> Result<(), BlockValidationError> {
        if self.id.as_str().is_empty() {
            return Err(BlockValidationError::EmptyId);
        }
        let len = self.content.plain.chars().count();
        for span in &self.content.rich {
            if span.start > span.end || span.end > len {
                return Err(BlockValidationError::SpanOutOfRange {
                    id: self.id.clone(),
                    start: span.start,
                    end: span.end,
                    len,
                });
            }
        }
        Ok(())
    }
}

/// Validation failure for a host-supplied block list.
///
/// This is the only error the engine propagates outward: every other operation
/// is internally generated and well-formed by construction, so invalid input
/// can only arrive through the initial-load path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockValidationError {
    /// A block has an empty id string.
    EmptyId,
    /// Two blocks share the same id.
    DuplicateId(BlockId),
    /// A rich span does not fit inside the block's plain text.
    SpanOutOfRange {
        /// Id of the offending block.
        id: BlockId,
        /// Span start (chars).
        start: usize,
        /// Span end (chars).
        end: usize,
        /// Length of the block's plain text (chars).
        len: usize,
    },
}

impl fmt::Display for BlockValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockValidationError::EmptyId => {
                write!(f, "Block id cannot be empty")
            }
            BlockValidationError::DuplicateId(id) => {
                write!(f, "Duplicate block id: {}", id)
            }
            BlockValidationError::SpanOutOfRange {
                id,
                start,
                end,
                len,
            } => {
                write!(
                    f,
                    "Rich span {}..{} out of range for block {} (text length {})",
                    start, end, id, len
                )
            }
        }
    }
}

impl std::error::Error for BlockValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = BlockId::generate();
        let b = BlockId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_kind_serde_names() {
        let json = serde_json::to_string(&BlockKind::Heading1).unwrap();
        assert_eq!(json, "\"heading_1\"");
        let kind: BlockKind = serde_json::from_str("\"paragraph\"").unwrap();
        assert_eq!(kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<BlockKind, _> = serde_json::from_str("\"callout\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_span() {
        let mut block = Block::new(BlockKind::Paragraph, "abc");
        block.content.rich.push(RichSpan {
            start: 1,
            end: 9,
            style: SpanStyle::Bold,
        });
        assert!(matches!(
            block.validate(),
            Err(BlockValidationError::SpanOutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_accepts_span_at_text_end() {
        let mut block = Block::new(BlockKind::Paragraph, "abc");
        block.content.rich.push(RichSpan {
            start: 0,
            end: 3,
            style: SpanStyle::Italic,
        });
        assert!(block.validate().is_ok());
    }

    #[test]
    fn test_media_kinds_are_not_text() {
        assert!(BlockKind::Paragraph.is_text());
        assert!(BlockKind::Toggle.is_text());
        assert!(!BlockKind::Image.is_text());
        assert!(!BlockKind::Video.is_text());
    }
}
