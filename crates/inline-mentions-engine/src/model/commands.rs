use crate::model::BlockKey;

/// Edit and cursor commands understood by [`Document::apply`](crate::model::Document::apply).
///
/// Offsets are in chars and are clamped into the target block.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Insert text at the caret, replacing an expanded selection first.
    /// The text must not contain newlines; use `SplitBlock` for that.
    InsertText { text: String },
    /// Delete the selection, or the char before the caret (joining with the
    /// previous block at offset 0).
    DeleteBackward,
    MoveLeft,
    MoveRight,
    /// Collapse the selection to a caret.
    MoveTo { block: BlockKey, offset: usize },
    Select {
        anchor_block: BlockKey,
        anchor_offset: usize,
        focus_block: BlockKey,
        focus_offset: usize,
    },
    /// Split the current block at the caret.
    SplitBlock,
    Focus,
    Blur,
}

impl Cmd {
    pub fn insert(text: impl Into<String>) -> Self {
        Cmd::InsertText { text: text.into() }
    }

    pub fn move_to(block: impl Into<BlockKey>, offset: usize) -> Self {
        Cmd::MoveTo {
            block: block.into(),
            offset,
        }
    }
}
